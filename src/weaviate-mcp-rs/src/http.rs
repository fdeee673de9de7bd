//! Request pipeline: URL and header assembly, execution and status-code
//! classification.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, RETRY_AFTER};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::client::Client;
use crate::{ClientError, Result};

/// Version segment inserted between the base URL and every path
pub const API_VERSION: &str = "v1";

pub const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

const AUTH_FAILED_MESSAGE: &str = "Authentication failed. Check your Weaviate API key.";
const MISSING_URL_MESSAGE: &str = "Weaviate URL is not configured";

/// One outbound call: method, path below `/v1`, query, JSON body and any
/// extra headers (which win over the auth headers on conflict).
///
/// The path is kept as segments. Segments added with [`ApiRequest::segment`]
/// are percent-encoded as a single segment when the URL is built, so ids and
/// names containing `/`, `?` or `#` cannot reach another endpoint.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    segments: Vec<String>,
    query: Vec<(String, String)>,
    body: Option<serde_json::Value>,
    headers: HeaderMap,
}

impl ApiRequest {
    /// `path` is a fixed route such as `/schema` or `/batch/objects`
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            segments: path
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect(),
            query: Vec::new(),
            body: None,
            headers: HeaderMap::new(),
        }
    }

    pub fn get(path: &str) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: &str) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: &str) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: &str) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: &str) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn head(path: &str) -> Self {
        Self::new(Method::HEAD, path)
    }

    /// Append one caller-supplied path segment
    pub fn segment(mut self, segment: impl ToString) -> Self {
        self.segments.push(segment.to_string());
        self
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn query_opt(self, key: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Unencoded path, for logs and error messages
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

/// `{base}/v1/{segments..}`; fails with an authentication error when no base
/// URL is configured
pub fn build_url<S: AsRef<str>>(base_url: Option<&str>, segments: &[S]) -> Result<Url> {
    let base = base_url.ok_or_else(|| ClientError::Authentication {
        status: None,
        message: MISSING_URL_MESSAGE.to_string(),
    })?;
    let mut url = Url::parse(base).map_err(|e| {
        ClientError::transport(None, format!("Invalid Weaviate URL {}: {}", base, e))
    })?;
    url.path_segments_mut()
        .map_err(|_| ClientError::transport(None, format!("Invalid Weaviate URL {}", base)))?
        .pop_if_empty()
        .push(API_VERSION)
        .extend(segments);
    Ok(url)
}

pub fn parse_retry_after(value: Option<&str>) -> u64 {
    value
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

/// Best-effort message for an unsuccessful response body
pub fn error_message(status: u16, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        let nested = json
            .pointer("/error/0/message")
            .or_else(|| json.pointer("/error/message"))
            .or_else(|| json.get("message"))
            .and_then(|m| m.as_str());
        if let Some(message) = nested {
            return message.to_string();
        }
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }

    format!("Weaviate request failed with status {}", status)
}

/// Map a finished response to data or a typed error.
///
/// Checked in order: 429, 401/403, 404, other non-2xx, 204, empty body,
/// JSON body.
pub fn classify_response<T: DeserializeOwned>(
    status: u16,
    retry_after: Option<&str>,
    path: &str,
    body: &str,
) -> Result<Option<T>> {
    if status == 429 {
        return Err(ClientError::RateLimit {
            retry_after: parse_retry_after(retry_after),
        });
    }
    if status == 401 || status == 403 {
        return Err(ClientError::Authentication {
            status: Some(status),
            message: AUTH_FAILED_MESSAGE.to_string(),
        });
    }
    if status == 404 {
        return Err(ClientError::NotFound {
            message: format!("Resource not found: {}", path),
        });
    }
    if !(200..300).contains(&status) {
        return Err(ClientError::transport(
            Some(status),
            error_message(status, body),
        ));
    }
    if status == 204 || body.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(body)?))
}

impl Client {
    fn merged_headers(&self, extra: &HeaderMap) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        for (name, value) in self.credentials().auth_headers() {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ClientError::transport(None, format!("{}: {}", name, e)))?;
            let value = HeaderValue::from_str(&value).map_err(|e| {
                ClientError::transport(None, format!("invalid value for {}: {}", name, e))
            })?;
            headers.insert(name, value);
        }
        for (name, value) in extra {
            headers.insert(name.clone(), value.clone());
        }
        Ok(headers)
    }

    async fn execute(&self, request: &ApiRequest) -> Result<reqwest::Response> {
        let url = build_url(self.credentials().base_url(), &request.segments)?;
        let headers = self.merged_headers(&request.headers)?;

        debug!(method = %request.method, url = %url, "sending request");

        let mut builder = self
            .http()
            .request(request.method.clone(), url)
            .headers(headers);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        Ok(builder.send().await?)
    }

    /// Run a request and decode its body. `Ok(None)` means the server sent
    /// no content.
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<Option<T>> {
        let response = self.execute(&request).await?;
        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) if !(200..300).contains(&status) => {
                debug!(status, "could not read error body: {}", e);
                String::new()
            }
            Err(e) => return Err(e.into()),
        };

        let path = request.path();
        let result = classify_response(status, retry_after.as_deref(), &path, &body);
        if let Err(err) = &result {
            warn!(
                method = %request.method,
                path = %path,
                status,
                kind = %err.kind(),
                "request failed: {}",
                err
            );
        }
        result
    }

    /// Like [`Client::send`] but treats a missing body as an invalid response
    pub async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let path = request.path();
        self.send(request).await?.ok_or_else(|| {
            ClientError::transport(
                None,
                format!("Invalid response from server: empty body for {}", path),
            )
        })
    }

    /// Run a request and discard any body
    pub async fn send_empty(&self, request: ApiRequest) -> Result<()> {
        self.send::<serde_json::Value>(request).await.map(|_| ())
    }

    /// `request(path, method, body?)`
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<Option<T>> {
        let mut request = ApiRequest::new(method, path);
        if let Some(body) = body {
            request = request.json(body)?;
        }
        self.send(request).await
    }

    /// Raw status code of a request, without classification
    pub(crate) async fn probe(&self, request: ApiRequest) -> Result<u16> {
        let response = self.execute(&request).await?;
        Ok(response.status().as_u16())
    }
}
