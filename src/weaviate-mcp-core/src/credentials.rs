use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_OPENAI: &str = "X-OpenAI-Api-Key";
pub const HEADER_COHERE: &str = "X-Cohere-Api-Key";
pub const HEADER_HUGGINGFACE: &str = "X-HuggingFace-Api-Key";
pub const HEADER_PALM: &str = "X-Palm-Api-Key";
pub const HEADER_ANTHROPIC: &str = "X-Anthropic-Api-Key";

/// API keys forwarded to the vectorizer / generative modules of the server
#[derive(Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProviderKeys {
    #[serde(default)]
    pub openai: Option<String>,
    #[serde(default)]
    pub cohere: Option<String>,
    #[serde(default)]
    pub huggingface: Option<String>,
    #[serde(default)]
    pub palm: Option<String>,
    #[serde(default)]
    pub anthropic: Option<String>,
}

impl ProviderKeys {
    fn entries(&self) -> [(&'static str, &Option<String>); 5] {
        [
            (HEADER_OPENAI, &self.openai),
            (HEADER_COHERE, &self.cohere),
            (HEADER_HUGGINGFACE, &self.huggingface),
            (HEADER_PALM, &self.palm),
            (HEADER_ANTHROPIC, &self.anthropic),
        ]
    }
}

/// Connection parameters for a single inbound call.
///
/// Built fresh for every call and handed to the client by value; nothing here
/// is cached or shared between calls.
#[derive(Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Credentials {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub provider_keys: ProviderKeys,
}

impl Credentials {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            ..Default::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_provider_keys(mut self, provider_keys: ProviderKeys) -> Self {
        self.provider_keys = provider_keys;
        self
    }

    /// Base URL with surrounding whitespace and trailing slashes removed.
    /// Returns `None` when unset or blank.
    pub fn base_url(&self) -> Option<&str> {
        present(&self.base_url).map(|url| url.trim_end_matches('/'))
    }

    /// Headers sent with every request: JSON content type, bearer token and
    /// one header per configured provider key.
    pub fn auth_headers(&self) -> BTreeMap<&'static str, String> {
        let mut headers = BTreeMap::new();
        headers.insert(HEADER_CONTENT_TYPE, "application/json".to_string());

        if let Some(key) = present(&self.api_key) {
            headers.insert(HEADER_AUTHORIZATION, format!("Bearer {}", key));
        }

        for (name, value) in self.provider_keys.entries() {
            if let Some(value) = present(value) {
                headers.insert(name, value.to_string());
            }
        }

        headers
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn redact(value: &Option<String>) -> &'static str {
    if present(value).is_some() {
        "<redacted>"
    } else {
        "<unset>"
    }
}

impl fmt::Debug for ProviderKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("ProviderKeys");
        for (name, value) in self.entries() {
            s.field(name, &redact(value));
        }
        s.finish()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("base_url", &self.base_url)
            .field("api_key", &redact(&self.api_key))
            .field("provider_keys", &self.provider_keys)
            .finish()
    }
}
