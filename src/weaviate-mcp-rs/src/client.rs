use crate::http::ApiRequest;
use crate::{ClientError, Result};
use reqwest::{Client as HttpClient, Method};
use serde_json::Value;
use uuid::Uuid;
use weaviate_mcp_core::graphql::build_get_query;
use weaviate_mcp_core::{
    BackupBackend, BackupRequest, BackupStatus, BatchDeleteRequest, BatchObjectsRequest,
    BatchReference, Bm25Params, ClassificationRequest, Credentials, GraphQLResponse,
    HybridParams, NearObjectParams, NearTextParams, NearVectorParams, ObjectList,
    PaginatedResult, QueryOptions, RestoreRequest, SearchClause, SingleRef, Tenant,
    WeaviateObject,
};

/// Weaviate REST / GraphQL client.
///
/// Bound to the credentials of a single inbound call. Every method is one
/// round trip, except `tenant_exists` which lists tenants and scans locally.
pub struct Client {
    credentials: Credentials,
    client: HttpClient,
}

impl Client {
    /// Create a new client for the given credentials
    pub fn new(credentials: Credentials) -> Self {
        Self::with_http_client(credentials, HttpClient::new())
    }

    pub fn with_http_client(credentials: Credentials, client: HttpClient) -> Self {
        Self {
            credentials,
            client,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub(crate) fn http(&self) -> &HttpClient {
        &self.client
    }

    // ---- Health -------------------------------------------------------

    /// Liveness probe; any failure reads as `false`
    pub async fn is_live(&self) -> bool {
        self.probe_ok(ApiRequest::get("/.well-known/live")).await
    }

    /// Readiness probe; any failure reads as `false`
    pub async fn is_ready(&self) -> bool {
        self.probe_ok(ApiRequest::get("/.well-known/ready")).await
    }

    async fn probe_ok(&self, request: ApiRequest) -> bool {
        matches!(self.probe(request).await, Ok(status) if (200..300).contains(&status))
    }

    pub async fn get_meta(&self) -> Result<Value> {
        self.fetch(ApiRequest::get("/meta")).await
    }

    // ---- Schema -------------------------------------------------------

    pub async fn get_schema(&self) -> Result<Value> {
        self.fetch(ApiRequest::get("/schema")).await
    }

    pub async fn get_class(&self, class_name: &str) -> Result<Value> {
        self.fetch(ApiRequest::get("/schema").segment(class_name))
            .await
    }

    #[tracing::instrument(skip(self, class_def))]
    pub async fn create_class(&self, class_def: &Value) -> Result<Value> {
        self.fetch(ApiRequest::post("/schema").json(class_def)?)
            .await
    }

    #[tracing::instrument(skip(self, class_def))]
    pub async fn update_class(&self, class_name: &str, class_def: &Value) -> Result<Value> {
        self.fetch(ApiRequest::put("/schema").segment(class_name).json(class_def)?)
            .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_class(&self, class_name: &str) -> Result<()> {
        self.send_empty(ApiRequest::delete("/schema").segment(class_name))
            .await
    }

    #[tracing::instrument(skip(self, property))]
    pub async fn add_property(&self, class_name: &str, property: &Value) -> Result<Value> {
        let request = ApiRequest::post("/schema")
            .segment(class_name)
            .segment("properties")
            .json(property)?;
        self.fetch(request).await
    }

    pub async fn get_shards(&self, class_name: &str) -> Result<Value> {
        let request = ApiRequest::get("/schema")
            .segment(class_name)
            .segment("shards");
        self.fetch(request).await
    }

    // ---- Objects ------------------------------------------------------

    #[tracing::instrument(skip(self, object), fields(class = %object.class))]
    pub async fn create_object(&self, object: &WeaviateObject) -> Result<WeaviateObject> {
        self.fetch(ApiRequest::post("/objects").json(object)?).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_object(
        &self,
        class_name: &str,
        id: Uuid,
        include_vector: bool,
        tenant: Option<&str>,
    ) -> Result<WeaviateObject> {
        let request = object_request(Method::GET, class_name, id)
            .query_opt("include", include_vector.then_some("vector"))
            .query_opt("tenant", tenant);
        self.fetch(request).await
    }

    /// One page of objects. `has_more` is set when the page came back full.
    #[tracing::instrument(skip(self))]
    pub async fn list_objects(
        &self,
        class_name: &str,
        limit: usize,
        offset: usize,
        tenant: Option<&str>,
    ) -> Result<PaginatedResult<WeaviateObject>> {
        let request = ApiRequest::get("/objects")
            .query("class", class_name)
            .query("limit", limit)
            .query("offset", offset)
            .query_opt("tenant", tenant);
        let list: ObjectList = self.send(request).await?.unwrap_or_default();
        Ok(PaginatedResult::from_offset_page(list.objects, offset, limit))
    }

    /// Replace an object
    #[tracing::instrument(skip(self, object), fields(class = %object.class))]
    pub async fn update_object(&self, id: Uuid, object: &WeaviateObject) -> Result<WeaviateObject> {
        self.fetch(object_request(Method::PUT, &object.class, id).json(object)?)
            .await
    }

    /// Merge properties into an existing object
    #[tracing::instrument(skip(self, object), fields(class = %object.class))]
    pub async fn patch_object(&self, id: Uuid, object: &WeaviateObject) -> Result<()> {
        self.send_empty(object_request(Method::PATCH, &object.class, id).json(object)?)
            .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_object(
        &self,
        class_name: &str,
        id: Uuid,
        tenant: Option<&str>,
    ) -> Result<()> {
        let request = object_request(Method::DELETE, class_name, id).query_opt("tenant", tenant);
        self.send_empty(request).await
    }

    /// HEAD check; 200 or 204 means the object exists. Transport failures
    /// also read as `false`, so an unreachable server looks like absence.
    pub async fn object_exists(&self, class_name: &str, id: Uuid, tenant: Option<&str>) -> bool {
        let request = object_request(Method::HEAD, class_name, id).query_opt("tenant", tenant);
        matches!(self.probe(request).await, Ok(200) | Ok(204))
    }

    // ---- Batch --------------------------------------------------------

    #[tracing::instrument(skip(self, objects), fields(count = objects.len()))]
    pub async fn batch_create_objects(&self, objects: &[WeaviateObject]) -> Result<Vec<Value>> {
        let body = BatchObjectsRequest { objects };
        Ok(self
            .send(ApiRequest::post("/batch/objects").json(&body)?)
            .await?
            .unwrap_or_default())
    }

    #[tracing::instrument(skip(self, request), fields(class = %request.matcher.class))]
    pub async fn batch_delete_objects(
        &self,
        request: &BatchDeleteRequest,
        tenant: Option<&str>,
    ) -> Result<Value> {
        self.fetch(
            ApiRequest::delete("/batch/objects")
                .query_opt("tenant", tenant)
                .json(request)?,
        )
        .await
    }

    #[tracing::instrument(skip(self, references), fields(count = references.len()))]
    pub async fn batch_add_references(&self, references: &[BatchReference]) -> Result<Vec<Value>> {
        Ok(self
            .send(ApiRequest::post("/batch/references").json(references)?)
            .await?
            .unwrap_or_default())
    }

    // ---- References ---------------------------------------------------

    #[tracing::instrument(skip(self, reference))]
    pub async fn add_reference(
        &self,
        class_name: &str,
        id: Uuid,
        property: &str,
        reference: &SingleRef,
        tenant: Option<&str>,
    ) -> Result<()> {
        let request = reference_request(Method::POST, class_name, id, property)
            .query_opt("tenant", tenant)
            .json(reference)?;
        self.send_empty(request).await
    }

    /// Replace every reference held by `property`
    #[tracing::instrument(skip(self, references))]
    pub async fn replace_references(
        &self,
        class_name: &str,
        id: Uuid,
        property: &str,
        references: &[SingleRef],
        tenant: Option<&str>,
    ) -> Result<()> {
        let request = reference_request(Method::PUT, class_name, id, property)
            .query_opt("tenant", tenant)
            .json(references)?;
        self.send_empty(request).await
    }

    #[tracing::instrument(skip(self, reference))]
    pub async fn delete_reference(
        &self,
        class_name: &str,
        id: Uuid,
        property: &str,
        reference: &SingleRef,
        tenant: Option<&str>,
    ) -> Result<()> {
        let request = reference_request(Method::DELETE, class_name, id, property)
            .query_opt("tenant", tenant)
            .json(reference)?;
        self.send_empty(request).await
    }

    // ---- Search -------------------------------------------------------

    /// Execute a GraphQL document and return its `data`. A response with
    /// `errors` is reported as a transport error carrying the first message.
    #[tracing::instrument(skip(self, query))]
    pub async fn graphql(&self, query: &str) -> Result<Value> {
        let response = self.graphql_response(query).await?;
        Ok(response.data.unwrap_or(Value::Null))
    }

    async fn graphql_response(&self, query: &str) -> Result<GraphQLResponse> {
        let body = serde_json::json!({ "query": query });
        let response: GraphQLResponse = self
            .fetch(ApiRequest::post("/graphql").json(&body)?)
            .await?;
        if let Some(message) = response.first_error() {
            return Err(ClientError::transport(Some(200), message));
        }
        Ok(response)
    }

    /// Run a `Get` query on `class_name` and return its hits
    #[tracing::instrument(skip(self, clause, options))]
    pub async fn search(
        &self,
        class_name: &str,
        clause: &SearchClause,
        options: &QueryOptions,
    ) -> Result<Vec<Value>> {
        clause.validate()?;
        let query = build_get_query(class_name, clause, options);
        let response = self.graphql_response(&query).await?;
        Ok(response.get_hits(class_name))
    }

    pub async fn near_vector(
        &self,
        class_name: &str,
        params: NearVectorParams,
        options: &QueryOptions,
    ) -> Result<Vec<Value>> {
        self.search(class_name, &SearchClause::NearVector(params), options)
            .await
    }

    pub async fn near_text(
        &self,
        class_name: &str,
        params: NearTextParams,
        options: &QueryOptions,
    ) -> Result<Vec<Value>> {
        self.search(class_name, &SearchClause::NearText(params), options)
            .await
    }

    pub async fn near_object(
        &self,
        class_name: &str,
        params: NearObjectParams,
        options: &QueryOptions,
    ) -> Result<Vec<Value>> {
        self.search(class_name, &SearchClause::NearObject(params), options)
            .await
    }

    pub async fn hybrid(
        &self,
        class_name: &str,
        params: HybridParams,
        options: &QueryOptions,
    ) -> Result<Vec<Value>> {
        self.search(class_name, &SearchClause::Hybrid(params), options)
            .await
    }

    pub async fn bm25(
        &self,
        class_name: &str,
        params: Bm25Params,
        options: &QueryOptions,
    ) -> Result<Vec<Value>> {
        self.search(class_name, &SearchClause::Bm25(params), options)
            .await
    }

    // ---- Tenants ------------------------------------------------------

    pub async fn get_tenants(&self, class_name: &str) -> Result<Vec<Tenant>> {
        Ok(self
            .send(tenants_request(Method::GET, class_name))
            .await?
            .unwrap_or_default())
    }

    #[tracing::instrument(skip(self, tenants), fields(count = tenants.len()))]
    pub async fn create_tenants(
        &self,
        class_name: &str,
        tenants: &[Tenant],
    ) -> Result<Vec<Tenant>> {
        Ok(self
            .send(tenants_request(Method::POST, class_name).json(tenants)?)
            .await?
            .unwrap_or_default())
    }

    #[tracing::instrument(skip(self, tenants), fields(count = tenants.len()))]
    pub async fn update_tenants(
        &self,
        class_name: &str,
        tenants: &[Tenant],
    ) -> Result<Vec<Tenant>> {
        Ok(self
            .send(tenants_request(Method::PUT, class_name).json(tenants)?)
            .await?
            .unwrap_or_default())
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_tenants(&self, class_name: &str, names: &[String]) -> Result<()> {
        self.send_empty(tenants_request(Method::DELETE, class_name).json(names)?)
            .await
    }

    /// Lists all tenants and scans for `name`; any failure reads as `false`
    pub async fn tenant_exists(&self, class_name: &str, name: &str) -> bool {
        match self.get_tenants(class_name).await {
            Ok(tenants) => tenants.iter().any(|t| t.name == name),
            Err(_) => false,
        }
    }

    // ---- Backups ------------------------------------------------------

    #[tracing::instrument(skip(self, request), fields(id = %request.id))]
    pub async fn create_backup(
        &self,
        backend: BackupBackend,
        request: &BackupRequest,
    ) -> Result<BackupStatus> {
        let request = ApiRequest::post("/backups")
            .segment(backend.as_str())
            .json(request)?;
        self.fetch(request).await
    }

    pub async fn get_backup_status(
        &self,
        backend: BackupBackend,
        id: &str,
    ) -> Result<BackupStatus> {
        self.fetch(backup_request(Method::GET, backend, id)).await
    }

    #[tracing::instrument(skip(self, request))]
    pub async fn restore_backup(
        &self,
        backend: BackupBackend,
        id: &str,
        request: &RestoreRequest,
    ) -> Result<BackupStatus> {
        let request = backup_request(Method::POST, backend, id)
            .segment("restore")
            .json(request)?;
        self.fetch(request).await
    }

    pub async fn get_restore_status(
        &self,
        backend: BackupBackend,
        id: &str,
    ) -> Result<BackupStatus> {
        self.fetch(backup_request(Method::GET, backend, id).segment("restore"))
            .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn cancel_backup(&self, backend: BackupBackend, id: &str) -> Result<()> {
        self.send_empty(backup_request(Method::DELETE, backend, id))
            .await
    }

    // ---- Cluster ------------------------------------------------------

    /// Verbose node status, optionally narrowed to one class
    pub async fn get_nodes(&self, class_name: Option<&str>) -> Result<Value> {
        let mut request = ApiRequest::get("/nodes");
        if let Some(class_name) = class_name {
            request = request.segment(class_name);
        }
        self.fetch(request.query("output", "verbose")).await
    }

    pub async fn get_cluster_statistics(&self) -> Result<Value> {
        self.fetch(ApiRequest::get("/cluster/statistics")).await
    }

    // ---- Classification -----------------------------------------------

    #[tracing::instrument(skip(self, request), fields(class = %request.class))]
    pub async fn create_classification(&self, request: &ClassificationRequest) -> Result<Value> {
        self.fetch(ApiRequest::post("/classifications").json(request)?)
            .await
    }

    pub async fn get_classification(&self, id: Uuid) -> Result<Value> {
        self.fetch(ApiRequest::get("/classifications").segment(id))
            .await
    }
}

fn object_request(method: Method, class_name: &str, id: Uuid) -> ApiRequest {
    ApiRequest::new(method, "/objects")
        .segment(class_name)
        .segment(id)
}

fn reference_request(method: Method, class_name: &str, id: Uuid, property: &str) -> ApiRequest {
    object_request(method, class_name, id)
        .segment("references")
        .segment(property)
}

fn tenants_request(method: Method, class_name: &str) -> ApiRequest {
    ApiRequest::new(method, "/schema")
        .segment(class_name)
        .segment("tenants")
}

fn backup_request(method: Method, backend: BackupBackend, id: &str) -> ApiRequest {
    ApiRequest::new(method, "/backups")
        .segment(backend.as_str())
        .segment(id)
}
