use mockito::{Matcher, Server};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::Method;
use serde_json::{json, Value};
use uuid::Uuid;
use weaviate_mcp_core::{
    BackupBackend, BackupRequest, BatchDeleteRequest, BatchReference, Bm25Params,
    ClassificationRequest, FilterOperator, FilterValue, HybridParams, NearObjectParams,
    NearTextParams, NearVectorParams, RestoreRequest, SingleRef, Tenant, TenantActivityStatus,
    WeaviateObject,
};
use weaviate_mcp_rs::{
    ApiRequest, Client, ClientError, Credentials, ErrorKind, ProviderKeys, QueryOptions,
    WhereFilter,
};

const OBJECT_ID: &str = "36ddd591-2dee-4e7e-a3cc-eb86d30a4303";
const AUTHOR_ID: &str = "8c1d0e2f-5a3b-4c7d-9e8f-0a1b2c3d4e5f";

fn client_for(server: &Server) -> Client {
    Client::new(Credentials::new(server.url()).with_api_key("secret"))
}

fn object_id() -> Uuid {
    Uuid::parse_str(OBJECT_ID).unwrap()
}

fn author_id() -> Uuid {
    Uuid::parse_str(AUTHOR_ID).unwrap()
}

fn article(title: &str) -> WeaviateObject {
    let mut object = WeaviateObject::new("Article");
    object.properties.insert("title".to_string(), json!(title));
    object
}

fn tenant_query(tenant: &str) -> Matcher {
    Matcher::UrlEncoded("tenant".into(), tenant.into())
}

#[tokio::test]
async fn test_missing_base_url_fails_without_network() {
    let client = Client::new(Credentials::default());

    let err = client.get_schema().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authentication);
    assert!(!err.is_retryable());

    assert!(!client.object_exists("Article", object_id(), None).await);
    assert!(!client.is_live().await);
}

#[tokio::test]
async fn test_auth_and_provider_headers_sent() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/v1/schema")
        .match_header("authorization", "Bearer secret")
        .match_header("x-openai-api-key", "sk-openai")
        .match_header("content-type", "application/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"classes":[{"class":"Article"}]}"#)
        .create_async()
        .await;

    let creds = Credentials::new(format!("{}/", server.url()))
        .with_api_key("secret")
        .with_provider_keys(ProviderKeys {
            openai: Some("sk-openai".to_string()),
            ..Default::default()
        });
    let schema = Client::new(creds).get_schema().await.unwrap();

    assert_eq!(schema["classes"][0]["class"], "Article");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_caller_headers_take_precedence() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/v1/meta")
        .match_header("authorization", "Bearer override")
        .with_status(200)
        .with_body(r#"{"version":"1.25.0"}"#)
        .create_async()
        .await;

    let request = ApiRequest::get("/meta")
        .header(AUTHORIZATION, HeaderValue::from_static("Bearer override"));
    let meta: Option<Value> = client_for(&server).send(request).await.unwrap();

    assert_eq!(meta.unwrap()["version"], "1.25.0");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_rate_limit_with_malformed_body() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v1/schema")
        .with_status(429)
        .with_header("retry-after", "5")
        .with_body("{oops")
        .create_async()
        .await;

    let err = client_for(&server).get_schema().await.unwrap_err();
    assert!(matches!(err, ClientError::RateLimit { retry_after: 5 }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_not_found_and_server_errors() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v1/schema/Missing")
        .with_status(404)
        .with_body(r#"{"error":[{"message":"ignored"}]}"#)
        .create_async()
        .await;
    server
        .mock("POST", "/v1/schema")
        .with_status(422)
        .with_body(r#"{"error":[{"message":"class name Article already exists"}]}"#)
        .create_async()
        .await;

    let client = client_for(&server);

    let err = client.get_class("Missing").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.status_code(), Some(404));

    let err = client
        .create_class(&json!({"class": "Article"}))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.status_code(), Some(422));
    assert!(err.to_string().contains("already exists"));
}

#[tokio::test]
async fn test_delete_with_no_content() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("DELETE", "/v1/schema/Article")
        .with_status(204)
        .create_async()
        .await;

    client_for(&server).delete_class("Article").await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_list_objects_pagination() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v1/objects")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("class".into(), "Article".into()),
            Matcher::UrlEncoded("limit".into(), "2".into()),
            Matcher::UrlEncoded("offset".into(), "4".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"{"objects":[{"class":"Article","properties":{}},{"class":"Article","properties":{}}],"totalResults":2}"#,
        )
        .create_async()
        .await;

    let page = client_for(&server)
        .list_objects("Article", 2, 4, None)
        .await
        .unwrap();

    assert_eq!(page.count(), 2);
    assert!(page.has_more());
    assert_eq!(page.next_cursor(), Some("6"));
    assert_eq!(page.total(), None);
}

#[tokio::test]
async fn test_object_exists() {
    let mut server = Server::new_async().await;
    let path = format!("/v1/objects/Article/{}", OBJECT_ID);
    server
        .mock("HEAD", path.as_str())
        .with_status(204)
        .create_async()
        .await;

    let client = client_for(&server);
    assert!(client.object_exists("Article", object_id(), None).await);
    assert!(!client.object_exists("Other", object_id(), None).await);

    let unreachable = Client::new(Credentials::new("http://127.0.0.1:1"));
    assert!(!unreachable.object_exists("Article", object_id(), None).await);
}

#[tokio::test]
async fn test_get_object_query() {
    let mut server = Server::new_async().await;
    let path = format!("/v1/objects/Article/{}", OBJECT_ID);
    server
        .mock("GET", path.as_str())
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("include".into(), "vector".into()),
            Matcher::UrlEncoded("tenant".into(), "tenantA".into()),
        ]))
        .with_status(200)
        .with_body(format!(
            r#"{{"id":"{}","class":"Article","properties":{{"title":"Hi"}},"vector":[0.5,1.0]}}"#,
            OBJECT_ID
        ))
        .create_async()
        .await;

    let object = client_for(&server)
        .get_object("Article", object_id(), true, Some("tenantA"))
        .await
        .unwrap();

    assert_eq!(object.id, Some(object_id()));
    assert_eq!(object.vector, Some(vec![0.5, 1.0]));
}

#[tokio::test]
async fn test_near_text_search() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/graphql")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r"nearText: \{ concepts: ".to_string()),
            Matcher::Regex("limit: 5".to_string()),
        ]))
        .with_status(200)
        .with_body(r#"{"data":{"Get":{"Animal":[{"name":"Tom"},{"name":"Felix"}]}}}"#)
        .create_async()
        .await;

    let options = QueryOptions {
        limit: Some(5),
        ..Default::default()
    };
    let params = NearTextParams {
        concepts: vec!["cat".to_string()],
        ..Default::default()
    };
    let hits = client_for(&server)
        .near_text("Animal", params, &options)
        .await
        .unwrap();

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[1]["name"], "Felix");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_graphql_errors_surface() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/graphql")
        .with_status(200)
        .with_body(r#"{"data":{"Get":{"Animal":null}},"errors":[{"message":"Cannot query field"}]}"#)
        .create_async()
        .await;

    let params = HybridParams {
        query: "cat".to_string(),
        alpha: Some(0.3),
        ..Default::default()
    };
    let err = client_for(&server)
        .hybrid("Animal", params, &QueryOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.to_string().contains("Cannot query field"));
}

#[tokio::test]
async fn test_tenant_exists() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v1/schema/Article/tenants")
        .with_status(200)
        .with_body(r#"[{"name":"tenantA","activityStatus":"HOT"}]"#)
        .create_async()
        .await;
    server
        .mock("GET", "/v1/schema/Broken/tenants")
        .with_status(500)
        .create_async()
        .await;

    let client = client_for(&server);
    assert!(client.tenant_exists("Article", "tenantA").await);
    assert!(!client.tenant_exists("Article", "tenantB").await);
    assert!(!client.tenant_exists("Broken", "tenantA").await);
}

#[tokio::test]
async fn test_create_tenants_body() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/schema/Article/tenants")
        .match_body(Matcher::Json(json!([{"name": "t1"}, {"name": "t2"}])))
        .with_status(200)
        .with_body(r#"[{"name":"t1"},{"name":"t2"}]"#)
        .create_async()
        .await;

    let created = client_for(&server)
        .create_tenants("Article", &[Tenant::new("t1"), Tenant::new("t2")])
        .await
        .unwrap();

    assert_eq!(created.len(), 2);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_health_probes() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v1/.well-known/live")
        .with_status(200)
        .create_async()
        .await;
    server
        .mock("GET", "/v1/.well-known/ready")
        .with_status(503)
        .create_async()
        .await;

    let client = client_for(&server);
    assert!(client.is_live().await);
    assert!(!client.is_ready().await);
}

#[tokio::test]
async fn test_backup_lifecycle() {
    let mut server = Server::new_async().await;
    let create = server
        .mock("POST", "/v1/backups/filesystem")
        .match_body(Matcher::PartialJson(json!({"id": "bk1", "include": ["Article"]})))
        .with_status(200)
        .with_body(r#"{"id":"bk1","backend":"filesystem","status":"STARTED"}"#)
        .create_async()
        .await;
    let cancel = server
        .mock("DELETE", "/v1/backups/filesystem/bk1")
        .with_status(204)
        .create_async()
        .await;

    let client = client_for(&server);
    let status = client
        .create_backup(
            BackupBackend::Filesystem,
            &BackupRequest {
                id: "bk1".to_string(),
                include: vec!["Article".to_string()],
                exclude: vec![],
            },
        )
        .await
        .unwrap();
    assert_eq!(status.status, "STARTED");

    client
        .cancel_backup(BackupBackend::Filesystem, "bk1")
        .await
        .unwrap();

    create.assert_async().await;
    cancel.assert_async().await;
}

#[tokio::test]
async fn test_batch_delete_body() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("DELETE", "/v1/batch/objects")
        .match_body(Matcher::PartialJson(json!({
            "match": {
                "class": "Article",
                "where": {"operator": "Equal", "path": ["status"], "valueText": "draft"}
            },
            "dryRun": true
        })))
        .with_status(200)
        .with_body(r#"{"results":{"matches":3,"successful":0}}"#)
        .create_async()
        .await;

    let filter = WhereFilter::condition(
        FilterOperator::Equal,
        ["status"],
        FilterValue::Text("draft".to_string()),
    )
    .unwrap();
    let mut request = BatchDeleteRequest::new("Article", filter);
    request.dry_run = true;

    let report = client_for(&server)
        .batch_delete_objects(&request, None)
        .await
        .unwrap();

    assert_eq!(report["results"]["matches"], 3);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_empty_body_where_data_expected() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v1/cluster/statistics")
        .with_status(200)
        .create_async()
        .await;

    let err = client_for(&server)
        .get_cluster_statistics()
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn test_transport_failure_is_retryable() {
    let client = Client::new(Credentials::new("http://127.0.0.1:1"));
    let err = client.get_meta().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.status_code(), None);
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_caller_segments_cannot_change_endpoint() {
    let mut server = Server::new_async().await;
    let encoded = server
        .mock("DELETE", "/v1/backups/filesystem/bk1%2Frestore")
        .with_status(204)
        .create_async()
        .await;
    let restore = server
        .mock("DELETE", "/v1/backups/filesystem/bk1/restore")
        .with_status(204)
        .expect(0)
        .create_async()
        .await;
    let class = server
        .mock("GET", "/v1/schema/Article%3Fx=1%23top")
        .with_status(200)
        .with_body(r#"{"class":"Article"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    client
        .cancel_backup(BackupBackend::Filesystem, "bk1/restore")
        .await
        .unwrap();
    client.get_class("Article?x=1#top").await.unwrap();

    encoded.assert_async().await;
    restore.assert_async().await;
    class.assert_async().await;
}

#[tokio::test]
async fn test_object_writes() {
    let mut server = Server::new_async().await;
    let path = format!("/v1/objects/Article/{}", OBJECT_ID);
    let create = server
        .mock("POST", "/v1/objects")
        .match_body(Matcher::Json(json!({
            "class": "Article",
            "properties": {"title": "First"}
        })))
        .with_status(200)
        .with_body(format!(
            r#"{{"id":"{}","class":"Article","properties":{{"title":"First"}},"creationTimeUnix":1700000000000}}"#,
            OBJECT_ID
        ))
        .create_async()
        .await;
    let update = server
        .mock("PUT", path.as_str())
        .match_body(Matcher::PartialJson(json!({"properties": {"title": "Second"}})))
        .with_status(200)
        .with_body(r#"{"class":"Article","properties":{"title":"Second"}}"#)
        .create_async()
        .await;
    let patch = server
        .mock("PATCH", path.as_str())
        .match_body(Matcher::PartialJson(json!({"properties": {"title": "Third"}})))
        .with_status(204)
        .create_async()
        .await;

    let client = client_for(&server);
    let created = client.create_object(&article("First")).await.unwrap();
    assert_eq!(created.id, Some(object_id()));
    assert!(created.created_at().is_some());

    let updated = client
        .update_object(object_id(), &article("Second"))
        .await
        .unwrap();
    assert_eq!(updated.properties["title"], "Second");

    client
        .patch_object(object_id(), &article("Third"))
        .await
        .unwrap();

    create.assert_async().await;
    update.assert_async().await;
    patch.assert_async().await;
}

#[tokio::test]
async fn test_add_property_and_shards() {
    let mut server = Server::new_async().await;
    let property = json!({"name": "summary", "dataType": ["text"]});
    let add = server
        .mock("POST", "/v1/schema/Article/properties")
        .match_body(Matcher::Json(property.clone()))
        .with_status(200)
        .with_body(property.to_string())
        .create_async()
        .await;
    let shards = server
        .mock("GET", "/v1/schema/Article/shards")
        .with_status(200)
        .with_body(r#"[{"name":"shard-1","status":"READY"}]"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let added = client.add_property("Article", &property).await.unwrap();
    assert_eq!(added["name"], "summary");

    let status = client.get_shards("Article").await.unwrap();
    assert_eq!(status[0]["status"], "READY");

    add.assert_async().await;
    shards.assert_async().await;
}

#[tokio::test]
async fn test_batch_objects_and_references() {
    let mut server = Server::new_async().await;
    let objects = server
        .mock("POST", "/v1/batch/objects")
        .match_body(Matcher::Json(json!({
            "objects": [
                {"class": "Article", "properties": {"title": "a"}},
                {"class": "Article", "properties": {"title": "b"}}
            ]
        })))
        .with_status(200)
        .with_body(r#"[{"class":"Article","result":{}},{"class":"Article","result":{}}]"#)
        .create_async()
        .await;
    let references = server
        .mock("POST", "/v1/batch/references")
        .match_body(Matcher::Json(json!([{
            "from": format!("weaviate://localhost/Article/{}/authors", OBJECT_ID),
            "to": format!("weaviate://localhost/Author/{}", AUTHOR_ID),
            "tenant": "tenantA"
        }])))
        .with_status(200)
        .with_body(r#"[{"result":{}}]"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let created = client
        .batch_create_objects(&[article("a"), article("b")])
        .await
        .unwrap();
    assert_eq!(created.len(), 2);

    let reference = BatchReference::new(
        "Article",
        object_id(),
        "authors",
        Some("Author"),
        author_id(),
    )
    .with_tenant("tenantA");
    let results = client.batch_add_references(&[reference]).await.unwrap();
    assert_eq!(results.len(), 1);

    objects.assert_async().await;
    references.assert_async().await;
}

#[tokio::test]
async fn test_reference_endpoints() {
    let mut server = Server::new_async().await;
    let path = format!("/v1/objects/Article/{}/references/authors", OBJECT_ID);
    let beacon = format!("weaviate://localhost/Author/{}", AUTHOR_ID);
    let add = server
        .mock("POST", path.as_str())
        .match_query(tenant_query("tenantA"))
        .match_body(Matcher::Json(json!({"beacon": beacon})))
        .with_status(200)
        .create_async()
        .await;
    let replace = server
        .mock("PUT", path.as_str())
        .match_body(Matcher::Json(json!([{"beacon": beacon}])))
        .with_status(200)
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", path.as_str())
        .match_body(Matcher::Json(json!({"beacon": beacon})))
        .with_status(204)
        .create_async()
        .await;

    let client = client_for(&server);
    let reference = SingleRef::to(Some("Author"), author_id());
    client
        .add_reference("Article", object_id(), "authors", &reference, Some("tenantA"))
        .await
        .unwrap();
    client
        .replace_references(
            "Article",
            object_id(),
            "authors",
            std::slice::from_ref(&reference),
            None,
        )
        .await
        .unwrap();
    client
        .delete_reference("Article", object_id(), "authors", &reference, None)
        .await
        .unwrap();

    add.assert_async().await;
    replace.assert_async().await;
    delete.assert_async().await;
}

#[tokio::test]
async fn test_vector_object_and_keyword_searches() {
    let mut server = Server::new_async().await;
    let hits = r#"{"data":{"Get":{"Article":[{"title":"Rust"}]}}}"#;
    let near_vector = server
        .mock("POST", "/v1/graphql")
        .match_body(Matcher::Regex(r"nearVector: \{ vector: \[0\.5, 1\] \}".to_string()))
        .with_status(200)
        .with_body(hits)
        .create_async()
        .await;
    let near_object = server
        .mock("POST", "/v1/graphql")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(format!(r#"nearObject: \{{ id: \\"{}\\""#, OBJECT_ID)),
            Matcher::Regex("distance: 0.2".to_string()),
        ]))
        .with_status(200)
        .with_body(hits)
        .create_async()
        .await;
    let bm25 = server
        .mock("POST", "/v1/graphql")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"bm25: \{ query: \\"rust\\""#.to_string()),
            Matcher::Regex(r#"tenant: \\"tenantA\\""#.to_string()),
        ]))
        .with_status(200)
        .with_body(hits)
        .create_async()
        .await;

    let client = client_for(&server);
    let options = QueryOptions::default();

    let params = NearVectorParams {
        vector: vec![0.5, 1.0],
        ..Default::default()
    };
    let found = client.near_vector("Article", params, &options).await.unwrap();
    assert_eq!(found[0]["title"], "Rust");

    let params = NearObjectParams {
        id: object_id(),
        certainty: None,
        distance: Some(0.2),
    };
    let found = client.near_object("Article", params, &options).await.unwrap();
    assert_eq!(found.len(), 1);

    let params = Bm25Params {
        query: "rust".to_string(),
        properties: vec!["title".to_string()],
    };
    let options = QueryOptions {
        tenant: Some("tenantA".to_string()),
        ..Default::default()
    };
    let found = client.bm25("Article", params, &options).await.unwrap();
    assert_eq!(found.len(), 1);

    near_vector.assert_async().await;
    near_object.assert_async().await;
    bm25.assert_async().await;
}

#[tokio::test]
async fn test_non_finite_search_never_sent() {
    let mut server = Server::new_async().await;
    let graphql = server
        .mock("POST", "/v1/graphql")
        .with_status(200)
        .expect(0)
        .create_async()
        .await;

    let params = NearVectorParams {
        vector: vec![f32::NAN],
        ..Default::default()
    };
    let err = client_for(&server)
        .near_vector("Article", params, &QueryOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    match err {
        ClientError::Validation { fields, .. } => assert!(fields.contains_key("vector")),
        other => panic!("unexpected error: {other:?}"),
    }
    graphql.assert_async().await;
}

#[tokio::test]
async fn test_raw_graphql_and_request() {
    let mut server = Server::new_async().await;
    let query = "{ Aggregate { Article { meta { count } } } }";
    let graphql = server
        .mock("POST", "/v1/graphql")
        .match_body(Matcher::Json(json!({"query": query})))
        .with_status(200)
        .with_body(r#"{"data":{"Aggregate":{"Article":[{"meta":{"count":42}}]}}}"#)
        .create_async()
        .await;
    let raw = server
        .mock("PUT", "/v1/schema/Article")
        .match_header("authorization", "Bearer secret")
        .match_body(Matcher::Json(json!({"class": "Article", "description": "news"})))
        .with_status(200)
        .with_body(r#"{"class":"Article","description":"news"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let data = client.graphql(query).await.unwrap();
    assert_eq!(data["Aggregate"]["Article"][0]["meta"]["count"], 42);

    let body = json!({"class": "Article", "description": "news"});
    let updated: Option<Value> = client
        .request(Method::PUT, "/schema/Article", Some(&body))
        .await
        .unwrap();
    assert_eq!(updated.unwrap()["description"], "news");

    graphql.assert_async().await;
    raw.assert_async().await;
}

#[tokio::test]
async fn test_update_and_delete_tenants() {
    let mut server = Server::new_async().await;
    let update = server
        .mock("PUT", "/v1/schema/Article/tenants")
        .match_body(Matcher::Json(json!([{"name": "t1", "activityStatus": "COLD"}])))
        .with_status(200)
        .with_body(r#"[{"name":"t1","activityStatus":"COLD"}]"#)
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/v1/schema/Article/tenants")
        .match_body(Matcher::Json(json!(["t1", "t2"])))
        .with_status(200)
        .create_async()
        .await;

    let client = client_for(&server);
    let tenant = Tenant {
        name: "t1".to_string(),
        activity_status: Some(TenantActivityStatus::Cold),
    };
    let updated = client.update_tenants("Article", &[tenant]).await.unwrap();
    assert_eq!(updated[0].activity_status, Some(TenantActivityStatus::Cold));

    client
        .delete_tenants("Article", &["t1".to_string(), "t2".to_string()])
        .await
        .unwrap();

    update.assert_async().await;
    delete.assert_async().await;
}

#[tokio::test]
async fn test_backup_restore_lifecycle() {
    let mut server = Server::new_async().await;
    let status = server
        .mock("GET", "/v1/backups/s3/bk1")
        .with_status(200)
        .with_body(r#"{"id":"bk1","backend":"s3","status":"SUCCESS"}"#)
        .create_async()
        .await;
    let restore = server
        .mock("POST", "/v1/backups/s3/bk1/restore")
        .match_body(Matcher::Json(json!({"include": ["Article"]})))
        .with_status(200)
        .with_body(r#"{"id":"bk1","backend":"s3","status":"STARTED"}"#)
        .create_async()
        .await;
    let restore_status = server
        .mock("GET", "/v1/backups/s3/bk1/restore")
        .with_status(200)
        .with_body(r#"{"id":"bk1","backend":"s3","status":"TRANSFERRING"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let backup = client
        .get_backup_status(BackupBackend::S3, "bk1")
        .await
        .unwrap();
    assert_eq!(backup.status, "SUCCESS");

    let request = RestoreRequest {
        include: vec!["Article".to_string()],
        exclude: vec![],
    };
    let started = client
        .restore_backup(BackupBackend::S3, "bk1", &request)
        .await
        .unwrap();
    assert_eq!(started.status, "STARTED");

    let progress = client
        .get_restore_status(BackupBackend::S3, "bk1")
        .await
        .unwrap();
    assert_eq!(progress.status, "TRANSFERRING");

    status.assert_async().await;
    restore.assert_async().await;
    restore_status.assert_async().await;
}

#[tokio::test]
async fn test_nodes_and_classification() {
    let mut server = Server::new_async().await;
    let verbose = Matcher::UrlEncoded("output".into(), "verbose".into());
    let all_nodes = server
        .mock("GET", "/v1/nodes")
        .match_query(verbose.clone())
        .with_status(200)
        .with_body(r#"{"nodes":[{"name":"node-1","status":"HEALTHY"}]}"#)
        .create_async()
        .await;
    let class_nodes = server
        .mock("GET", "/v1/nodes/Article")
        .match_query(verbose)
        .with_status(200)
        .with_body(r#"{"nodes":[{"name":"node-1","shards":[{"class":"Article"}]}]}"#)
        .create_async()
        .await;
    let classification_id = Uuid::new_v4();
    let start = server
        .mock("POST", "/v1/classifications")
        .match_body(Matcher::PartialJson(json!({
            "class": "Article",
            "classifyProperties": ["category"],
            "basedOnProperties": ["summary"],
            "type": "knn"
        })))
        .with_status(201)
        .with_body(format!(r#"{{"id":"{}","status":"running"}}"#, classification_id))
        .create_async()
        .await;
    let classification_path = format!("/v1/classifications/{}", classification_id);
    let poll = server
        .mock("GET", classification_path.as_str())
        .with_status(200)
        .with_body(r#"{"status":"completed"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let nodes = client.get_nodes(None).await.unwrap();
    assert_eq!(nodes["nodes"][0]["status"], "HEALTHY");
    let nodes = client.get_nodes(Some("Article")).await.unwrap();
    assert_eq!(nodes["nodes"][0]["shards"][0]["class"], "Article");

    let request = ClassificationRequest {
        class: "Article".to_string(),
        classify_properties: vec!["category".to_string()],
        based_on_properties: vec!["summary".to_string()],
        classification_type: "knn".to_string(),
        settings: Some(json!({"k": 3})),
    };
    let started = client.create_classification(&request).await.unwrap();
    assert_eq!(started["status"], "running");

    let done = client
        .get_classification(classification_id)
        .await
        .unwrap();
    assert_eq!(done["status"], "completed");

    all_nodes.assert_async().await;
    class_nodes.assert_async().await;
    start.assert_async().await;
    poll.assert_async().await;
}
