use notemark_core::{DocumentId, PageMetadata};
use notemark_engine::{
    DocumentService, NotionClient, ServiceSettings, WriteContext, WriteError, USER_HEADER,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DOC: &str = "01234567-89ab-cdef-0123-456789abcdef";

fn client(server: &MockServer) -> NotionClient {
    NotionClient::new(ServiceSettings {
        api_base: server.uri(),
        session_token: Some("secret".to_string()),
        ..ServiceSettings::default()
    })
    .expect("client builds")
}

fn doc_id() -> DocumentId {
    DocumentId::from_input(DOC).expect("valid id")
}

fn ctx() -> WriteContext {
    WriteContext {
        space_id: "space-1".to_string(),
        parent_id: doc_id(),
        user_id: "user-1".to_string(),
    }
}

async fn last_body(server: &MockServer) -> Value {
    let requests = server.received_requests().await.expect("recording enabled");
    let last = requests.last().expect("one request");
    serde_json::from_slice(&last.body).expect("json body")
}

#[tokio::test]
async fn resolves_space_id_from_record_map() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/loadPageChunk"))
        .and(header(USER_HEADER, "user-1"))
        .and(header("cookie", "token_v2=secret"))
        .and(body_partial_json(json!({"pageId": DOC, "limit": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "recordMap": {"block": {DOC: {"value": {"id": DOC, "space_id": "space-42"}}}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let space = client(&server)
        .resolve_space_id(&doc_id(), "user-1")
        .await
        .expect("space resolved");
    assert_eq!(space, "space-42");
}

#[tokio::test]
async fn missing_record_is_space_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/loadPageChunk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"recordMap": {"block": {}}})))
        .mount(&server)
        .await;

    let err = client(&server)
        .resolve_space_id(&doc_id(), "user-1")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        WriteError::SpaceNotFound {
            document_id: DOC.to_string()
        }
    );
}

#[tokio::test]
async fn rejected_page_load_is_space_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/loadPageChunk"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let err = client(&server)
        .resolve_space_id(&doc_id(), "user-1")
        .await
        .unwrap_err();
    assert!(matches!(err, WriteError::SpaceNotFound { .. }));
}

#[tokio::test]
async fn bookmark_write_omits_blank_caption() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/saveTransactions"))
        .and(header(USER_HEADER, "user-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let metadata = PageMetadata {
        title: Some("Title".into()),
        icon: Some("https://icons.example/i.png".into()),
        ..PageMetadata::default()
    };
    client(&server)
        .create_bookmark_block(&ctx(), &metadata, "https://example.com/a", Some(" \t "))
        .await
        .expect("write ok");

    let body = last_body(&server).await;
    let tx = &body["transactions"][0];
    assert_eq!(tx["spaceId"], "space-1");
    let args = &tx["operations"][0]["args"];
    assert_eq!(args["type"], "bookmark");
    assert_eq!(args["space_id"], "space-1");
    assert!(args["properties"].get("caption").is_none());
    assert!(args["format"].get("bookmark_cover").is_none());
    assert_eq!(args["format"]["bookmark_icon"], "https://icons.example/i.png");
    assert_eq!(tx["operations"][1]["command"], "listAfter");
}

#[tokio::test]
async fn bookmark_write_failure_carries_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/saveTransactions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client(&server)
        .create_bookmark_block(&ctx(), &PageMetadata::default(), "https://example.com", None)
        .await
        .unwrap_err();
    assert_eq!(err, WriteError::BookmarkRejected { status: 500 });
}

#[tokio::test]
async fn image_write_failure_is_distinct() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/saveTransactions"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = client(&server)
        .create_image_block(&ctx(), "https://cdn.example.com/c.png")
        .await
        .unwrap_err();
    assert_eq!(err, WriteError::ImageRejected { status: 403 });
}
