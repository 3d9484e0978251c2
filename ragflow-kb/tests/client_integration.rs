use ragflow_kb::client::RagflowClient;
use ragflow_kb_core::config::Settings;
use ragflow_kb_core::contract::{DocumentStatus, KnowledgeBaseApi};
use ragflow_kb_core::lister::list_all_documents;
use ragflow_kb_core::KbError;
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DOCS_PATH: &str = "/api/v1/datasets/kb-1/documents";

fn client_for(server: &MockServer) -> RagflowClient {
    RagflowClient::new(&Settings {
        api_url: format!("{}/api/v1", server.uri()),
        api_key: "test-key".into(),
    })
    .expect("client builds")
}

fn doc_json(i: usize) -> Value {
    json!({
        "id": format!("doc-{i}"),
        "name": format!("file-{i}.pdf"),
        "chunk_count": i * 10,
        "status": "SUCCESS",
        "size": 1024 * i,
        "run": "DONE"
    })
}

async fn mount_docs_page(server: &MockServer, page: u32, docs: Vec<Value>, total: usize) {
    Mock::given(method("GET"))
        .and(path(DOCS_PATH))
        .and(query_param("page", page.to_string()))
        .and(query_param("page_size", "2"))
        .and(header("Authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "data": { "docs": docs, "total": total }
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn lists_knowledge_bases_with_bearer_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/datasets"))
        .and(header("Authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "data": [
                {"id": "kb-1", "name": "Technical Docs", "document_count": 3, "chunk_count": 30, "language": "English"},
                {"id": "kb-2", "name": "HR"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let kbs = client_for(&server).list_knowledge_bases().await.unwrap();
    assert_eq!(kbs.len(), 2);
    assert_eq!(kbs[0].name, "Technical Docs");
    assert_eq!(kbs[0].document_count, 3);
    assert_eq!(kbs[1].chunk_count, 0);
}

#[tokio::test]
async fn entries_with_missing_or_null_fields_are_kept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/datasets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "data": [{"id": "kb-1", "name": "A"}, {"id": "kb-2"}, {"id": "kb-3", "name": null}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(DOCS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "data": {"docs": [{"id": "doc-1", "name": "a.pdf", "size": null, "chunk_count": null}], "total": 1}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let kbs = client.list_knowledge_bases().await.unwrap();
    assert_eq!(kbs.len(), 3);
    assert_eq!(kbs[1].name, "");

    let docs = list_all_documents(&client, "kb-1", 2).await.unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].size, 0);
    assert_eq!(docs[0].chunk_count, 0);
}

#[tokio::test]
async fn non_zero_envelope_code_is_an_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/datasets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 109,
            "message": "Authentication error: API key is invalid!"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).list_knowledge_bases().await.unwrap_err();
    assert!(matches!(err, KbError::Api(ref m) if m.contains("API key is invalid")));
}

#[tokio::test]
async fn http_failure_status_is_an_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/datasets"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client_for(&server).list_knowledge_bases().await.unwrap_err();
    assert!(matches!(err, KbError::Api(ref m) if m.contains("500")));
}

#[tokio::test]
async fn malformed_body_is_an_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/datasets"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy login</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).list_knowledge_bases().await.unwrap_err();
    assert!(matches!(err, KbError::Api(ref m) if m.contains("malformed")));
}

#[tokio::test]
async fn paginates_until_a_short_page() {
    let server = MockServer::start().await;
    mount_docs_page(&server, 1, vec![doc_json(1), doc_json(2)], 5).await;
    mount_docs_page(&server, 2, vec![doc_json(3), doc_json(4)], 5).await;
    mount_docs_page(&server, 3, vec![doc_json(5)], 5).await;

    let docs = list_all_documents(&client_for(&server), "kb-1", 2).await.unwrap();
    let ids: Vec<&str> = docs.iter().map(|d| d.document_id.as_str()).collect();
    assert_eq!(ids, ["doc-1", "doc-2", "doc-3", "doc-4", "doc-5"]);
    assert_eq!(docs[2].chunk_count, 30);
    assert_eq!(docs[2].size, 3072);
    assert_eq!(docs[2].status, DocumentStatus::Success);
}

#[tokio::test]
async fn reported_total_avoids_an_extra_empty_request() {
    let server = MockServer::start().await;
    mount_docs_page(&server, 1, vec![doc_json(1), doc_json(2)], 4).await;
    mount_docs_page(&server, 2, vec![doc_json(3), doc_json(4)], 4).await;
    Mock::given(method("GET"))
        .and(path(DOCS_PATH))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 0, "data": {"docs": []}})))
        .expect(0)
        .mount(&server)
        .await;

    let docs = list_all_documents(&client_for(&server), "kb-1", 2).await.unwrap();
    assert_eq!(docs.len(), 4);
}
