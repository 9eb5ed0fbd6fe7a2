//! End-to-end request/response behavior against a local mock server

use std::sync::{Arc, Once};

use serde_json::json;
use tc_api_client::{
    ApiContext, ClientConfig, ExchangeDomain, Indicator, ListOptions, ReqwestTransport, TcClient,
    TcError,
};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

static TRACING: Once = Once::new();

fn init_tracing() {
    TRACING.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .init();
    });
}

fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig {
        tc_api_path: format!("{}/api", server.uri()),
        tc_token: "t".to_string(),
        tc_space_element_id: Some("42".to_string()),
    }
}

async fn client_for(server: &MockServer) -> TcClient {
    init_tracing();
    TcClient::from_config(config_for(server)).unwrap()
}

#[tokio::test]
async fn get_by_id_sends_token_and_owner() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/indicators/addresses/10.0.0.1"))
        .and(header("Authorization", "TC-Token t"))
        .and(query_param("owner", "Example Org"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "Success",
            "data": {"address": {"id": 7, "ip": "10.0.0.1"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let address = client
        .indicators()
        .get_by_id("10.0.0.1", "Address", Some("Example Org"))
        .await
        .unwrap();

    assert_eq!(address, json!({"id": 7, "ip": "10.0.0.1"}));
}

#[tokio::test]
async fn empty_owner_is_not_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/groups/adversaries/3"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "Success", "data": {}})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let adversary = client
        .groups()
        .get_by_id("3", "Adversary", Some(""), false, false)
        .await
        .unwrap();
    assert_eq!(adversary, json!({}));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].url.query_pairs().all(|(key, _)| key != "owner"));
}

#[tokio::test]
async fn create_indicator_routes_hash_by_length() {
    let sha1 = "a94a8fe5ccb19ba61c4c0873d391e987982fbbd3";
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/indicators/files"))
        .and(body_json(json!({
            "type": "File",
            "sha1": sha1.to_uppercase(),
            "rating": 3.0
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "status": "Success",
            "data": {"file": {"id": 99, "sha1": sha1.to_uppercase()}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let indicator = Indicator::new("File", sha1).with_rating(3.0);
    let created = client
        .indicators()
        .create_indicator(&indicator, None)
        .await
        .unwrap();

    assert_eq!(created["id"], 99);
}

#[tokio::test]
async fn bad_hash_length_never_reaches_the_server() {
    let server = MockServer::start().await;
    let client = client_for(&server).await;

    let indicator = Indicator::new("File", "abc123");
    let result = client.indicators().create_indicator(&indicator, None).await;

    assert!(matches!(result, Err(TcError::AmbiguousHashLength { length: 6 })));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn listing_is_normalized_on_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/indicators/files"))
        .and(query_param("resultLimit", "50"))
        .and(query_param("resultStart", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "Success",
            "data": {
                "resultCount": 1,
                "file": [{"id": 1, "sha256": "cd34"}]
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let files = client
        .indicators()
        .get_all("File", &ListOptions::new().limit(50), true)
        .await
        .unwrap();

    assert_eq!(files["resultCount"], 1);
    assert_eq!(files["indicator"][0]["summary"], " : : CD34");
    assert_eq!(files["indicator"][0]["type"], "File");
}

#[tokio::test]
async fn delete_with_empty_body_is_empty_object() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v2/indicators/hosts/evil.test/tags/APT%2028"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let result = client
        .tags()
        .delete_tag("evil.test", "Host", "APT 28", None)
        .await
        .unwrap();

    assert_eq!(result, json!({}));
}

#[tokio::test]
async fn error_status_is_returned_with_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/owners"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_string(r#"{"status":"Failure","message":"bad token"}"#),
        )
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.owners().get_all().await.unwrap_err();

    match err {
        TcError::Status { status, body, .. } => {
            assert_eq!(status, 401);
            assert!(body.contains("bad token"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn garbage_body_fails_outside_lenient_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/whoami"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let result = client.whoami().get().await;

    assert!(matches!(result, Err(TcError::UnparsableBody { .. })));
}

#[tokio::test]
async fn exchange_db_uses_post_with_db_method() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/exchange/db/organization/playbook/record-1"))
        .and(header("DB-Method", "DELETE"))
        .and(query_param("owner", "Example Org"))
        .respond_with(ResponseTemplate::new(200).set_body_string("deleted"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let result = client
        .exchange_db()
        .delete(ExchangeDomain::Organization, "playbook", "record-1", Some("Example Org"))
        .await
        .unwrap();

    assert_eq!(result, json!({}));
}

#[tokio::test]
async fn spaces_state_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/exchange/spaces/42/state"))
        .and(body_json(json!({"tab": "overview"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/exchange/spaces/42/state"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "Success",
            "data": {"tab": "overview"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let spaces = client.spaces();

    assert_eq!(spaces.commit_state(&json!({"tab": "overview"})).await.unwrap(), json!({}));
    assert_eq!(spaces.retrieve_state().await.unwrap(), json!({"tab": "overview"}));
}

struct RotatingToken {
    base: String,
    calls: std::sync::atomic::AtomicUsize,
}

impl ApiContext for RotatingToken {
    fn api_base_path(&self) -> String {
        self.base.clone()
    }

    fn current_token(&self) -> String {
        let n = self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        format!("token-{n}")
    }
}

#[tokio::test]
async fn token_is_read_for_every_request() {
    let server = MockServer::start().await;
    for token in ["TC-Token token-0", "TC-Token token-1"] {
        Mock::given(method("GET"))
            .and(path("/api/v2/indicatorTypes"))
            .and(header("Authorization", token))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "Success"})))
            .expect(1)
            .mount(&server)
            .await;
    }

    init_tracing();
    let context = RotatingToken {
        base: format!("{}/api", server.uri()),
        calls: Default::default(),
    };
    let client = TcClient::new(Arc::new(ReqwestTransport::new()), Arc::new(context)).unwrap();

    client.types().get_all().await.unwrap();
    client.types().get_all().await.unwrap();
}
