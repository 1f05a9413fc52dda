//! HTTP gateway against a mock REST backend.

use chefdesk::gateway::{HttpGateway, IngredientApi, ListQuery};
use chefdesk::session::{Identity, SessionContext};
use chefdesk::{ChefdeskError, Config, IngredientForm};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ingredient_json(id: i64, name: &str, unit: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "unit": unit,
        "createdAt": "2024-01-01T00:00:00.000Z",
        "updatedAt": "2024-01-02T00:00:00.000Z"
    })
}

fn logged_in() -> SessionContext {
    let session = SessionContext::new();
    session
        .establish(Identity {
            id: 42,
            username: "gordon".into(),
            name: "Gordon".into(),
            login_time: None,
        })
        .unwrap();
    session
}

fn gateway(server: &MockServer, session: SessionContext) -> HttpGateway {
    let config = Config {
        base_url: server.uri(),
        ..Config::default()
    };
    HttpGateway::new(&config, session).unwrap()
}

#[tokio::test]
async fn list_sends_paging_identity_and_json_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/ingredients"))
        .and(query_param("current", "2"))
        .and(query_param("pageSize", "5"))
        .and(query_param("search", "salt"))
        .and(header("x-chef-id", "42"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [ingredient_json(2, "Salt", "g")],
            "total": 6,
            "current": 2,
            "pageSize": 5
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = gateway(&server, logged_in())
        .list(&ListQuery::page(2, 5).with_search("salt"))
        .await
        .unwrap();

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].name, "Salt");
    assert_eq!((page.total, page.current, page.page_size), (6, 2, 5));
}

#[tokio::test]
async fn list_accepts_timestamps_without_offset() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/ingredients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [
                ingredient_json(1, "Flour", "kg"),
                {
                    "id": 2,
                    "name": "Salt",
                    "unit": "g",
                    "createdAt": "2024-03-01T08:00:00",
                    "updatedAt": "2024-03-01T08:00:00"
                }
            ],
            "total": 2
        })))
        .mount(&server)
        .await;

    let page = gateway(&server, logged_in())
        .list(&ListQuery::page(1, 10))
        .await
        .unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[1].created_at.to_rfc3339(), "2024-03-01T08:00:00+00:00");
}

#[tokio::test]
async fn empty_search_is_not_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/ingredients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [],
            "total": 0
        })))
        .mount(&server)
        .await;

    let page = gateway(&server, logged_in())
        .list(&ListQuery::page(1, 10).with_search(""))
        .await
        .unwrap();
    assert_eq!((page.current, page.page_size), (1, 10));

    let requests = server.received_requests().await.unwrap();
    let keys: Vec<String> = requests[0]
        .url
        .query_pairs()
        .map(|(k, _)| k.into_owned())
        .collect();
    assert_eq!(keys, vec!["current", "pageSize"]);
}

#[tokio::test]
async fn create_posts_form_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ingredients"))
        .and(body_json(json!({ "name": "Butter", "unit": "g" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "data": ingredient_json(4, "Butter", "g")
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = gateway(&server, logged_in())
        .create(&IngredientForm::new("Butter", "g"))
        .await
        .unwrap();
    assert_eq!(created.id, 4);
    assert!(created.has_monotonic_timestamps());
}

#[tokio::test]
async fn update_and_delete_address_the_record() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/ingredients/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": ingredient_json(2, "Sea Salt", "g")
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/ingredients/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway(&server, logged_in());
    let updated = gateway
        .update(2, &IngredientForm::new("Sea Salt", "g"))
        .await
        .unwrap();
    assert_eq!(updated.name, "Sea Salt");
    gateway.delete(2).await.unwrap();
}

#[tokio::test]
async fn body_level_failure_is_an_application_error() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "ingredient is used by a recipe"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": false })))
        .mount(&server)
        .await;

    let gateway = gateway(&server, logged_in());
    let err = gateway.delete(7).await.unwrap_err();
    assert!(matches!(err, ChefdeskError::Application { .. }));
    assert_eq!(err.to_string(), "ingredient is used by a recipe");

    let err = gateway
        .create(&IngredientForm::new("Butter", "g"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "create failed");
}

#[tokio::test]
async fn transport_errors_carry_body_message_or_status_line() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "message": "unit is too long" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let gateway = gateway(&server, logged_in());
    match gateway.update(1, &IngredientForm::new("Flour", "kg")).await {
        Err(ChefdeskError::Transport { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "unit is too long");
        }
        other => panic!("expected transport error, got {other:?}"),
    }

    let err = gateway.list(&ListQuery::default()).await.unwrap_err();
    assert_eq!(err.to_string(), "request failed: 500 Internal Server Error");
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let config = Config {
        base_url: format!("http://127.0.0.1:{port}"),
        ..Config::default()
    };
    let gateway = HttpGateway::new(&config, logged_in()).unwrap();

    let err = gateway.list(&ListQuery::default()).await.unwrap_err();
    assert!(matches!(err, ChefdeskError::Network { .. }));
    assert_eq!(err.to_string(), "network error");
}

#[tokio::test]
async fn login_is_sent_without_identity_and_establishes_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chefs/login"))
        .and(body_json(json!({ "username": "gordon", "password": "s3cret" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "id": 7, "username": "gordon", "name": "Gordon" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    // A stale identity must not leak into the login request.
    let session = logged_in();
    let gateway = gateway(&server, session.clone());
    let identity = gateway.login("gordon", "s3cret").await.unwrap();

    assert_eq!(identity.id, 7);
    assert!(identity.login_time.is_some());
    assert_eq!(session.identity_token().as_deref(), Some("7"));

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("x-chef-id").is_none());

    gateway.logout().unwrap();
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn rejected_login_leaves_session_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chefs/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": false })))
        .mount(&server)
        .await;

    let session = SessionContext::new();
    let err = gateway(&server, session.clone())
        .login("gordon", "wrong")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "login failed");
    assert!(!session.is_authenticated());
}
