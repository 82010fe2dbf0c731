use devfolio_auth::{ApiClient, ApiError, ApiRequest, AuthEvent, AuthState, Session};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Deserialize, PartialEq)]
struct Skill {
    id: i64,
    name: String,
}

fn signed_in_client(server: &MockServer) -> ApiClient {
    let session = Arc::new(Session::in_memory());
    session.store_tokens("old_access", "refresh_token").unwrap();
    session.apply(AuthEvent::Restored);
    ApiClient::new(&server.uri(), Client::new(), session)
}

async fn mount_skills(server: &MockServer, token: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path("/portfolios/skills/"))
        .and(header("authorization", format!("Bearer {}", token).as_str()))
        .respond_with(
            ResponseTemplate::new(status).set_body_json(json!([{"id": 1, "name": "Rust"}])),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_expired_access_token_is_refreshed_transparently() {
    let mock_server = MockServer::start().await;

    mount_skills(&mock_server, "old_access", 401).await;
    mount_skills(&mock_server, "new_access", 200).await;

    Mock::given(method("POST"))
        .and(path("/users/token/refresh/"))
        .and(body_json(json!({"refresh": "refresh_token"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "new_access"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = signed_in_client(&mock_server);
    let skills: Vec<Skill> = client
        .execute_list(ApiRequest::get("/portfolios/skills/"))
        .await
        .unwrap();

    assert_eq!(skills, vec![Skill { id: 1, name: "Rust".into() }]);
    assert_eq!(client.session().access_token().as_deref(), Some("new_access"));
    assert_eq!(client.session().refresh_token().as_deref(), Some("refresh_token"));
    assert_eq!(client.session().state(), AuthState::Authenticated);
}

#[tokio::test]
async fn test_rotated_refresh_token_is_stored() {
    let mock_server = MockServer::start().await;

    mount_skills(&mock_server, "old_access", 401).await;
    mount_skills(&mock_server, "new_access", 200).await;

    Mock::given(method("POST"))
        .and(path("/users/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": "new_access",
            "refresh": "rotated_refresh"
        })))
        .mount(&mock_server)
        .await;

    let client = signed_in_client(&mock_server);
    let _: Vec<Skill> = client
        .execute_list(ApiRequest::get("/portfolios/skills/"))
        .await
        .unwrap();

    assert_eq!(
        client.session().refresh_token().as_deref(),
        Some("rotated_refresh")
    );
}

#[tokio::test]
async fn test_second_unauthorized_ends_session() {
    let mock_server = MockServer::start().await;

    mount_skills(&mock_server, "old_access", 401).await;
    mount_skills(&mock_server, "new_access", 401).await;

    Mock::given(method("POST"))
        .and(path("/users/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "new_access"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = signed_in_client(&mock_server);
    let mut state = client.session().subscribe();

    let err = client
        .execute_list::<Skill>(ApiRequest::get("/portfolios/skills/"))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::SessionExpired));
    assert!(err.requires_login());
    assert!(client.session().access_token().is_none());
    assert!(client.session().refresh_token().is_none());
    assert_eq!(*state.borrow_and_update(), AuthState::Anonymous);
}

#[tokio::test]
async fn test_invalid_refresh_token_clears_tokens() {
    let mock_server = MockServer::start().await;

    mount_skills(&mock_server, "old_access", 401).await;

    Mock::given(method("POST"))
        .and(path("/users/token/refresh/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Token is invalid or expired",
            "code": "token_not_valid"
        })))
        .mount(&mock_server)
        .await;

    let client = signed_in_client(&mock_server);
    let err = client
        .execute::<Vec<Skill>>(ApiRequest::get("/portfolios/skills/"))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::SessionExpired));
    assert!(client.session().access_token().is_none());
    assert_eq!(client.session().state(), AuthState::Anonymous);
}

#[tokio::test]
async fn test_missing_refresh_token_surfaces_session_expired() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/portfolios/skills/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let session = Arc::new(Session::in_memory());
    session.store_access_token("orphan_access").unwrap();
    let client = ApiClient::new(&mock_server.uri(), Client::new(), session);

    let err = client
        .execute_list::<Skill>(ApiRequest::get("/portfolios/skills/"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::SessionExpired));
    assert!(client.session().access_token().is_none());
}

#[tokio::test]
async fn test_concurrent_unauthorized_requests_share_one_refresh() {
    let mock_server = MockServer::start().await;

    mount_skills(&mock_server, "old_access", 401).await;
    mount_skills(&mock_server, "new_access", 200).await;

    Mock::given(method("POST"))
        .and(path("/users/token/refresh/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access": "new_access"}))
                .set_delay(std::time::Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = signed_in_client(&mock_server);
    let (first, second, third) = tokio::join!(
        client.execute_list::<Skill>(ApiRequest::get("/portfolios/skills/")),
        client.execute_list::<Skill>(ApiRequest::get("/portfolios/skills/")),
        client.execute_list::<Skill>(ApiRequest::get("/portfolios/skills/")),
    );

    assert_eq!(first.unwrap().len(), 1);
    assert_eq!(second.unwrap().len(), 1);
    assert_eq!(third.unwrap().len(), 1);
}

#[tokio::test]
async fn test_paginated_and_missing_lists() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 2,
            "next": null,
            "previous": null,
            "results": [{"id": 1, "name": "one"}, {"id": 2, "name": "two"}]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/portfolios/education/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Not found."})))
        .mount(&mock_server)
        .await;

    let client = signed_in_client(&mock_server);

    let projects: Vec<Skill> = client.execute_list(ApiRequest::get("/projects/")).await.unwrap();
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[1].name, "two");

    let education: Vec<Skill> = client
        .execute_list(ApiRequest::get("/portfolios/education/"))
        .await
        .unwrap();
    assert!(education.is_empty());
}
