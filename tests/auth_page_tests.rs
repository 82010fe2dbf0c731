use devfolio::auth::{AuthState, FileTokenStore, RegisterRequest, Session};
use devfolio::config::ClientOptions;
use devfolio::pages::NoticeKind;
use devfolio::routes::Route;
use devfolio::Devfolio;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn user_json() -> serde_json::Value {
    json!({
        "id": 1,
        "email": "jane@example.com",
        "username": "jane",
        "first_name": "Jane",
        "last_name": "Doe"
    })
}

fn client(server: &MockServer) -> Devfolio {
    Devfolio::new(ClientOptions::default().with_api_url(&server.uri())).unwrap()
}

#[tokio::test]
async fn test_login_persists_tokens_and_redirects_to_dashboard() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let token_file = dir.path().join("tokens.json");

    Mock::given(method("POST"))
        .and(path("/users/login/"))
        .and(body_json(json!({"email": "jane@example.com", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": "a1",
            "refresh": "r1"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/users/profile/"))
        .and(header("authorization", "Bearer a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let options = ClientOptions::default()
        .with_api_url(&mock_server.uri())
        .with_token_file(Some(token_file.clone()));
    let devfolio = Devfolio::new(options).unwrap();
    let mut page = devfolio.auth_page();

    assert!(page.login("jane@example.com", "secret").await);
    assert!(!page.is_submitting());
    assert_eq!(page.user().map(|u| u.username.as_str()), Some("jane"));
    assert_eq!(page.state().redirect(), Some(&Route::Dashboard));
    let notice = page.state().last_notice().unwrap();
    assert_eq!(notice.kind, NoticeKind::Success);
    assert_eq!(notice.message, "Login successful!");
    assert_eq!(devfolio.session().state(), AuthState::Authenticated);

    let reopened = Session::new(Arc::new(FileTokenStore::new(&token_file))).unwrap();
    assert_eq!(reopened.access_token().as_deref(), Some("a1"));
    assert_eq!(reopened.refresh_token().as_deref(), Some("r1"));
}

#[tokio::test]
async fn test_login_failure_shows_detail() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users/login/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "No active account found with the given credentials"
        })))
        .mount(&mock_server)
        .await;

    let devfolio = client(&mock_server);
    let mut page = devfolio.auth_page();

    assert!(!page.login("jane@example.com", "wrong").await);
    assert_eq!(page.state().redirect(), None);
    assert!(page.user().is_none());
    let notice = page.state().last_notice().unwrap();
    assert_eq!(notice.kind, NoticeKind::Error);
    assert_eq!(notice.message, "No active account found with the given credentials");
    assert_eq!(devfolio.session().state(), AuthState::Anonymous);
}

#[tokio::test]
async fn test_login_failure_without_detail() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users/login/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let devfolio = client(&mock_server);
    let mut page = devfolio.auth_page();

    assert!(!page.login("jane@example.com", "secret").await);
    assert_eq!(
        page.state().last_notice().map(|n| n.message.as_str()),
        Some("Login failed")
    );
}

#[tokio::test]
async fn test_register_redirects_to_dashboard() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users/register/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "user": user_json(),
            "tokens": {"access": "a1", "refresh": "r1"},
            "message": "User registered successfully"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let devfolio = client(&mock_server);
    let mut page = devfolio.auth_page();
    let request = RegisterRequest::new("jane@example.com", "jane", "secret123");

    assert!(page.register(&request).await);
    assert_eq!(page.state().redirect(), Some(&Route::Dashboard));
    assert_eq!(
        page.state().last_notice().map(|n| n.message.as_str()),
        Some("Registration successful!")
    );
    assert_eq!(devfolio.session().access_token().as_deref(), Some("a1"));
}

#[tokio::test]
async fn test_register_failure_prefers_email_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users/register/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "username": ["A user with that username already exists."],
            "email": ["user with this email already exists."]
        })))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/users/register/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "username": ["A user with that username already exists."]
        })))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/users/register/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "password": ["This password is too common."]
        })))
        .mount(&mock_server)
        .await;

    let devfolio = client(&mock_server);
    let mut page = devfolio.auth_page();
    let request = RegisterRequest::new("jane@example.com", "jane", "password");

    for _ in 0..3 {
        assert!(!page.register(&request).await);
    }
    let messages: Vec<_> = page.state().notices().iter().map(|n| n.message.as_str()).collect();
    assert_eq!(
        messages,
        [
            "user with this email already exists.",
            "A user with that username already exists.",
            "Registration failed"
        ]
    );
    assert_eq!(page.state().redirect(), None);
}

#[tokio::test]
async fn test_github_login() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users/auth/github/"))
        .and(body_json(json!({"code": "good"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": user_json(),
            "tokens": {"access": "a1", "refresh": "r1"}
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/users/auth/github/"))
        .and(body_json(json!({"code": "bad"})))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "Failed to get access token from GitHub"
        })))
        .mount(&mock_server)
        .await;

    let devfolio = client(&mock_server);

    let mut failed = devfolio.auth_page();
    assert!(!failed.login_with_github("bad").await);
    assert_eq!(
        failed.state().last_notice().map(|n| n.message.as_str()),
        Some("GitHub authentication failed")
    );
    assert_eq!(failed.state().redirect(), None);

    let mut page = devfolio.auth_page();
    assert!(page.login_with_github("good").await);
    assert_eq!(
        page.state().last_notice().map(|n| n.message.as_str()),
        Some("GitHub login successful!")
    );
    assert_eq!(page.state().redirect(), Some(&Route::Dashboard));
}

#[tokio::test]
async fn test_logout_redirects_to_login_even_when_server_fails() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users/logout/"))
        .and(body_json(json!({"refresh_token": "r1"})))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let devfolio = client(&mock_server);
    devfolio.session().store_tokens("a1", "r1").unwrap();

    let mut page = devfolio.auth_page();
    page.logout().await;

    assert_eq!(page.state().redirect(), Some(&Route::Login));
    let notice = page.state().last_notice().unwrap();
    assert_eq!(notice.kind, NoticeKind::Success);
    assert_eq!(notice.message, "Logged out successfully");
    assert_eq!(devfolio.session().access_token(), None);
    assert_eq!(devfolio.session().state(), AuthState::Anonymous);
}
