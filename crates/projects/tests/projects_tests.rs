use devfolio_auth::{ApiClient, ApiError, ResourceApi, Session};
use devfolio_projects::{ProjectForm, ProjectStatus, ProjectsClient};
use reqwest::Client;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn project_json(slug: &str, status: &str) -> serde_json::Value {
    json!({
        "id": 1,
        "username": "jane",
        "title": "Devfolio CLI",
        "slug": slug,
        "description": "Command-line client",
        "short_description": "",
        "github_url": "https://github.com/jane/cli",
        "live_url": "",
        "demo_url": "",
        "thumbnail": null,
        "cover_image": "/media/projects/covers/cli.png",
        "images": [],
        "tech_stack": ["Rust", "Tokio"],
        "features": [],
        "status": status,
        "github_repo_id": "123",
        "github_stars": 4,
        "github_forks": 1,
        "is_featured": true,
        "display_order": 0,
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z"
    })
}

fn client_for(server: &MockServer) -> ProjectsClient {
    let session = Arc::new(Session::in_memory());
    session.store_tokens("access", "refresh").unwrap();
    ProjectsClient::new(Arc::new(ApiClient::new(&server.uri(), Client::new(), session)))
}

#[tokio::test]
async fn test_list_by_username() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects/"))
        .and(query_param("username", "jane"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "next": null,
            "previous": null,
            "results": [project_json("devfolio-cli", "in_progress")]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let owned = client_for(&mock_server).owned_by("jane");
    let projects = owned.list().await.unwrap();

    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].status, ProjectStatus::InProgress);
    assert_eq!(projects[0].tech_stack, vec!["Rust", "Tokio"]);
    assert!(projects[0].is_from_github());
}

#[tokio::test]
async fn test_create_update_delete_by_slug() {
    let mock_server = MockServer::start().await;
    let form = ProjectForm {
        tech_stack: vec!["Rust".into(), "Rust".into()],
        ..ProjectForm::new("Devfolio CLI", "Command-line client")
    };

    Mock::given(method("POST"))
        .and(path("/projects/"))
        .and(body_json(serde_json::to_value(&form).unwrap()))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "title": "Devfolio CLI",
            "description": "Command-line client"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/projects/devfolio-cli/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"title": "Devfolio CLI"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/projects/devfolio-cli/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let owned = client_for(&mock_server).owned_by("jane");
    owned.create(&form).await.unwrap();
    owned.update(&"devfolio-cli".to_string(), &form).await.unwrap();
    owned.delete(&"devfolio-cli".to_string()).await.unwrap();
}

#[tokio::test]
async fn test_get_project_detail() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects/devfolio-cli/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(project_json("devfolio-cli", "completed")))
        .mount(&mock_server)
        .await;

    let project = client_for(&mock_server).get("devfolio-cli").await.unwrap();
    assert_eq!(project.summary(), "Command-line client");
    assert_eq!(project.cover_image.as_deref(), Some("/media/projects/covers/cli.png"));
}

#[tokio::test]
async fn test_import_from_github() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/projects/import_from_github/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Successfully imported 3 projects",
            "total_repos": 5,
            "imported": 3
        })))
        .mount(&mock_server)
        .await;

    let summary = client_for(&mock_server).import_from_github().await.unwrap();
    assert_eq!(summary.message, "Successfully imported 3 projects");
    assert_eq!(summary.total_repos, 5);
    assert_eq!(summary.imported, 3);
}

#[tokio::test]
async fn test_import_without_github_connection() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/projects/import_from_github/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "GitHub not connected. Please connect your GitHub account."
        })))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server).import_from_github().await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    assert_eq!(
        err.user_message(),
        "GitHub not connected. Please connect your GitHub account."
    );
}

#[tokio::test]
async fn test_sync_github() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/projects/devfolio-cli/sync_github/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Project synced successfully",
            "stars": 10,
            "forks": 2
        })))
        .mount(&mock_server)
        .await;

    let result = client_for(&mock_server).sync_github("devfolio-cli").await.unwrap();
    assert_eq!(result.stars, 10);
    assert_eq!(result.forks, 2);
}
