use devfolio::config::ClientOptions;
use devfolio::profile::{ProfileView, ALL_CATEGORIES};
use devfolio::resume::{self, ResumeSnapshot};
use devfolio::Devfolio;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn anonymous(server: &MockServer) -> Devfolio {
    let options = ClientOptions::default()
        .with_api_url(&format!("{}/api", server.uri()))
        .with_site_url("https://devfolio.example.com");
    Devfolio::new(options).unwrap()
}

fn portfolio_json() -> serde_json::Value {
    json!({
        "id": 3,
        "user": 1,
        "username": "jane",
        "title": "Jane Doe",
        "tagline": "Systems programmer",
        "bio": "I write <b>Rust</b>.",
        "template": "modern",
        "primary_color": "#10B981",
        "secondary_color": "#1E40AF",
        "font_family": "Inter",
        "is_published": true,
        "skills": [
            {"id": 1, "name": "Rust", "category": "backend", "proficiency": 90},
            {"id": 2, "name": "React", "category": "frontend", "proficiency": 70}
        ],
        "experiences": [{
            "id": 5, "company": "Acme", "position": "Engineer", "location": "Oslo",
            "description": "Built things", "start_date": "2021-02-01", "end_date": null,
            "is_current": true
        }],
        "education": [{
            "id": 6, "institution": "NTNU", "degree": "MSc", "field_of_study": "Informatics",
            "start_date": "2015-08-15", "end_date": "2020-06-15"
        }]
    })
}

async fn mount_portfolio(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/portfolios/by-username/jane/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(portfolio_json()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_unknown_username_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/portfolios/by-username/ghost/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Portfolio not found"})))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/projects/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let devfolio = anonymous(&mock_server);
    let mut profile = devfolio.public_profile();
    profile.load("ghost").await;

    assert_eq!(profile.view(), &ProfileView::NotFound);
    assert!(profile.share_links().is_none());
    assert!(profile.visible_projects().is_empty());
}

#[tokio::test]
async fn test_profile_sections_degrade_independently() {
    let mock_server = MockServer::start().await;
    mount_portfolio(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api/projects/"))
        .and(query_param("username", "jane"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let posts: Vec<_> = (1..=8)
        .map(|i| json!({"id": i, "title": format!("Post {}", i), "slug": format!("post-{}", i), "excerpt": "x".repeat(150)}))
        .collect();
    Mock::given(method("GET"))
        .and(path("/api/blog/posts/"))
        .and(query_param("author", "jane"))
        .and(query_param("status", "published"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 8, "results": posts})))
        .mount(&mock_server)
        .await;

    let devfolio = anonymous(&mock_server);
    let mut profile = devfolio.public_profile();
    profile.load("jane").await;

    let data = profile.data().unwrap();
    assert_eq!(data.portfolio.title, "Jane Doe");
    assert!(data.projects.is_empty());
    assert_eq!(data.posts.len(), 8);
    assert_eq!(profile.visible_posts().len(), 6);
    assert_eq!(profile.categories(), vec![ALL_CATEGORIES.to_string()]);

    let first = &profile.visible_posts()[0];
    assert_eq!(profile.post_text(first), format!("{}...", "x".repeat(120)));

    let links = profile.share_links().unwrap();
    assert_eq!(links.copy, "https://devfolio.example.com/jane");
    assert!(links.twitter.ends_with("&text=Check%20out%20Jane%20Doe"));

    assert_eq!(
        profile.media_url(Some("/media/avatars/jane.png")),
        Some(format!("{}/media/avatars/jane.png", mock_server.uri()))
    );
}

#[tokio::test]
async fn test_project_filter_and_expansion() {
    let mock_server = MockServer::start().await;
    mount_portfolio(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api/projects/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "title": "A", "slug": "a", "status": "completed", "description": "d".repeat(130)},
            {"id": 2, "title": "B", "slug": "b", "status": "in_progress", "short_description": "Short"},
            {"id": 3, "title": "C", "slug": "c", "status": "completed"}
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/blog/posts/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let devfolio = anonymous(&mock_server);
    let mut profile = devfolio.public_profile();
    profile.load("jane").await;

    assert_eq!(profile.categories(), vec!["all", "completed", "in_progress"]);
    assert_eq!(profile.category_labels()[2].1, "In progress");
    assert!(profile.visible_posts().is_empty());

    profile.set_category("completed");
    let titles: Vec<_> = profile.visible_projects().iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, ["A", "C"]);

    let project = profile.visible_projects()[0].clone();
    assert_eq!(profile.project_text(&project), format!("{}...", "d".repeat(100)));
    profile.toggle_project(1);
    assert_eq!(profile.project_text(&project), "d".repeat(130));
    profile.toggle_project(1);
    assert!(!profile.is_project_expanded(1));
}

#[tokio::test]
async fn test_resume_from_loaded_profile() {
    let mock_server = MockServer::start().await;
    mount_portfolio(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api/projects/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "title": "Tool", "slug": "tool", "short_description": "A CLI", "tech_stack": ["Rust", "Tokio"]}
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/blog/posts/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let devfolio = anonymous(&mock_server);
    let mut profile = devfolio.public_profile();
    profile.load("jane").await;

    let snapshot = ResumeSnapshot::from(profile.data().unwrap());
    let document = resume::render(&snapshot).unwrap();

    assert_eq!(document.file_name, "jane_resume.html");
    assert!(document.html.contains("<title>Jane Doe - Resume</title>"));
    assert!(document.html.contains("I write &lt;b&gt;Rust&lt;"));
    assert!(!document.html.contains("<b>Rust"));
    assert!(document.html.contains("background: #10B98120"));
    assert!(document.html.contains("Engineer at Acme"));
    assert!(document.html.contains("Oslo | 2021 - Present"));
    assert!(document.html.contains("Rust, Tokio"));
    assert!(document.html.contains("MSc in Informatics"));
    assert!(document.html.contains("NTNU | 2015 - 2020"));

    let dir = tempfile::tempdir().unwrap();
    let path = document.save_to(dir.path()).unwrap();
    assert!(path.ends_with("jane_resume.html"));
    assert_eq!(std::fs::read_to_string(path).unwrap(), document.html);
}

#[tokio::test]
async fn test_unmounted_profile_discards_results() {
    let mock_server = MockServer::start().await;
    mount_portfolio(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api/projects/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/blog/posts/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let devfolio = anonymous(&mock_server);
    let mut profile = devfolio.public_profile();
    profile.state().mount_handle().unmount();
    profile.load("jane").await;

    assert_eq!(profile.view(), &ProfileView::Loading);
}

#[tokio::test]
async fn test_browse_search_is_case_insensitive() {
    let mock_server = MockServer::start().await;

    let mut other = portfolio_json();
    other["id"] = json!(4);
    other["username"] = json!("omar");
    other["title"] = json!("Omar's Designs");
    other["tagline"] = json!("UX and RUST tooling");

    Mock::given(method("GET"))
        .and(path("/api/portfolios/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([portfolio_json(), other])))
        .mount(&mock_server)
        .await;

    let devfolio = anonymous(&mock_server);
    let mut browse = devfolio.browse_page();
    browse.load().await;
    assert_eq!(browse.results().len(), 2);

    browse.set_query("OMAR");
    assert_eq!(browse.results()[0].username, "omar");

    browse.set_query("rust");
    assert_eq!(browse.results().len(), 1);

    browse.set_query("nobody");
    assert!(browse.results().is_empty());
}
