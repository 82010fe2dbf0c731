//! DevFolio Projects client for Rust
//!
//! Project CRUD keyed by slug, plus the GitHub import and sync actions.

mod models;

pub use models::*;

use async_trait::async_trait;
use devfolio_auth::collection::detail_path;
use devfolio_auth::{ApiClient, ApiRequest, Collection, Resource, ResourceApi};
use log::info;
use std::sync::Arc;

pub use devfolio_auth::{ApiError, Result};

/// Projects client
#[derive(Debug, Clone)]
pub struct ProjectsClient {
    api: Arc<ApiClient>,
}

impl ProjectsClient {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// List projects, restricted to one user when `username` is given.
    pub async fn list(&self, username: Option<&str>) -> Result<Vec<Project>> {
        let request = ApiRequest::get(Project::PATH).query_opt("username", username);
        self.api.execute_list(request).await
    }

    pub async fn get(&self, slug: &str) -> Result<Project> {
        self.api
            .execute(ApiRequest::get(&detail_path(Project::PATH, slug)))
            .await
    }

    /// Create a project. The server derives the slug from the title and does
    /// not return it, so reload the list to see the new record.
    pub async fn create(&self, form: &ProjectForm) -> Result<()> {
        self.api
            .execute_empty(ApiRequest::post(Project::PATH).json(form)?)
            .await
    }

    pub async fn update(&self, slug: &str, form: &ProjectForm) -> Result<()> {
        self.api
            .execute_empty(ApiRequest::put(&detail_path(Project::PATH, slug)).json(form)?)
            .await
    }

    pub async fn delete(&self, slug: &str) -> Result<()> {
        self.api
            .execute_empty(ApiRequest::delete(&detail_path(Project::PATH, slug)))
            .await
    }

    /// Import the signed-in user's non-fork GitHub repositories.
    pub async fn import_from_github(&self) -> Result<ImportSummary> {
        let summary: ImportSummary = self
            .api
            .execute(ApiRequest::post("/projects/import_from_github/"))
            .await?;
        info!(
            "GitHub import: {} of {} repositories imported",
            summary.imported, summary.total_repos
        );
        Ok(summary)
    }

    /// Refresh stars and forks of one imported project.
    pub async fn sync_github(&self, slug: &str) -> Result<SyncResult> {
        let path = format!("{}sync_github/", detail_path(Project::PATH, slug));
        self.api.execute(ApiRequest::post(&path)).await
    }

    /// The projects of `username` as a page data source.
    pub fn owned_by(&self, username: &str) -> OwnedProjects {
        OwnedProjects {
            client: self.clone(),
            collection: Collection::new(self.api.clone()),
            username: username.to_string(),
        }
    }
}

/// One user's projects; lists are filtered by owner, mutations go to the
/// shared collection endpoint.
#[derive(Clone)]
pub struct OwnedProjects {
    client: ProjectsClient,
    collection: Collection<Project>,
    username: String,
}

impl OwnedProjects {
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn client(&self) -> &ProjectsClient {
        &self.client
    }
}

#[async_trait]
impl ResourceApi for OwnedProjects {
    type Item = Project;
    type Form = ProjectForm;
    type Key = String;

    async fn list(&self) -> Result<Vec<Project>> {
        self.client.list(Some(&self.username)).await
    }

    async fn create(&self, form: &ProjectForm) -> Result<()> {
        ResourceApi::create(&self.collection, form).await
    }

    async fn update(&self, key: &String, form: &ProjectForm) -> Result<()> {
        ResourceApi::update(&self.collection, key, form).await
    }

    async fn delete(&self, key: &String) -> Result<()> {
        ResourceApi::delete(&self.collection, key).await
    }
}
