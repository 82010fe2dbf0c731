//! DevFolio Portfolio client for Rust
//!
//! The portfolio document of the signed-in user, its sub-collections (skills,
//! experiences, education, social links) and the public lookups by username.

mod models;

pub use models::*;

use devfolio_auth::{ApiClient, ApiRequest, Collection};
use log::debug;
use std::sync::Arc;

pub use devfolio_auth::{ApiError, Result};

/// Portfolio client
#[derive(Debug, Clone)]
pub struct PortfolioClient {
    api: Arc<ApiClient>,
}

impl PortfolioClient {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// The signed-in user's portfolio, or `None` when none was created yet.
    pub async fn my_portfolio(&self) -> Result<Option<Portfolio>> {
        match self
            .api
            .execute(ApiRequest::get("/portfolios/my_portfolio/"))
            .await
        {
            Ok(portfolio) => Ok(Some(portfolio)),
            Err(err) if err.is_not_found() => {
                debug!("No portfolio for the current user");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Published portfolio of `username`.
    pub async fn by_username(&self, username: &str) -> Result<Portfolio> {
        let path = format!("/portfolios/by-username/{}/", urlencoding::encode(username));
        self.api.execute(ApiRequest::get(&path)).await
    }

    /// All published portfolios
    pub async fn list_published(&self) -> Result<Vec<Portfolio>> {
        self.api.execute_list(ApiRequest::get("/portfolios/")).await
    }

    /// Create the portfolio. The response echoes only the written fields, so
    /// the result is the stored form.
    pub async fn create(&self, form: &PortfolioForm) -> Result<PortfolioForm> {
        self.api
            .execute(ApiRequest::post("/portfolios/").json(form)?)
            .await
    }

    pub async fn update(&self, id: i64, form: &PortfolioForm) -> Result<PortfolioForm> {
        let path = format!("/portfolios/{}/", id);
        self.api.execute(ApiRequest::put(&path).json(form)?).await
    }

    pub fn skills(&self) -> Collection<Skill> {
        Collection::new(self.api.clone())
    }

    pub fn experiences(&self) -> Collection<Experience> {
        Collection::new(self.api.clone())
    }

    pub fn education(&self) -> Collection<Education> {
        Collection::new(self.api.clone())
    }

    pub fn social_links(&self) -> Collection<SocialLink> {
        Collection::new(self.api.clone())
    }
}
