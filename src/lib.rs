//! DevFolio Rust Client Library
//!
//! A Rust client for the DevFolio portfolio platform: authentication with
//! transparent token refresh, portfolio sections, projects, blog and
//! analytics, plus the page controllers of the web front end and the public
//! profile renderer.

pub mod badges;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod pages;
pub mod prefs;
pub mod profile;
pub mod resume;
pub mod routes;

use std::sync::Arc;

use devfolio_analytics::AnalyticsClient;
use devfolio_auth::{ApiClient, Auth, Collection, FileTokenStore, Session};
use devfolio_blog::BlogClient;
use devfolio_portfolio::{Education, Experience, PortfolioClient, Skill, SocialLink};
use devfolio_projects::ProjectsClient;
use log::debug;
use reqwest::Client;

use crate::config::ClientOptions;
use crate::dashboard::Dashboard;
use crate::pages::{messages, AuthPage, BlogPage, PortfolioPage, ProjectsPage, ResourcePage};
use crate::prefs::PrefsStore;
use crate::profile::{BrowsePage, PublicProfile};

pub use crate::error::{Error, Result};
pub use devfolio_analytics as analytics;
pub use devfolio_auth as auth;
pub use devfolio_blog as blog;
pub use devfolio_portfolio as portfolio;
pub use devfolio_projects as projects;

/// The main entry point for the DevFolio Rust client
pub struct Devfolio {
    api: Arc<ApiClient>,
    auth: Auth,
    prefs: Arc<PrefsStore>,
    options: ClientOptions,
}

impl Devfolio {
    /// Create a client from explicit options
    ///
    /// # Example
    ///
    /// ```
    /// use devfolio::{Devfolio, config::ClientOptions};
    ///
    /// let options = ClientOptions::default().with_api_url("https://devfolio.example.com/api");
    /// let devfolio = Devfolio::new(options).unwrap();
    /// ```
    pub fn new(options: ClientOptions) -> Result<Self> {
        options.validate()?;

        let mut builder = Client::builder();
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build().map_err(devfolio_auth::ApiError::from)?;

        let session = match &options.token_file {
            Some(path) => {
                debug!("Persisting tokens in {}", path.display());
                Session::new(Arc::new(FileTokenStore::new(path)))?
            }
            None => Session::in_memory(),
        };
        let prefs = match &options.prefs_file {
            Some(path) => PrefsStore::open(path)?,
            None => PrefsStore::in_memory(),
        };

        let api = Arc::new(ApiClient::new(
            &options.api_url,
            http_client,
            Arc::new(session),
        ));

        Ok(Self {
            auth: Auth::new(api.clone()),
            api,
            prefs: Arc::new(prefs),
            options,
        })
    }

    /// Create a client configured from `DEVFOLIO_*` environment variables
    ///
    /// # Example
    ///
    /// ```no_run
    /// use devfolio::Devfolio;
    ///
    /// let devfolio = Devfolio::from_env().unwrap();
    /// ```
    pub fn from_env() -> Result<Self> {
        Self::new(ClientOptions::from_env()?)
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Get a reference to the auth client for login, registration and profile
    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    pub fn session(&self) -> &Arc<Session> {
        self.api.session()
    }

    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    pub fn prefs(&self) -> &Arc<PrefsStore> {
        &self.prefs
    }

    pub fn portfolio(&self) -> PortfolioClient {
        PortfolioClient::new(self.api.clone())
    }

    pub fn projects(&self) -> ProjectsClient {
        ProjectsClient::new(self.api.clone())
    }

    pub fn blog(&self) -> BlogClient {
        BlogClient::new(self.api.clone())
    }

    pub fn analytics(&self) -> AnalyticsClient {
        AnalyticsClient::new(self.api.clone())
    }

    /// Controller of the skills page
    ///
    /// # Example
    ///
    /// ```no_run
    /// use devfolio::Devfolio;
    ///
    /// # async fn run() -> devfolio::Result<()> {
    /// let devfolio = Devfolio::from_env()?;
    /// let mut page = devfolio.skills_page();
    /// page.load().await;
    /// for skill in page.items() {
    ///     println!("{} ({}%)", skill.name, skill.proficiency);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn skills_page(&self) -> ResourcePage<Collection<Skill>> {
        ResourcePage::new(self.portfolio().skills(), messages::SKILLS)
    }

    pub fn experience_page(&self) -> ResourcePage<Collection<Experience>> {
        ResourcePage::new(self.portfolio().experiences(), messages::EXPERIENCES)
    }

    pub fn education_page(&self) -> ResourcePage<Collection<Education>> {
        ResourcePage::new(self.portfolio().education(), messages::EDUCATION)
    }

    pub fn social_links_page(&self) -> ResourcePage<Collection<SocialLink>> {
        ResourcePage::new(self.portfolio().social_links(), messages::SOCIAL_LINKS)
    }

    /// Login, registration and logout
    pub fn auth_page(&self) -> AuthPage {
        AuthPage::new(self.auth.clone())
    }

    pub fn portfolio_page(&self) -> PortfolioPage {
        PortfolioPage::new(self.portfolio(), self.auth.clone())
    }

    /// Projects page of `username`, normally the signed-in user
    pub fn projects_page(&self, username: &str) -> ProjectsPage {
        ProjectsPage::new(&self.projects(), username)
    }

    pub fn blog_page(&self) -> BlogPage {
        BlogPage::new(&self.blog())
    }

    /// Renderer for `/{username}` pages
    pub fn public_profile(&self) -> PublicProfile {
        PublicProfile::new(
            self.portfolio(),
            self.projects(),
            self.blog(),
            self.analytics(),
            self.prefs.clone(),
            &self.options.api_url,
            &self.options.site_url,
        )
    }

    pub fn browse_page(&self) -> BrowsePage {
        BrowsePage::new(self.portfolio())
    }

    /// Dashboard figures for `username`
    pub async fn dashboard(&self, username: &str) -> Dashboard {
        Dashboard::load(&self.analytics(), &self.projects(), &self.blog(), username).await
    }
}
