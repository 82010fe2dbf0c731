//! Public profile page at `/{username}`.
//!
//! Shows a published portfolio with the owner's projects and published
//! posts. Everything except the portfolio itself is optional: a failed
//! project or post fetch leaves that section empty.

use devfolio_analytics::{AnalyticsClient, PortfolioVisit};
use devfolio_blog::{BlogClient, BlogPost, PostFilter};
use devfolio_portfolio::{Portfolio, PortfolioClient};
use devfolio_projects::{Project, ProjectsClient};
use log::{debug, warn};
use std::sync::Arc;

use crate::badges::humanize;
use crate::error::Result;
use crate::pages::PageState;
use crate::prefs::PrefsStore;

pub const ALL_CATEGORIES: &str = "all";
pub const PROJECT_PREVIEW_CHARS: usize = 100;
pub const POST_PREVIEW_CHARS: usize = 120;
/// Posts listed on the profile
pub const MAX_POSTS: usize = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileData {
    pub portfolio: Portfolio,
    pub projects: Vec<Project>,
    pub posts: Vec<BlogPost>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProfileView {
    Loading,
    NotFound,
    Ready(Box<ProfileData>),
}

/// Share targets for a profile page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLinks {
    pub twitter: String,
    pub linkedin: String,
    pub facebook: String,
    /// The page URL itself, for copying
    pub copy: String,
}

impl ShareLinks {
    pub fn new(page_url: &str, title: &str) -> Self {
        let url = urlencoding::encode(page_url);
        let text = urlencoding::encode(&format!("Check out {}", title)).into_owned();
        Self {
            twitter: format!("https://twitter.com/intent/tweet?url={}&text={}", url, text),
            linkedin: format!("https://www.linkedin.com/sharing/share-offsite/?url={}", url),
            facebook: format!("https://www.facebook.com/sharer/sharer.php?u={}", url),
            copy: page_url.to_string(),
        }
    }
}

/// Resolve an uploaded file path against the API host.
///
/// Absolute URLs pass through. Relative paths such as `/media/x.png` are
/// served from the API origin, without its `/api` prefix.
pub fn media_url(api_url: &str, path: Option<&str>) -> Option<String> {
    let path = path?.trim();
    if path.is_empty() {
        return None;
    }
    if path.starts_with("http") {
        return Some(path.to_string());
    }
    let host = api_url.replacen("/api", "", 1);
    let host = host.trim_end_matches('/');
    if path.starts_with('/') {
        Some(format!("{}{}", host, path))
    } else {
        Some(format!("{}/{}", host, path))
    }
}

fn preview(text: &str, chars: usize) -> String {
    let mut out: String = text.chars().take(chars).collect();
    out.push_str("...");
    out
}

/// Controller of one public profile page
pub struct PublicProfile {
    portfolios: PortfolioClient,
    projects: ProjectsClient,
    blog: BlogClient,
    analytics: AnalyticsClient,
    prefs: Arc<PrefsStore>,
    api_url: String,
    site_url: String,
    username: String,
    view: ProfileView,
    expanded_project: Option<i64>,
    expanded_post: Option<i64>,
    category: String,
    state: PageState,
}

impl PublicProfile {
    pub fn new(
        portfolios: PortfolioClient,
        projects: ProjectsClient,
        blog: BlogClient,
        analytics: AnalyticsClient,
        prefs: Arc<PrefsStore>,
        api_url: &str,
        site_url: &str,
    ) -> Self {
        Self {
            portfolios,
            projects,
            blog,
            analytics,
            prefs,
            api_url: api_url.to_string(),
            site_url: site_url.trim_end_matches('/').to_string(),
            username: String::new(),
            view: ProfileView::Loading,
            expanded_project: None,
            expanded_post: None,
            category: ALL_CATEGORIES.to_string(),
            state: PageState::default(),
        }
    }

    /// Fetch the profile of `username`.
    ///
    /// Unknown and unpublished users both end in [`ProfileView::NotFound`].
    pub async fn load(&mut self, username: &str) {
        self.username = username.to_string();
        self.view = ProfileView::Loading;
        self.expanded_project = None;
        self.expanded_post = None;
        self.category = ALL_CATEGORIES.to_string();

        let portfolio = match self.portfolios.by_username(username).await {
            Ok(portfolio) => portfolio,
            Err(err) => {
                debug!("No public portfolio for {}: {}", username, err);
                if self.state.accepts_result() {
                    self.view = ProfileView::NotFound;
                }
                return;
            }
        };

        let projects = self.projects.list(Some(username)).await.unwrap_or_else(|err| {
            warn!("Failed to load projects of {}: {}", username, err);
            Vec::new()
        });
        let posts = self
            .blog
            .list(&PostFilter::published_by(username))
            .await
            .unwrap_or_else(|err| {
                warn!("Failed to load posts of {}: {}", username, err);
                Vec::new()
            });

        if !self.state.accepts_result() {
            return;
        }
        self.view = ProfileView::Ready(Box::new(ProfileData {
            portfolio,
            projects,
            posts,
        }));
    }

    /// Record a visit. Tracking failures are logged and otherwise ignored.
    pub async fn track_visit(&self, referrer: &str) {
        if self.data().is_none() {
            return;
        }
        let visit = PortfolioVisit {
            username: self.username.clone(),
            page_url: self.page_url(),
            referrer: referrer.to_string(),
        };
        if let Err(err) = self.analytics.track_portfolio(&visit).await {
            debug!("Visit tracking failed: {}", err);
        }
    }

    pub fn view(&self) -> &ProfileView {
        &self.view
    }

    pub fn data(&self) -> Option<&ProfileData> {
        match &self.view {
            ProfileView::Ready(data) => Some(&**data),
            _ => None,
        }
    }

    pub fn page_url(&self) -> String {
        format!("{}/{}", self.site_url, self.username)
    }

    pub fn share_links(&self) -> Option<ShareLinks> {
        self.data()
            .map(|data| ShareLinks::new(&self.page_url(), &data.portfolio.title))
    }

    pub fn media_url(&self, path: Option<&str>) -> Option<String> {
        media_url(&self.api_url, path)
    }

    /// Filter values: `all`, then each project status in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        let mut categories = vec![ALL_CATEGORIES.to_string()];
        for project in self.data().map(|d| d.projects.as_slice()).unwrap_or_default() {
            let status = project.status.as_str().to_string();
            if !categories.contains(&status) {
                categories.push(status);
            }
        }
        categories
    }

    /// Filter values with their display labels
    pub fn category_labels(&self) -> Vec<(String, String)> {
        self.categories()
            .into_iter()
            .map(|value| {
                let label = humanize(&value);
                (value, label)
            })
            .collect()
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn set_category(&mut self, category: &str) {
        self.category = category.to_string();
    }

    pub fn visible_projects(&self) -> Vec<&Project> {
        let projects = self.data().map(|d| d.projects.as_slice()).unwrap_or_default();
        projects
            .iter()
            .filter(|p| self.category == ALL_CATEGORIES || p.status.as_str() == self.category)
            .collect()
    }

    pub fn visible_posts(&self) -> &[BlogPost] {
        let posts = self.data().map(|d| d.posts.as_slice()).unwrap_or_default();
        &posts[..posts.len().min(MAX_POSTS)]
    }

    /// Expand `id`, or collapse it when it is the expanded project.
    pub fn toggle_project(&mut self, id: i64) {
        self.expanded_project = match self.expanded_project {
            Some(current) if current == id => None,
            _ => Some(id),
        };
    }

    pub fn toggle_post(&mut self, id: i64) {
        self.expanded_post = match self.expanded_post {
            Some(current) if current == id => None,
            _ => Some(id),
        };
    }

    pub fn is_project_expanded(&self, id: i64) -> bool {
        self.expanded_project == Some(id)
    }

    pub fn is_post_expanded(&self, id: i64) -> bool {
        self.expanded_post == Some(id)
    }

    pub fn project_text(&self, project: &Project) -> String {
        if self.is_project_expanded(project.id) {
            project.description.clone()
        } else {
            preview(project.summary(), PROJECT_PREVIEW_CHARS)
        }
    }

    pub fn post_text(&self, post: &BlogPost) -> String {
        if self.is_post_expanded(post.id) {
            if post.content.is_empty() {
                post.excerpt.clone()
            } else {
                post.content.clone()
            }
        } else {
            preview(&post.excerpt, POST_PREVIEW_CHARS)
        }
    }

    pub fn dark_mode(&self) -> bool {
        self.prefs.dark_mode()
    }

    pub fn toggle_dark_mode(&self) -> Result<bool> {
        self.prefs.toggle_dark_mode()
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }
}

/// The `/browse` page: published portfolios with a local search box
pub struct BrowsePage {
    client: PortfolioClient,
    portfolios: Vec<Portfolio>,
    query: String,
    state: PageState,
}

impl BrowsePage {
    pub fn new(client: PortfolioClient) -> Self {
        Self {
            client,
            portfolios: Vec::new(),
            query: String::new(),
            state: PageState::default(),
        }
    }

    pub async fn load(&mut self) {
        let result = self.client.list_published().await;
        if !self.state.accepts_result() {
            return;
        }
        match result {
            Ok(portfolios) => self.portfolios = portfolios,
            Err(err) => {
                warn!("Failed to load portfolios: {}", err);
                self.portfolios.clear();
                self.state.failure(&err, "Failed to load portfolios");
            }
        }
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    /// Portfolios whose username, title or tagline contain the query,
    /// ignoring case.
    pub fn results(&self) -> Vec<&Portfolio> {
        let query = self.query.trim().to_lowercase();
        self.portfolios
            .iter()
            .filter(|p| {
                query.is_empty()
                    || p.username.to_lowercase().contains(&query)
                    || p.title.to_lowercase().contains(&query)
                    || p.tagline.to_lowercase().contains(&query)
            })
            .collect()
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }
}
