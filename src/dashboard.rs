//! Dashboard summary of the signed-in user.

use chrono::NaiveDate;
use devfolio_analytics::{AnalyticsClient, Overview, DEFAULT_DAYS};
use devfolio_blog::{BlogClient, BlogPost, PostStatus};
use devfolio_projects::{Project, ProjectsClient};
use log::warn;

use crate::badges::Tone;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub portfolio_views: u64,
    pub unique_visitors: u64,
    pub projects: usize,
    pub blog_posts: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    View,
    Project,
    Blog,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    pub kind: ActivityKind,
    pub title: String,
    pub description: String,
    /// `None` for rolling figures such as views
    pub date: Option<NaiveDate>,
    pub tone: Tone,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub recent_activity: Vec<Activity>,
}

impl Dashboard {
    /// Fetch all figures. Any source that fails counts as zero.
    pub async fn load(
        analytics: &AnalyticsClient,
        projects: &ProjectsClient,
        blog: &BlogClient,
        username: &str,
    ) -> Dashboard {
        let overview = analytics.overview(DEFAULT_DAYS).await.unwrap_or_else(|err| {
            warn!("Failed to load analytics: {}", err);
            Overview::default()
        });
        let projects = projects.list(Some(username)).await.unwrap_or_else(|err| {
            warn!("Failed to load projects: {}", err);
            Vec::new()
        });
        let posts = blog.my_posts(None).await.unwrap_or_else(|err| {
            warn!("Failed to load posts: {}", err);
            Vec::new()
        });
        Self::summarize(&overview, &projects, &posts)
    }

    pub fn summarize(overview: &Overview, projects: &[Project], posts: &[BlogPost]) -> Dashboard {
        let stats = DashboardStats {
            portfolio_views: overview.total_views,
            unique_visitors: overview.unique_visitors,
            projects: projects.len(),
            blog_posts: posts.len(),
        };

        let mut recent_activity = Vec::new();
        if overview.total_views > 0 {
            recent_activity.push(Activity {
                kind: ActivityKind::View,
                title: "Portfolio viewed".to_string(),
                description: format!(
                    "{} views in the last {} days",
                    overview.total_views, DEFAULT_DAYS
                ),
                date: None,
                tone: Tone::Blue,
            });
        }
        if let Some(project) = projects.first() {
            recent_activity.push(Activity {
                kind: ActivityKind::Project,
                title: "New project added".to_string(),
                description: format!("You added \"{}\" to your portfolio", project.title),
                date: project.created_at.map(|at| at.date_naive()),
                tone: Tone::Green,
            });
        }
        if let Some(post) = posts.iter().find(|p| p.status == PostStatus::Published) {
            recent_activity.push(Activity {
                kind: ActivityKind::Blog,
                title: "Blog post published".to_string(),
                description: format!("Your article \"{}\" is now live", post.title),
                date: post.published_at.map(|at| at.date_naive()),
                tone: Tone::Purple,
            });
        }

        Dashboard {
            stats,
            recent_activity,
        }
    }
}
