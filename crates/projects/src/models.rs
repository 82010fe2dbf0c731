use chrono::{DateTime, Utc};
use devfolio_auth::Resource;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Completed,
    InProgress,
    Planned,
    #[serde(other)]
    Unknown,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Completed => "completed",
            ProjectStatus::InProgress => "in_progress",
            ProjectStatus::Planned => "planned",
            ProjectStatus::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectImage {
    pub id: i64,
    pub image: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub display_order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    #[serde(default)]
    pub username: String,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub github_url: String,
    #[serde(default)]
    pub live_url: String,
    #[serde(default)]
    pub demo_url: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub images: Vec<ProjectImage>,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub github_repo_id: String,
    #[serde(default)]
    pub github_stars: i64,
    #[serde(default)]
    pub github_forks: i64,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Project {
    /// Short description when set, the full description otherwise.
    pub fn summary(&self) -> &str {
        if self.short_description.is_empty() {
            &self.description
        } else {
            &self.short_description
        }
    }

    pub fn is_from_github(&self) -> bool {
        !self.github_repo_id.is_empty()
    }
}

/// Writable project fields
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectForm {
    pub title: String,
    pub description: String,
    pub short_description: String,
    pub github_url: String,
    pub live_url: String,
    #[serde(default)]
    pub demo_url: String,
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    pub status: ProjectStatus,
    pub is_featured: bool,
    #[serde(default)]
    pub display_order: i32,
}

impl ProjectForm {
    pub fn new(title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            ..Default::default()
        }
    }
}

impl From<&Project> for ProjectForm {
    fn from(project: &Project) -> Self {
        Self {
            title: project.title.clone(),
            description: project.description.clone(),
            short_description: project.short_description.clone(),
            github_url: project.github_url.clone(),
            live_url: project.live_url.clone(),
            demo_url: project.demo_url.clone(),
            tech_stack: project.tech_stack.clone(),
            features: project.features.clone(),
            status: project.status,
            is_featured: project.is_featured,
            display_order: project.display_order,
        }
    }
}

/// Result of importing the user's GitHub repositories
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImportSummary {
    pub message: String,
    pub total_repos: u32,
    pub imported: u32,
}

/// Star and fork counts after a GitHub sync
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SyncResult {
    pub message: String,
    pub stars: i64,
    pub forks: i64,
}

impl Resource for Project {
    type Form = ProjectForm;
    type Key = String;
    const PATH: &'static str = "/projects/";

    fn key(&self) -> String {
        self.slug.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_server_values() {
        let status: ProjectStatus = serde_json::from_str("\"in_progress\"").unwrap();
        assert_eq!(status, ProjectStatus::InProgress);
        let status: ProjectStatus = serde_json::from_str("\"abandoned\"").unwrap();
        assert_eq!(status, ProjectStatus::Unknown);
        assert_eq!(serde_json::to_string(&ProjectStatus::Planned).unwrap(), "\"planned\"");
    }

    #[test]
    fn summary_prefers_short_description() {
        let mut project: Project = serde_json::from_str(
            r#"{"id": 1, "title": "CLI", "slug": "cli", "description": "A long description"}"#,
        )
        .unwrap();
        assert_eq!(project.summary(), "A long description");
        assert_eq!(project.status, ProjectStatus::Completed);

        project.short_description = "Short".into();
        assert_eq!(project.summary(), "Short");
    }
}
