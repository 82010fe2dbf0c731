use devfolio_projects::{OwnedProjects, Project, ProjectForm, ProjectsClient};
use log::info;

use super::resource::{messages, ResourcePage};
use super::tags::{TagInput, TagPolicy};
use super::{server_message, PageState};

/// The signed-in user's projects page
pub struct ProjectsPage {
    projects: ResourcePage<OwnedProjects>,
    tech_stack: TagInput,
    tech_stack_in_use: bool,
    importing: bool,
}

impl ProjectsPage {
    /// `username` is the signed-in user; the list shows only their projects.
    pub fn new(client: &ProjectsClient, username: &str) -> Self {
        Self {
            projects: ResourcePage::new(client.owned_by(username), messages::PROJECTS),
            tech_stack: TagInput::new(TagPolicy::AllowDuplicates),
            tech_stack_in_use: false,
            importing: false,
        }
    }

    pub async fn load(&mut self) {
        self.projects.load().await
    }

    /// Start editing `project` with its tech stack in the input.
    pub fn edit(&mut self, project: &Project) -> ProjectForm {
        let form = ProjectForm::from(project);
        self.tech_stack =
            TagInput::with_tags(TagPolicy::AllowDuplicates, form.tech_stack.clone());
        self.tech_stack_in_use = true;
        form
    }

    /// Save `form`, taking the tech stack from the input once it is in use.
    /// The input is reset on success.
    pub async fn save(&mut self, mut form: ProjectForm, editing: Option<&String>) -> bool {
        if self.tech_stack_in_use {
            form.tech_stack = self.tech_stack.tags().to_vec();
        }
        let saved = self.projects.submit(&form, editing).await;
        if saved {
            self.tech_stack.clear();
            self.tech_stack_in_use = false;
        }
        saved
    }

    pub async fn delete(&mut self, slug: &str, confirmed: bool) -> bool {
        self.projects.delete(&slug.to_string(), confirmed).await
    }

    /// Import GitHub repositories and reload the list.
    pub async fn import_from_github(&mut self) -> bool {
        self.importing = true;
        let result = self.projects.source().client().import_from_github().await;
        self.importing = false;

        let message = match &result {
            Ok(summary) => {
                info!("{}", summary.message);
                summary.message.clone()
            }
            Err(_) => String::new(),
        };
        self.projects
            .settle(result, &message, |err| {
                server_message(err).unwrap_or_else(|| "Failed to import from GitHub".to_string())
            })
            .await
    }

    pub fn projects(&self) -> &ResourcePage<OwnedProjects> {
        &self.projects
    }

    pub fn tech_stack(&self) -> &TagInput {
        &self.tech_stack
    }

    pub fn tech_stack_mut(&mut self) -> &mut TagInput {
        self.tech_stack_in_use = true;
        &mut self.tech_stack
    }

    pub fn is_importing(&self) -> bool {
        self.importing
    }

    pub fn state(&self) -> &PageState {
        self.projects.state()
    }
}
