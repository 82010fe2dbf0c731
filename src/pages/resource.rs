use devfolio_auth::{ApiError, ResourceApi};
use log::{debug, warn};

use super::{server_message, PageState};

/// Notice texts of one resource page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Messages {
    pub created: &'static str,
    pub updated: &'static str,
    pub deleted: &'static str,
    pub load_failed: &'static str,
    pub save_failed: &'static str,
    pub delete_failed: &'static str,
}

pub mod messages {
    use super::Messages;

    pub const SKILLS: Messages = Messages {
        created: "Skill added successfully!",
        updated: "Skill updated successfully!",
        deleted: "Skill deleted successfully!",
        load_failed: "Failed to load skills",
        save_failed: "Failed to save skill",
        delete_failed: "Failed to delete skill",
    };

    pub const EXPERIENCES: Messages = Messages {
        created: "Experience added successfully!",
        updated: "Experience updated successfully!",
        deleted: "Experience deleted successfully!",
        load_failed: "Failed to load experiences",
        save_failed: "Failed to save experience",
        delete_failed: "Failed to delete experience",
    };

    pub const EDUCATION: Messages = Messages {
        created: "Education added successfully!",
        updated: "Education updated successfully!",
        deleted: "Education deleted successfully!",
        load_failed: "Failed to load education",
        save_failed: "Failed to save education",
        delete_failed: "Failed to delete education",
    };

    pub const SOCIAL_LINKS: Messages = Messages {
        created: "Social link added successfully!",
        updated: "Social link updated successfully!",
        deleted: "Social link deleted successfully!",
        load_failed: "Failed to load social links",
        save_failed: "Failed to save social link",
        delete_failed: "Failed to delete social link",
    };

    pub const PROJECTS: Messages = Messages {
        created: "Project created successfully!",
        updated: "Project updated successfully!",
        deleted: "Project deleted successfully!",
        load_failed: "Failed to load projects",
        save_failed: "Failed to create project",
        delete_failed: "Failed to delete project",
    };

    pub const POSTS: Messages = Messages {
        created: "Blog post created successfully!",
        updated: "Blog post updated successfully!",
        deleted: "Post deleted successfully!",
        load_failed: "Failed to load blog posts",
        save_failed: "Failed to create blog post",
        delete_failed: "Failed to delete post",
    };
}

/// List page over a [`ResourceApi`] source.
///
/// `items` is whatever the last successful fetch returned. Every successful
/// mutation is followed by a fresh `load`, so the snapshot always reflects
/// the server.
pub struct ResourcePage<S: ResourceApi> {
    source: S,
    messages: Messages,
    items: Vec<S::Item>,
    loading: bool,
    state: PageState,
}

impl<S: ResourceApi> ResourcePage<S> {
    pub fn new(source: S, messages: Messages) -> Self {
        Self {
            source,
            messages,
            items: Vec::new(),
            loading: false,
            state: PageState::default(),
        }
    }

    /// Fetch the list and replace the snapshot.
    pub async fn load(&mut self) {
        if !self.state.accepts_result() {
            return;
        }
        self.loading = true;
        let result = self.source.list().await;
        self.loading = false;
        if !self.state.accepts_result() {
            return;
        }

        match result {
            Ok(items) => {
                debug!("Loaded {} items", items.len());
                self.items = items;
            }
            Err(err) if err.is_not_found() => self.items.clear(),
            Err(err) => {
                warn!("{}: {}", self.messages.load_failed, err);
                self.items.clear();
                self.state.failure(&err, self.messages.load_failed);
            }
        }
    }

    /// Create `form`, or update the record under `editing`, then reload.
    ///
    /// Returns whether the write succeeded. On failure the snapshot is left
    /// as it was and the server's message is shown when it sent one.
    pub async fn submit(&mut self, form: &S::Form, editing: Option<&S::Key>) -> bool {
        let (result, success) = match editing {
            Some(key) => (self.source.update(key, form).await, self.messages.updated),
            None => (self.source.create(form).await, self.messages.created),
        };
        let save_failed = self.messages.save_failed;
        self.settle(result, success, |err| {
            server_message(err).unwrap_or_else(|| save_failed.to_string())
        })
        .await
    }

    /// Delete `key` once the user confirmed, then reload.
    pub async fn delete(&mut self, key: &S::Key, confirmed: bool) -> bool {
        if !confirmed {
            return false;
        }
        let result = self.source.delete(key).await;
        let Messages {
            deleted,
            delete_failed,
            ..
        } = self.messages;
        self.settle(result, deleted, |_| delete_failed.to_string())
            .await
    }

    /// Apply the outcome of a mutation: notice, then re-fetch on success.
    pub(crate) async fn settle<T>(
        &mut self,
        result: Result<T, ApiError>,
        success: &str,
        failure: impl FnOnce(&ApiError) -> String,
    ) -> bool {
        if !self.state.accepts_result() {
            return false;
        }
        match result {
            Ok(_) => {
                self.state.success(success);
                self.load().await;
                true
            }
            Err(err) => {
                warn!("Request failed: {}", err);
                let message = failure(&err);
                self.state.failure(&err, message);
                false
            }
        }
    }

    pub fn items(&self) -> &[S::Item] {
        &self.items
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut PageState {
        &mut self.state
    }
}
