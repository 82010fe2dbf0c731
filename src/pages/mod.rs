//! Page controllers.
//!
//! Each controller holds a point-in-time snapshot of what its page shows,
//! applies a mutation, then re-fetches. Fetch errors never escape a
//! controller: they become notices, and an expired session additionally
//! requests a redirect to the login route.

mod auth;
mod blog;
mod portfolio;
mod projects;
mod resource;
mod tags;

pub use auth::AuthPage;
pub use blog::BlogPage;
pub use portfolio::{PortfolioPage, MAX_AVATAR_BYTES};
pub use projects::ProjectsPage;
pub use resource::{messages, Messages, ResourcePage};
pub use tags::{TagInput, TagPolicy};

use devfolio_auth::ApiError;
use log::debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::routes::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A transient message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

/// Tells a controller whether its page is still on screen.
///
/// Clones share the flag. Once unmounted, results of requests still in
/// flight are dropped instead of being applied.
#[derive(Debug, Clone)]
pub struct MountHandle(Arc<AtomicBool>);

impl MountHandle {
    fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn unmount(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_mounted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Notices, pending redirect and mount flag shared by all controllers
#[derive(Debug)]
pub struct PageState {
    notices: Vec<Notice>,
    redirect: Option<Route>,
    mount: MountHandle,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            notices: Vec::new(),
            redirect: None,
            mount: MountHandle::new(),
        }
    }
}

impl PageState {
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn last_notice(&self) -> Option<&Notice> {
        self.notices.last()
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Route the page asked to navigate to, e.g. login after the session
    /// expired.
    pub fn redirect(&self) -> Option<&Route> {
        self.redirect.as_ref()
    }

    pub fn mount_handle(&self) -> MountHandle {
        self.mount.clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.mount.is_mounted()
    }

    /// Whether a result that just arrived may be applied.
    pub(crate) fn accepts_result(&self) -> bool {
        let mounted = self.is_mounted();
        if !mounted {
            debug!("Page unmounted, discarding result");
        }
        mounted
    }

    pub(crate) fn success(&mut self, message: impl Into<String>) {
        self.notices.push(Notice::success(message));
    }

    pub(crate) fn error(&mut self, message: impl Into<String>) {
        self.notices.push(Notice::error(message));
    }

    pub(crate) fn navigate(&mut self, route: Route) {
        self.redirect = Some(route);
    }

    /// Record a failed request. An expired session overrides `message` and
    /// schedules the login redirect.
    pub(crate) fn failure(&mut self, err: &ApiError, message: impl Into<String>) {
        if err.requires_login() {
            self.navigate(Route::Login);
            self.error(err.user_message());
        } else {
            self.error(message);
        }
    }
}

/// The message the server put in an error body, if there was one.
pub fn server_message(err: &ApiError) -> Option<String> {
    match err {
        ApiError::Validation(body)
        | ApiError::Unauthorized(body)
        | ApiError::Forbidden(body)
        | ApiError::NotFound(body)
            if !body.raw().trim().is_empty() =>
        {
            Some(body.message())
        }
        ApiError::Status { message, .. } if !message.is_empty() => Some(message.clone()),
        _ => None,
    }
}
