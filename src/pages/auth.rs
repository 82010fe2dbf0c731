use devfolio_auth::{ApiError, Auth, ErrorBody, RegisterRequest, User};
use log::warn;
use serde_json::Value;

use super::PageState;
use crate::routes::Route;

/// Login, registration and logout forms.
///
/// A successful sign-in sends the user to the dashboard and logging out
/// always ends on the login page. Failures stay on the form with a notice.
pub struct AuthPage {
    auth: Auth,
    user: Option<User>,
    submitting: bool,
    state: PageState,
}

fn error_body(err: &ApiError) -> Option<&ErrorBody> {
    match err {
        ApiError::Validation(body)
        | ApiError::Unauthorized(body)
        | ApiError::Forbidden(body)
        | ApiError::NotFound(body) => Some(body),
        _ => None,
    }
}

/// `detail` of the error body, if the server sent one
fn detail(err: &ApiError) -> Option<String> {
    error_body(err)
        .and_then(ErrorBody::json)
        .and_then(|json| json.get("detail"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// First `email` error, then first `username` error
fn registration_error(err: &ApiError) -> Option<String> {
    let body = error_body(err)?;
    ["email", "username"]
        .iter()
        .find_map(|field| body.field_errors(field).into_iter().next())
}

impl AuthPage {
    pub fn new(auth: Auth) -> Self {
        Self {
            auth,
            user: None,
            submitting: false,
            state: PageState::default(),
        }
    }

    pub async fn login(&mut self, email: &str, password: &str) -> bool {
        self.submitting = true;
        let result = self.auth.login(email, password).await;
        self.submitting = false;
        self.signed_in(result, "Login successful!", |err| {
            detail(err).unwrap_or_else(|| "Login failed".to_string())
        })
    }

    pub async fn register(&mut self, request: &RegisterRequest) -> bool {
        self.submitting = true;
        let result = self.auth.register(request).await;
        self.submitting = false;
        self.signed_in(result, "Registration successful!", |err| {
            registration_error(err).unwrap_or_else(|| "Registration failed".to_string())
        })
    }

    /// Finish the GitHub callback with its `code` parameter.
    pub async fn login_with_github(&mut self, code: &str) -> bool {
        self.submitting = true;
        let result = self.auth.login_with_github(code).await;
        self.submitting = false;
        self.signed_in(result, "GitHub login successful!", |_| {
            "GitHub authentication failed".to_string()
        })
    }

    /// Sign out. Local tokens are dropped even when the server call fails.
    pub async fn logout(&mut self) {
        if let Err(err) = self.auth.logout().await {
            warn!("Logout error: {}", err);
        }
        self.user = None;
        if !self.state.accepts_result() {
            return;
        }
        self.state.success("Logged out successfully");
        self.state.navigate(Route::Login);
    }

    fn signed_in(
        &mut self,
        result: Result<User, ApiError>,
        success: &str,
        failure: impl FnOnce(&ApiError) -> String,
    ) -> bool {
        if !self.state.accepts_result() {
            return false;
        }
        match result {
            Ok(user) => {
                self.user = Some(user);
                self.state.success(success);
                self.state.navigate(Route::Dashboard);
                true
            }
            Err(err) => {
                warn!("Sign-in failed: {}", err);
                self.state.error(failure(&err));
                false
            }
        }
    }

    /// The account signed in through this page
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }
}
