//! DevFolio Auth client for Rust
//!
//! This crate provides the session layer of the DevFolio client:
//! token persistence, the authentication state machine, an HTTP client that
//! transparently refreshes expired access tokens, and the `/users/`
//! endpoints (login, registration, GitHub login, profile, logout).

pub mod client;
pub mod collection;
pub mod error;
pub mod fetch;
pub mod session;
pub mod store;

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

pub use client::ApiClient;
pub use collection::{Collection, Resource, ResourceApi};
pub use error::{ApiError, ErrorBody};
pub use fetch::{ApiRequest, FormValue, Listing, MessageResponse, Page, Upload};
pub use session::{AuthEvent, AuthState, Session};
pub use store::{FileTokenStore, MemoryTokenStore, StoredToken, TokenJar, TokenStore};

pub type Result<T> = std::result::Result<T, ApiError>;

/// The signed-in user's account and profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub github_username: String,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Full name, or the username when no name is set.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

/// Access/refresh pair as issued by the token endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Registration form
#[derive(Debug, Clone, Default, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    pub password2: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl RegisterRequest {
    pub fn new(email: &str, username: &str, password: &str) -> Self {
        Self {
            email: email.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            password2: password.to_string(),
            ..Default::default()
        }
    }
}

/// Response of registration and GitHub login
#[derive(Debug, Clone, Deserialize)]
pub struct AccountResponse {
    pub user: User,
    pub tokens: TokenPair,
    #[serde(default)]
    pub message: Option<String>,
}

/// Partial profile update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_username: Option<String>,
    /// New avatar image; switches the request to multipart.
    #[serde(skip)]
    pub avatar: Option<Upload>,
}

impl ProfileUpdate {
    pub fn avatar(upload: Upload) -> Self {
        Self {
            avatar: Some(upload),
            ..Default::default()
        }
    }

    fn text_fields(&self) -> Vec<(String, FormValue)> {
        [
            ("username", &self.username),
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("bio", &self.bio),
            ("location", &self.location),
            ("website", &self.website),
            ("github_username", &self.github_username),
        ]
        .into_iter()
        .filter_map(|(name, value)| {
            value
                .as_ref()
                .map(|value| (name.to_string(), FormValue::Text(value.clone())))
        })
        .collect()
    }
}

/// Auth client
#[derive(Debug, Clone)]
pub struct Auth {
    api: Arc<ApiClient>,
}

impl Auth {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub fn session(&self) -> &Arc<Session> {
        self.api.session()
    }

    /// Validate a persisted token on start-up.
    ///
    /// Returns the user when the stored access token is still accepted. A
    /// rejected token clears the store and leaves the session anonymous.
    pub async fn initialize(&self) -> Result<Option<User>> {
        if self.session().access_token().is_none() {
            return Ok(None);
        }

        match self.profile().await {
            Ok(user) => {
                self.session().set_user(Some(user.clone()));
                self.session().apply(AuthEvent::Restored);
                info!("Restored session for {}", user.username);
                Ok(Some(user))
            }
            Err(err) => {
                warn!("Stored session rejected: {}", err);
                self.session().teardown()?;
                Ok(None)
            }
        }
    }

    /// メール・パスワードでログイン
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        self.session().apply(AuthEvent::Submitted);

        let outcome = async {
            let request = ApiRequest::post("/users/login/")
                .anonymous()
                .json(&json!({ "email": email, "password": password }))?;
            let tokens: TokenPair = self.api.execute(request).await?;
            self.session().store_tokens(&tokens.access, &tokens.refresh)?;
            self.profile().await
        }
        .await;

        self.finish_sign_in(outcome)
    }

    /// ユーザー登録
    pub async fn register(&self, request: &RegisterRequest) -> Result<User> {
        self.session().apply(AuthEvent::Submitted);

        let outcome = async {
            let request = ApiRequest::post("/users/register/").anonymous().json(request)?;
            self.accept_account(self.api.execute(request).await?)
        }
        .await;

        self.finish_sign_in(outcome)
    }

    /// Complete the GitHub OAuth flow with the code from the callback URL.
    pub async fn login_with_github(&self, code: &str) -> Result<User> {
        self.session().apply(AuthEvent::Submitted);

        let outcome = async {
            let request = ApiRequest::post("/users/auth/github/")
                .anonymous()
                .json(&json!({ "code": code }))?;
            self.accept_account(self.api.execute(request).await?)
        }
        .await;

        self.finish_sign_in(outcome)
    }

    /// Log out.
    ///
    /// The server is told to blacklist the refresh token, but a failure there
    /// does not stop local tokens from being cleared.
    pub async fn logout(&self) -> Result<()> {
        if let Some(refresh) = self.session().refresh_token() {
            let notified = match ApiRequest::post("/users/logout/")
                .no_refresh()
                .json(&json!({ "refresh_token": refresh }))
            {
                Ok(request) => self.api.execute_empty(request).await,
                Err(err) => Err(err),
            };
            if let Err(err) = notified {
                warn!("Logout notification failed: {}", err);
            }
        }

        self.session().teardown()
    }

    /// 現在のユーザーを取得
    pub async fn profile(&self) -> Result<User> {
        self.api.execute(ApiRequest::get("/users/profile/")).await
    }

    /// Update profile fields, uploading the avatar as multipart when given.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User> {
        let request = match &update.avatar {
            Some(upload) => {
                let mut fields = update.text_fields();
                fields.push(("avatar".to_string(), FormValue::File(upload.clone())));
                ApiRequest::patch("/users/profile/").multipart(fields)
            }
            None => ApiRequest::patch("/users/profile/").json(update)?,
        };

        let user: User = self.api.execute(request).await?;
        self.session().set_user(Some(user.clone()));
        Ok(user)
    }

    pub async fn change_password(&self, old_password: &str, new_password: &str) -> Result<String> {
        let request = ApiRequest::put("/users/change-password/").json(&json!({
            "old_password": old_password,
            "new_password": new_password,
            "new_password2": new_password,
        }))?;
        let response: MessageResponse = self.api.execute(request).await?;
        Ok(response.message)
    }

    /// Force a refresh-token exchange outside the 401 path.
    pub async fn refresh_session(&self) -> Result<String> {
        self.api.refresh_access_token().await
    }

    fn accept_account(&self, account: AccountResponse) -> Result<User> {
        self.session()
            .store_tokens(&account.tokens.access, &account.tokens.refresh)?;
        Ok(account.user)
    }

    fn finish_sign_in(&self, outcome: Result<User>) -> Result<User> {
        match outcome {
            Ok(user) => {
                self.session().set_user(Some(user.clone()));
                self.session().apply(AuthEvent::Succeeded);
                info!("Signed in as {}", user.username);
                Ok(user)
            }
            Err(err) => {
                if let Err(clear_err) = self.session().clear_tokens() {
                    warn!("Failed to clear tokens after sign-in error: {}", clear_err);
                }
                self.session().apply(AuthEvent::Failed);
                Err(err)
            }
        }
    }
}
