//! Authenticated HTTP client wrapper.
//!
//! Attaches the stored access token to every request. A 401 triggers one
//! refresh-token exchange and one retry of the original request; a second 401
//! ends the session.

use log::{debug, info, warn};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::ApiError;
use crate::fetch::{ApiRequest, Listing};
use crate::session::{AuthEvent, Session};

/// Path of the refresh-token exchange, relative to the API base URL.
pub const TOKEN_REFRESH_PATH: &str = "/users/token/refresh/";

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access: String,
    #[serde(default)]
    refresh: Option<String>,
}

/// Client for the DevFolio REST API
#[derive(Debug)]
pub struct ApiClient {
    base_url: String,
    http_client: Client,
    session: Arc<Session>,
    refresh_lock: Mutex<()>,
}

impl ApiClient {
    pub fn new(base_url: &str, http_client: Client, session: Arc<Session>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
            session,
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Send `request`, refreshing once on 401, and return the success response.
    pub async fn send(&self, request: &ApiRequest) -> Result<Response, ApiError> {
        let sent_token = if request.attaches_token() {
            self.session.access_token()
        } else {
            None
        };

        let response = self.dispatch(request, sent_token.as_deref()).await?;
        if response.status() != StatusCode::UNAUTHORIZED || !request.refreshes_on_unauthorized() {
            return Self::check(response).await;
        }

        debug!("{} {} returned 401, refreshing", request.method(), request.path());
        let fresh_token = self.refresh_after(sent_token.as_deref()).await?;

        let retried = self.dispatch(request, Some(&fresh_token)).await?;
        if retried.status() == StatusCode::UNAUTHORIZED {
            warn!(
                "{} {} still unauthorized after refresh, ending session",
                request.method(),
                request.path()
            );
            self.expire_session();
            return Err(ApiError::SessionExpired);
        }

        Self::check(retried).await
    }

    /// Send and decode a JSON response body
    pub async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let response = self.send(&request).await?;
        Ok(response.json::<T>().await?)
    }

    /// Send and decode a list, accepting bare arrays and paginated pages.
    ///
    /// A 404 on a list means there is nothing to show yet and yields an empty
    /// vector.
    pub async fn execute_list<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<Vec<T>, ApiError> {
        match self.execute::<Listing<T>>(request).await {
            Ok(listing) => Ok(listing.into_vec()),
            Err(err) if err.is_not_found() => {
                debug!("List endpoint returned 404, treating as empty");
                Ok(Vec::new())
            }
            Err(err) => Err(err),
        }
    }

    /// Send and ignore whatever body comes back
    pub async fn execute_empty(&self, request: ApiRequest) -> Result<(), ApiError> {
        self.send(&request).await?;
        Ok(())
    }

    /// Exchange the stored refresh token for a new access token.
    pub async fn refresh_access_token(&self) -> Result<String, ApiError> {
        let refresh = self.session.refresh_token().ok_or(ApiError::MissingSession)?;

        let request = ApiRequest::post(TOKEN_REFRESH_PATH)
            .anonymous()
            .json(&json!({ "refresh": refresh }))?;
        let response = Self::check(self.dispatch(&request, None).await?).await?;
        let tokens: RefreshResponse = response.json().await?;

        match &tokens.refresh {
            Some(rotated) => self.session.store_tokens(&tokens.access, rotated)?,
            None => self.session.store_access_token(&tokens.access)?,
        }
        info!("Access token refreshed");

        Ok(tokens.access)
    }

    /// Obtain a usable access token after `rejected` came back 401.
    ///
    /// Only one exchange runs at a time. A caller that waited on the lock and
    /// finds a different token already stored uses that one instead of
    /// refreshing again.
    async fn refresh_after(&self, rejected: Option<&str>) -> Result<String, ApiError> {
        let _guard = self.refresh_lock.lock().await;

        if let Some(current) = self.session.access_token() {
            if Some(current.as_str()) != rejected {
                debug!("Access token already refreshed by another request");
                return Ok(current);
            }
        }

        self.session.apply(AuthEvent::Unauthorized);
        match self.refresh_access_token().await {
            Ok(token) => {
                self.session.apply(AuthEvent::Refreshed);
                Ok(token)
            }
            Err(err) => {
                warn!("Token refresh failed: {}", err);
                self.expire_session();
                Err(ApiError::SessionExpired)
            }
        }
    }

    fn expire_session(&self) {
        if let Err(err) = self.session.expire() {
            warn!("Failed to clear stored tokens: {}", err);
        }
    }

    async fn dispatch(&self, request: &ApiRequest, token: Option<&str>) -> Result<Response, ApiError> {
        let req = request.build(&self.http_client, &self.base_url, token)?;
        debug!("{} {}{}", request.method(), self.base_url, request.path());
        Ok(req.send().await?)
    }

    async fn check(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await.unwrap_or_default();
        Err(ApiError::from_status(status, text))
    }
}
