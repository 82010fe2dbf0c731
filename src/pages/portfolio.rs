use devfolio_auth::{Auth, ProfileUpdate, Upload, User};
use devfolio_portfolio::{Portfolio, PortfolioClient, PortfolioForm};
use log::{info, warn};

use super::{server_message, PageState};

/// Largest avatar the page accepts, in bytes.
pub const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

/// The portfolio settings page.
///
/// A user has at most one portfolio: saving creates it when missing and
/// updates it otherwise.
pub struct PortfolioPage {
    client: PortfolioClient,
    auth: Auth,
    portfolio: Option<Portfolio>,
    form: PortfolioForm,
    state: PageState,
}

impl PortfolioPage {
    pub fn new(client: PortfolioClient, auth: Auth) -> Self {
        Self {
            client,
            auth,
            portfolio: None,
            form: PortfolioForm::default(),
            state: PageState::default(),
        }
    }

    pub async fn load(&mut self) {
        let result = self.client.my_portfolio().await;
        if !self.state.accepts_result() {
            return;
        }
        match result {
            Ok(Some(portfolio)) => {
                self.form = PortfolioForm::from(&portfolio);
                self.portfolio = Some(portfolio);
            }
            Ok(None) => {
                self.form = PortfolioForm::default();
                self.portfolio = None;
            }
            Err(err) => {
                warn!("Failed to load portfolio: {}", err);
                self.state.failure(&err, "Failed to load portfolio");
            }
        }
    }

    /// Create or update with `form`, then reload.
    pub async fn save(&mut self, form: PortfolioForm) -> bool {
        let (result, success, fallback) = match &self.portfolio {
            Some(existing) => (
                self.client.update(existing.id, &form).await,
                "Portfolio updated successfully!",
                "Failed to update portfolio",
            ),
            None => (
                self.client.create(&form).await,
                "Portfolio created successfully!",
                "Failed to create portfolio",
            ),
        };
        if !self.state.accepts_result() {
            return false;
        }

        match result {
            Ok(_) => {
                info!("Saved portfolio {}", form.title);
                self.state.success(success);
                self.form = form;
                self.load().await;
                true
            }
            Err(err) => {
                let message = server_message(&err).unwrap_or_else(|| fallback.to_string());
                self.state.failure(&err, message);
                false
            }
        }
    }

    /// Replace the profile picture.
    pub async fn upload_avatar(&mut self, file: Option<Upload>) -> Option<User> {
        let file = match file {
            Some(file) => file,
            None => {
                self.state.error("Please select an image first");
                return None;
            }
        };
        if file.bytes.len() > MAX_AVATAR_BYTES {
            self.state.error("Image size should be less than 5MB");
            return None;
        }

        let result = self.auth.update_profile(&ProfileUpdate::avatar(file)).await;
        if !self.state.accepts_result() {
            return None;
        }
        match result {
            Ok(user) => {
                self.state.success("Profile picture updated successfully!");
                Some(user)
            }
            Err(err) => {
                warn!("Avatar upload failed: {}", err);
                self.state.failure(&err, "Failed to upload image");
                None
            }
        }
    }

    pub fn portfolio(&self) -> Option<&Portfolio> {
        self.portfolio.as_ref()
    }

    /// Form as loaded from the server, or the defaults for a new portfolio
    pub fn form(&self) -> &PortfolioForm {
        &self.form
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut PageState {
        &mut self.state
    }
}
