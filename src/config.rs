//! Configuration options for the DevFolio client

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_SITE_URL: &str = "http://localhost:3000";

/// Configuration options for the DevFolio client
#[derive(Debug, Clone, PartialEq)]
pub struct ClientOptions {
    /// Base URL of the REST API, including the `/api` prefix
    pub api_url: String,

    /// Public web front end, used for share links
    pub site_url: String,

    /// Where tokens are persisted; `None` keeps them in memory
    pub token_file: Option<PathBuf>,

    /// Where preferences such as dark mode are persisted
    pub prefs_file: Option<PathBuf>,

    /// The request timeout
    pub request_timeout: Option<Duration>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            site_url: DEFAULT_SITE_URL.to_string(),
            token_file: None,
            prefs_file: None,
            request_timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl ClientOptions {
    /// Build options from the environment, after loading `.env` if present.
    ///
    /// Reads `DEVFOLIO_API_URL`, `DEVFOLIO_SITE_URL`, `DEVFOLIO_TOKEN_FILE`,
    /// `DEVFOLIO_PREFS_FILE` and `DEVFOLIO_TIMEOUT_SECS`. Unset variables keep
    /// their defaults.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let mut options = Self::default();
        if let Ok(url) = env::var("DEVFOLIO_API_URL") {
            options = options.with_api_url(&url);
        }
        if let Ok(url) = env::var("DEVFOLIO_SITE_URL") {
            options = options.with_site_url(&url);
        }
        if let Ok(path) = env::var("DEVFOLIO_TOKEN_FILE") {
            options = options.with_token_file(Some(PathBuf::from(path)));
        }
        if let Ok(path) = env::var("DEVFOLIO_PREFS_FILE") {
            options = options.with_prefs_file(Some(PathBuf::from(path)));
        }
        if let Ok(secs) = env::var("DEVFOLIO_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                Error::config(format!("DEVFOLIO_TIMEOUT_SECS is not a number: {}", secs))
            })?;
            options = options.with_request_timeout(Some(Duration::from_secs(secs)));
        }

        options.validate()?;
        Ok(options)
    }

    /// Check that both URLs parse.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.api_url)
            .map_err(|err| Error::config(format!("invalid API URL {}: {}", self.api_url, err)))?;
        url::Url::parse(&self.site_url)
            .map_err(|err| Error::config(format!("invalid site URL {}: {}", self.site_url, err)))?;
        Ok(())
    }

    /// Set the API base URL
    pub fn with_api_url(mut self, value: &str) -> Self {
        self.api_url = value.trim_end_matches('/').to_string();
        self
    }

    /// Set the public site URL
    pub fn with_site_url(mut self, value: &str) -> Self {
        self.site_url = value.trim_end_matches('/').to_string();
        self
    }

    /// Set the token file
    pub fn with_token_file(mut self, value: Option<PathBuf>) -> Self {
        self.token_file = value;
        self
    }

    /// Set the preferences file
    pub fn with_prefs_file(mut self, value: Option<PathBuf>) -> Self {
        self.prefs_file = value;
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_backend() {
        let options = ClientOptions::default();
        assert_eq!(options.api_url, "http://localhost:8000/api");
        assert_eq!(options.request_timeout, Some(Duration::from_secs(30)));
        assert!(options.token_file.is_none());
        assert!(options.validate().is_ok());
    }

    #[test]
    fn setters_trim_trailing_slashes() {
        let options = ClientOptions::default()
            .with_api_url("https://devfolio.example.com/api/")
            .with_site_url("https://devfolio.example.com/");
        assert_eq!(options.api_url, "https://devfolio.example.com/api");
        assert_eq!(options.site_url, "https://devfolio.example.com");
    }

    #[test]
    fn invalid_url_is_a_config_error() {
        let options = ClientOptions::default().with_api_url("not a url");
        assert!(matches!(options.validate(), Err(Error::Config(_))));
    }
}
