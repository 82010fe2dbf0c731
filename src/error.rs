//! Error handling for the DevFolio Rust client

use std::fmt;
use thiserror::Error;

pub use devfolio_auth::ApiError;

/// Unified error type for the DevFolio Rust client
#[derive(Error, Debug)]
pub enum Error {
    /// Errors reported by the REST API or its transport
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system errors (preferences, resume output)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Template compilation errors
    #[error("Template error: {0}")]
    Template(#[from] handlebars::TemplateError),

    /// Template rendering errors
    #[error("Render error: {0}")]
    Render(#[from] handlebars::RenderError),

    /// Rejected user input
    #[error("Invalid input: {0}")]
    Input(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }

    /// Create a new input error
    pub fn input<T: fmt::Display>(msg: T) -> Self {
        Error::Input(msg.to_string())
    }

    /// Whether the user has to log in again
    pub fn requires_login(&self) -> bool {
        matches!(self, Error::Api(err) if err.requires_login())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
