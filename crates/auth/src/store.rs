//! Persistent token storage.
//!
//! Tokens are kept the way a browser keeps cookies: each value carries an
//! absolute expiry and an expired entry reads as absent.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::ApiError;

/// Lifetime of a stored access token.
pub const ACCESS_TOKEN_TTL_DAYS: i64 = 1;
/// Lifetime of a stored refresh token.
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 7;

/// A single token with its expiry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl StoredToken {
    pub fn new(value: &str, ttl: Duration) -> Self {
        Self {
            value: value.to_string(),
            expires_at: Utc::now() + ttl,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// The full set of persisted tokens
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenJar {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<StoredToken>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<StoredToken>,
}

impl TokenJar {
    pub fn access(&self, now: DateTime<Utc>) -> Option<&str> {
        live_value(&self.access_token, now)
    }

    pub fn refresh(&self, now: DateTime<Utc>) -> Option<&str> {
        live_value(&self.refresh_token, now)
    }

    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }
}

fn live_value(token: &Option<StoredToken>, now: DateTime<Utc>) -> Option<&str> {
    token
        .as_ref()
        .filter(|token| !token.is_expired_at(now))
        .map(|token| token.value.as_str())
}

/// Where the token jar lives between runs.
///
/// Writes replace the whole jar; the last writer wins.
pub trait TokenStore: Send + Sync + fmt::Debug {
    fn load(&self) -> Result<TokenJar, ApiError>;

    fn save(&self, jar: &TokenJar) -> Result<(), ApiError>;
}

/// Process-lifetime store, used in tests and for throwaway sessions
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    jar: RwLock<TokenJar>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_jar(jar: TokenJar) -> Self {
        Self {
            jar: RwLock::new(jar),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<TokenJar, ApiError> {
        let guard = self.jar.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(guard.clone())
    }

    fn save(&self, jar: &TokenJar) -> Result<(), ApiError> {
        let mut guard = self.jar.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = jar.clone();
        Ok(())
    }
}

/// JSON cookie-jar file on disk
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<TokenJar, ApiError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(TokenJar::default()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(TokenJar::default()),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, jar: &TokenJar) -> Result<(), ApiError> {
        if jar.is_empty() {
            return match fs::remove_file(&self.path) {
                Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err.into()),
                _ => Ok(()),
            };
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let contents = serde_json::to_string_pretty(jar)?;
        fs::write(&self.path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expired_tokens_read_as_absent() {
        let now = Utc::now();
        let jar = TokenJar {
            access_token: Some(StoredToken {
                value: "old".into(),
                expires_at: now - Duration::seconds(1),
            }),
            refresh_token: Some(StoredToken::new("r", Duration::days(REFRESH_TOKEN_TTL_DAYS))),
        };

        assert_eq!(jar.access(now), None);
        assert_eq!(jar.refresh(now), Some("r"));
    }

    #[test]
    fn file_store_round_trips_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested").join("tokens.json"));

        assert!(store.load().unwrap().is_empty());

        let jar = TokenJar {
            access_token: Some(StoredToken::new("a", Duration::days(ACCESS_TOKEN_TTL_DAYS))),
            refresh_token: Some(StoredToken::new("r", Duration::days(REFRESH_TOKEN_TTL_DAYS))),
        };
        store.save(&jar).unwrap();
        assert_eq!(store.load().unwrap(), jar);

        store.save(&TokenJar::default()).unwrap();
        assert!(!store.path().exists());
        assert!(store.load().unwrap().is_empty());
    }
}
