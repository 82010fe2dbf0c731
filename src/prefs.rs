//! Local viewer preferences.

use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub dark_mode: bool,
}

/// Preferences kept in a JSON file, or in memory when no file is configured.
#[derive(Debug, Default)]
pub struct PrefsStore {
    path: Option<PathBuf>,
    current: RwLock<Preferences>,
}

impl PrefsStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open `path`; a missing or empty file yields the defaults.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let current = read_prefs(&path)?;
        Ok(Self {
            path: Some(path),
            current: RwLock::new(current),
        })
    }

    pub fn get(&self) -> Preferences {
        *self.current.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn dark_mode(&self) -> bool {
        self.get().dark_mode
    }

    pub fn set_dark_mode(&self, enabled: bool) -> Result<()> {
        self.update(|prefs| prefs.dark_mode = enabled)
    }

    /// Flip dark mode and return the new value.
    pub fn toggle_dark_mode(&self) -> Result<bool> {
        let enabled = !self.dark_mode();
        self.set_dark_mode(enabled)?;
        Ok(enabled)
    }

    fn update(&self, change: impl FnOnce(&mut Preferences)) -> Result<()> {
        let snapshot = {
            let mut guard = self.current.write().unwrap_or_else(|poisoned| poisoned.into_inner());
            change(&mut guard);
            *guard
        };

        if let Some(path) = &self.path {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(path, serde_json::to_vec_pretty(&snapshot)?)?;
            debug!("Saved preferences to {}", path.display());
        }
        Ok(())
    }
}

fn read_prefs(path: &Path) -> Result<Preferences> {
    match fs::read(path) {
        Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Preferences::default()),
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(Preferences::default()),
        Err(err) => Err(err.into()),
    }
}
