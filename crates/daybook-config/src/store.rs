//! Remote store (libSQL / Turso) settings.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::ConfigError;

/// Default per-call timeout for remote round trips, in seconds.
const fn default_timeout_secs() -> u64 {
    10
}

fn default_local_path() -> PathBuf {
    PathBuf::from(".daybook/daybook.db")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Remote database URL (e.g. `libsql://daybook-me.turso.io`). Empty means
    /// the store is a local database file at `local_path`.
    #[serde(default)]
    pub url: String,

    /// Auth token for the remote database.
    #[serde(default)]
    pub auth_token: String,

    /// Database file used when no remote URL is configured.
    #[serde(default = "default_local_path")]
    pub local_path: PathBuf,

    /// Upper bound on a single remote call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            auth_token: String::new(),
            local_path: default_local_path(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl StoreConfig {
    /// Whether both URL and token are set for remote access.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        !self.url.is_empty() && !self.auth_token.is_empty()
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::invalid("store.timeout_secs", "must be at least 1"));
        }
        if !self.url.is_empty() && self.auth_token.is_empty() {
            return Err(ConfigError::invalid(
                "store.auth_token",
                "required when store.url is set",
            ));
        }
        if !self.is_remote() && self.local_path.as_os_str().is_empty() {
            return Err(ConfigError::invalid(
                "store.local_path",
                "required when no remote url is configured",
            ));
        }
        Ok(())
    }
}
