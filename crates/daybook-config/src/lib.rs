//! # daybook-config
//!
//! Layered configuration loading for daybook using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`DAYBOOK_*` prefix, `__` as separator)
//! 2. Project-level `.daybook/config.toml`
//! 3. User-level `~/.config/daybook/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `DAYBOOK_STORE__URL` -> `store.url`,
//! `DAYBOOK_PLANNER__WORK_HOURS__START` -> `planner.work_hours.start`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use daybook_config::DaybookConfig;
//!
//! let config = DaybookConfig::load_with_dotenv().expect("config");
//! if config.store.is_remote() {
//!     println!("remote store: {}", config.store.url);
//! }
//! ```

mod cache;
mod error;
mod store;

pub use cache::CacheConfig;
pub use daybook_core::PlannerConfig;
pub use error::ConfigError;
pub use store::StoreConfig;

use daybook_core::Objective;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Process-wide configuration, loaded once per run.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DaybookConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub planner: PlannerConfig,
    /// Longer-running goals handed to prioritization as context.
    #[serde(default)]
    pub objectives: Vec<Objective>,
}

impl DaybookConfig {
    /// Load and validate configuration from TOML files and environment variables.
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source cannot be parsed, or
    /// `ConfigError::InvalidValue` if a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration after reading a `.env` file from the current
    /// directory, if one exists.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Extract and validate from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or layer extra providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".daybook/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("DAYBOOK_").split("__"))
    }

    /// Check every section. Called by the loaders after extraction.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.store.validate()?;
        self.planner
            .validate()
            .map_err(|e| ConfigError::invalid("planner", e.to_string()))?;

        let mut ids = HashSet::new();
        for (index, objective) in self.objectives.iter().enumerate() {
            objective
                .validate()
                .map_err(|e| ConfigError::invalid(format!("objectives[{index}]"), e.to_string()))?;
            if !ids.insert(objective.id.as_str()) {
                return Err(ConfigError::invalid(
                    format!("objectives[{index}].id"),
                    format!("duplicate objective id {}", objective.id),
                ));
            }
        }
        Ok(())
    }

    /// Objectives flagged active.
    pub fn active_objectives(&self) -> impl Iterator<Item = &Objective> {
        self.objectives.iter().filter(|objective| objective.active)
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("daybook").join("config.toml"))
    }
}
