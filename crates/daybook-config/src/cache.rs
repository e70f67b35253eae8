//! Local snapshot cache settings.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_dir() -> PathBuf {
    PathBuf::from("data/daily")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Directory holding one `<YYYY-MM-DD>.json` snapshot per date.
    #[serde(default = "default_dir")]
    pub dir: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { dir: default_dir() }
    }
}
