//! Local snapshot cache.
//!
//! One pretty-printed JSON file per date (`<dir>/<YYYY-MM-DD>.json`). Writes go
//! to a temporary file in the same directory, are fsynced, then renamed over
//! the target, so a reader never sees a partial snapshot.
//!
//! The cache is best-effort: `save` failures are logged and returned for the
//! caller to surface as warnings, and `load` treats any unreadable or invalid
//! snapshot as absent.

use std::io::Write;
use std::path::{Path, PathBuf};

use daybook_core::{DailyTaskSet, TaskDate};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::CacheError;

#[derive(Debug, Clone)]
pub struct LocalCache {
    dir: PathBuf,
}

impl LocalCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn path_for(&self, date: TaskDate) -> PathBuf {
        self.dir.join(format!("{date}.json"))
    }

    /// Atomically replace the snapshot for `set.date()`.
    ///
    /// # Errors
    ///
    /// Returns `CacheError` after logging it. Callers should report it as a
    /// warning and carry on.
    pub fn save(&self, set: &DailyTaskSet) -> Result<PathBuf, CacheError> {
        let path = self.path_for(set.date());
        self.write_atomic(&path, set).inspect_err(|e| {
            warn!(date = %set.date(), error = %e, "failed to save local snapshot");
        })?;
        debug!(date = %set.date(), path = %path.display(), "saved local snapshot");
        Ok(path)
    }

    /// Read the snapshot for `date`.
    ///
    /// Returns `None` if there is no snapshot or it fails to parse or validate.
    #[must_use]
    pub fn load(&self, date: TaskDate) -> Option<DailyTaskSet> {
        let path = self.path_for(date);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read local snapshot");
                return None;
            }
        };
        match serde_json::from_str::<DailyTaskSet>(&content) {
            Ok(set) if set.date() == date => Some(set),
            Ok(set) => {
                warn!(
                    path = %path.display(),
                    stored = %set.date(),
                    "local snapshot is for a different date, ignoring"
                );
                None
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "invalid local snapshot, ignoring");
                None
            }
        }
    }

    /// Whether a snapshot file exists for `date`, valid or not.
    #[must_use]
    pub fn contains(&self, date: TaskDate) -> bool {
        self.path_for(date).is_file()
    }

    fn write_atomic(&self, path: &Path, set: &DailyTaskSet) -> Result<(), CacheError> {
        let io_err = |source| CacheError::Io {
            path: self.dir.clone(),
            source,
        };
        std::fs::create_dir_all(&self.dir).map_err(io_err)?;

        let mut json = serde_json::to_string_pretty(set)?;
        json.push('\n');

        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(io_err)?;
        tmp.write_all(json.as_bytes()).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(path).map_err(|e| CacheError::Persist {
            path: path.to_path_buf(),
            source: e.error,
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use daybook_core::{Priority, Task};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn date() -> TaskDate {
        "2025-01-29".parse().unwrap()
    }

    fn sample_set() -> DailyTaskSet {
        let mut task = Task::new("Write changelog").unwrap();
        task.set_priority(Priority::P1);
        task.add_subtask("collect PRs").unwrap();
        DailyTaskSet::from_tasks(date(), vec![task, Task::new("Tidy desk").unwrap()]).unwrap()
    }

    #[test]
    fn save_then_load_is_entity_equal() {
        let dir = TempDir::new().unwrap();
        let cache = LocalCache::new(dir.path().join("daily"));
        let set = sample_set();

        let path = cache.save(&set).unwrap();
        assert_eq!(path, dir.path().join("daily").join("2025-01-29.json"));
        assert_eq!(cache.load(date()), Some(set));
    }

    #[test]
    fn snapshot_is_human_readable() {
        let dir = TempDir::new().unwrap();
        let cache = LocalCache::new(dir.path());
        let path = cache.save(&sample_set()).unwrap();
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.starts_with("{\n"));
        assert!(text.contains("\"summary\""));
    }

    #[test]
    fn save_overwrites_previous_snapshot() {
        let dir = TempDir::new().unwrap();
        let cache = LocalCache::new(dir.path());
        cache.save(&sample_set()).unwrap();
        let smaller =
            DailyTaskSet::from_tasks(date(), vec![Task::new("Only one").unwrap()]).unwrap();
        cache.save(&smaller).unwrap();
        assert_eq!(cache.load(date()).unwrap().len(), 1);
        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1, "temporary files should not linger");
    }

    #[test]
    fn missing_snapshot_is_absent() {
        let dir = TempDir::new().unwrap();
        let cache = LocalCache::new(dir.path());
        assert!(cache.load(date()).is_none());
        assert!(!cache.contains(date()));
    }

    #[test]
    fn corrupt_snapshot_is_absent() {
        let dir = TempDir::new().unwrap();
        let cache = LocalCache::new(dir.path());
        std::fs::write(cache.path_for(date()), "{\"date\": \"2025-01-29\", \"tasks\": [").unwrap();
        assert!(cache.contains(date()));
        assert!(cache.load(date()).is_none());
    }

    #[test]
    fn invalid_entity_snapshot_is_absent() {
        let dir = TempDir::new().unwrap();
        let cache = LocalCache::new(dir.path());
        let mut json = serde_json::to_value(sample_set()).unwrap();
        json["tasks"][0]["estimated_minutes"] = serde_json::json!(9999);
        std::fs::write(cache.path_for(date()), json.to_string()).unwrap();
        assert!(cache.load(date()).is_none());
    }

    #[test]
    fn snapshot_for_other_date_is_ignored() {
        let dir = TempDir::new().unwrap();
        let cache = LocalCache::new(dir.path());
        let path = cache.save(&sample_set()).unwrap();
        let other: TaskDate = "2025-01-30".parse().unwrap();
        std::fs::copy(path, cache.path_for(other)).unwrap();
        assert!(cache.load(other).is_none());
    }

    #[test]
    fn unwritable_directory_is_an_error_not_a_panic() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocked");
        std::fs::write(&blocker, "file, not a directory").unwrap();
        let cache = LocalCache::new(blocker.join("daily"));
        assert!(cache.save(&sample_set()).is_err());
    }
}
