//! libSQL implementation of [`RemoteStore`].
//!
//! Works against a local database file (or `:memory:`) and against a remote
//! Turso database over HTTP. Either way the schema is a single
//! `daily_tasks` table created by the embedded migrations.

use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use daybook_config::StoreConfig;
use daybook_core::{Summary, TaskDate, TaskRecord};
use libsql::Builder;
use tracing::debug;

use crate::error::SyncError;
use crate::helpers::{parse_datetime, parse_json_column};
use crate::remote::{DailyRecord, RemoteError, RemoteStore};

pub struct LibSqlStore {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl LibSqlStore {
    /// Open a local database file. Runs migrations on open.
    ///
    /// # Errors
    ///
    /// Returns `SyncError` if the database cannot be opened or migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, SyncError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;
        let store = Self { db, conn };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Connect to a remote libSQL database. Runs migrations on open.
    ///
    /// # Errors
    ///
    /// Returns `SyncError` if the connection or migrations fail.
    pub async fn open_remote(url: &str, auth_token: &str) -> Result<Self, SyncError> {
        let db = Builder::new_remote(url.to_string(), auth_token.to_string())
            .build()
            .await?;
        let conn = db.connect()?;
        let store = Self { db, conn };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Open whichever store `config` describes, bounded by its timeout.
    ///
    /// A local store's parent directory is created if missing.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Timeout` if opening takes longer than
    /// `config.timeout_secs`, or the underlying open error.
    pub async fn open(config: &StoreConfig) -> Result<Self, SyncError> {
        let timeout = config.timeout();
        let open = async {
            if config.is_remote() {
                debug!(url = %config.url, "opening remote store");
                Self::open_remote(&config.url, &config.auth_token).await
            } else {
                debug!(path = %config.local_path.display(), "opening local store");
                ensure_parent(&config.local_path)?;
                let path = config.local_path.to_string_lossy();
                Self::open_local(&path).await
            }
        };
        tokio::time::timeout(timeout, open)
            .await
            .map_err(|_| SyncError::Timeout(timeout))?
    }

    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }
}

fn ensure_parent(path: &Path) -> Result<(), SyncError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SyncError::Other(anyhow::anyhow!(
                    "failed to create {}: {e}",
                    parent.display()
                ))
            })?;
        }
    }
    Ok(())
}

fn encode(record: &DailyRecord) -> Result<(String, String), RemoteError> {
    let tasks = serde_json::to_string(&record.tasks)
        .map_err(|e| RemoteError::unknown(format!("failed to encode tasks: {e}")))?;
    let summary = serde_json::to_string(&record.summary)
        .map_err(|e| RemoteError::unknown(format!("failed to encode summary: {e}")))?;
    Ok((tasks, summary))
}

fn row_to_record(date: TaskDate, row: &libsql::Row) -> Result<DailyRecord, SyncError> {
    let tasks: Vec<TaskRecord> = parse_json_column("tasks", &row.get::<String>(0)?)?;
    let summary: Summary = parse_json_column("summary", &row.get::<String>(1)?)?;
    let updated_at = parse_datetime(&row.get::<String>(2)?)?;
    Ok(DailyRecord {
        date,
        tasks,
        summary,
        updated_at: Some(updated_at),
    })
}

#[async_trait]
impl RemoteStore for LibSqlStore {
    async fn fetch(&self, date: TaskDate) -> Result<Option<DailyRecord>, RemoteError> {
        let key = date.to_string();
        let mut rows = self
            .conn
            .query(
                "SELECT tasks, summary, updated_at FROM daily_tasks WHERE date = ?1",
                [key.as_str()],
            )
            .await?;
        let Some(row) = rows.next().await? else {
            return Ok(None);
        };
        row_to_record(date, &row)
            .map(Some)
            .map_err(|e| {
                RemoteError::unknown(format!("stored record for {date} is unreadable: {e}"))
            })
    }

    async fn insert(&self, record: &DailyRecord) -> Result<(), RemoteError> {
        let (tasks, summary) = encode(record)?;
        let now = Utc::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT INTO daily_tasks (date, tasks, summary, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                libsql::params![
                    record.date.to_string(),
                    tasks,
                    summary,
                    now.as_str(),
                    now.as_str()
                ],
            )
            .await?;
        Ok(())
    }

    async fn update(&self, record: &DailyRecord) -> Result<(), RemoteError> {
        let (tasks, summary) = encode(record)?;
        let changed = self
            .conn
            .execute(
                "UPDATE daily_tasks SET tasks = ?2, summary = ?3, updated_at = ?4 WHERE date = ?1",
                libsql::params![
                    record.date.to_string(),
                    tasks,
                    summary,
                    Utc::now().to_rfc3339()
                ],
            )
            .await?;
        if changed == 0 {
            return Err(RemoteError::unknown(format!(
                "no daily record for {} to update",
                record.date
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::RemoteErrorKind;
    use daybook_core::{DailyTaskSet, Task};
    use pretty_assertions::assert_eq;

    async fn test_store() -> LibSqlStore {
        LibSqlStore::open_local(":memory:").await.unwrap()
    }

    fn record(date: &str, titles: &[&str]) -> DailyRecord {
        let tasks = titles.iter().map(|t| Task::new(*t).unwrap()).collect();
        let set = DailyTaskSet::from_tasks(date.parse().unwrap(), tasks).unwrap();
        DailyRecord::from_set(&set)
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let store = test_store().await;
        let mut rows = store
            .conn()
            .query(
                "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                ["daily_tasks"],
            )
            .await
            .unwrap();
        assert!(rows.next().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn idempotent_migrations() {
        let store = test_store().await;
        store.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn fetch_missing_date_is_none() {
        let store = test_store().await;
        let date: TaskDate = "2025-01-29".parse().unwrap();
        assert!(store.fetch(date).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn insert_then_fetch() {
        let store = test_store().await;
        let record = record("2025-01-29", &["Standup", "Review"]);
        store.insert(&record).await.unwrap();

        let fetched = store.fetch(record.date).await.unwrap().unwrap();
        assert!(fetched.updated_at.is_some());
        assert_eq!(fetched.tasks, record.tasks);
        assert_eq!(fetched.summary, record.summary);
    }

    #[tokio::test]
    async fn duplicate_insert_is_constraint_violation() {
        let store = test_store().await;
        let record = record("2025-01-29", &["Standup"]);
        store.insert(&record).await.unwrap();
        let err = store.insert(&record).await.unwrap_err();
        assert_eq!(err.kind, RemoteErrorKind::ConstraintViolation, "{err}");
    }

    #[tokio::test]
    async fn update_replaces_payload() {
        let store = test_store().await;
        let first = record("2025-01-29", &["Standup"]);
        store.insert(&first).await.unwrap();
        let second = record("2025-01-29", &["Retro", "Planning"]);
        store.update(&second).await.unwrap();

        let fetched = store.fetch(first.date).await.unwrap().unwrap();
        assert_eq!(fetched.tasks, second.tasks);
        assert_eq!(fetched.summary.total_tasks, 2);
    }

    #[tokio::test]
    async fn update_missing_record_fails() {
        let store = test_store().await;
        let err = store.update(&record("2025-01-29", &["x"])).await.unwrap_err();
        assert_eq!(err.kind, RemoteErrorKind::Unknown);
    }

    #[tokio::test]
    async fn corrupt_row_is_reported_not_panicked() {
        let store = test_store().await;
        store
            .conn()
            .execute(
                "INSERT INTO daily_tasks (date, tasks, summary) VALUES ('2025-01-29', 'oops', '{}')",
                (),
            )
            .await
            .unwrap();
        let err = store
            .fetch("2025-01-29".parse().unwrap())
            .await
            .unwrap_err();
        assert!(err.message.contains("tasks"), "{err}");
    }
}
