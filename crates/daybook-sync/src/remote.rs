//! Remote store contract.
//!
//! The authoritative store keeps one [`DailyRecord`] per date and supports
//! point lookup, insert, and full-record update. Duplicate inserts must be
//! reported as [`RemoteErrorKind::ConstraintViolation`] so the reconciler can
//! retry them as updates.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use daybook_core::{CoreError, DailyTaskSet, Summary, Task, TaskDate, TaskRecord};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// DailyRecord
// ---------------------------------------------------------------------------

/// The remote row for one date: `{date, tasks, summary}` plus the store's
/// own modification time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DailyRecord {
    pub date: TaskDate,
    pub tasks: Vec<TaskRecord>,
    pub summary: Summary,
    /// Set by the store; ignored on write.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl DailyRecord {
    #[must_use]
    pub fn from_set(set: &DailyTaskSet) -> Self {
        Self {
            date: set.date(),
            tasks: set.tasks().iter().map(|task| task.as_record().clone()).collect(),
            summary: set.summary().clone(),
            updated_at: None,
        }
    }

    /// Validate the record into a task set. The stored summary is discarded
    /// and recomputed.
    ///
    /// # Errors
    ///
    /// Returns `CoreError` if any task fails validation or IDs repeat.
    pub fn into_set(self) -> Result<DailyTaskSet, CoreError> {
        let tasks = self
            .tasks
            .into_iter()
            .map(Task::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        DailyTaskSet::from_tasks(self.date, tasks)
    }
}

// ---------------------------------------------------------------------------
// RemoteError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteErrorKind {
    /// Store unreachable or too slow.
    Connection,
    /// A record for the date already exists.
    ConstraintViolation,
    /// Credentials rejected or write access denied.
    Permission,
    Unknown,
}

impl RemoteErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Connection => "connection",
            Self::ConstraintViolation => "constraint_violation",
            Self::Permission => "permission",
            Self::Unknown => "unknown",
        }
    }

    /// Classify a store error by its message text.
    #[must_use]
    pub fn classify(message: &str) -> Self {
        let msg = message.to_ascii_lowercase();
        if msg.contains("unique constraint failed") || msg.contains("duplicate key") {
            Self::ConstraintViolation
        } else if msg.contains("permission")
            || msg.contains("unauthorized")
            || msg.contains("forbidden")
            || msg.contains("readonly")
            || msg.contains("authentication")
            || msg.contains("authorization")
        {
            Self::Permission
        } else if msg.contains("connection")
            || msg.contains("network")
            || msg.contains("timed out")
            || msg.contains("timeout")
            || msg.contains("hrana")
            || msg.contains("dns")
            || msg.contains("unreachable")
        {
            Self::Connection
        } else {
            Self::Unknown
        }
    }
}

impl fmt::Display for RemoteErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified failure of one remote call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} error: {message}")]
pub struct RemoteError {
    pub kind: RemoteErrorKind,
    pub message: String,
}

impl RemoteError {
    pub fn new(kind: RemoteErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::Connection, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::Unknown, message)
    }

    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.kind == RemoteErrorKind::ConstraintViolation
    }
}

impl From<libsql::Error> for RemoteError {
    fn from(error: libsql::Error) -> Self {
        let message = error.to_string();
        Self::new(RemoteErrorKind::classify(&message), message)
    }
}

// ---------------------------------------------------------------------------
// RemoteStore
// ---------------------------------------------------------------------------

#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Point lookup by date.
    async fn fetch(&self, date: TaskDate) -> Result<Option<DailyRecord>, RemoteError>;

    /// Create the record for `record.date`. Fails with
    /// [`RemoteErrorKind::ConstraintViolation`] if one exists.
    async fn insert(&self, record: &DailyRecord) -> Result<(), RemoteError>;

    /// Replace the tasks and summary of an existing record.
    async fn update(&self, record: &DailyRecord) -> Result<(), RemoteError>;
}

#[async_trait]
impl<S: RemoteStore + ?Sized> RemoteStore for Arc<S> {
    async fn fetch(&self, date: TaskDate) -> Result<Option<DailyRecord>, RemoteError> {
        (**self).fetch(date).await
    }

    async fn insert(&self, record: &DailyRecord) -> Result<(), RemoteError> {
        (**self).insert(record).await
    }

    async fn update(&self, record: &DailyRecord) -> Result<(), RemoteError> {
        (**self).update(record).await
    }
}

/// Stand-in for a store that could not be opened. Every call fails with a
/// connection error carrying the original reason, so reads still fall back
/// to the local cache.
#[derive(Debug, Clone)]
pub struct UnreachableStore {
    reason: String,
}

impl UnreachableStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn error(&self) -> RemoteError {
        RemoteError::connection(format!("remote store unavailable: {}", self.reason))
    }
}

#[async_trait]
impl RemoteStore for UnreachableStore {
    async fn fetch(&self, _date: TaskDate) -> Result<Option<DailyRecord>, RemoteError> {
        Err(self.error())
    }

    async fn insert(&self, _record: &DailyRecord) -> Result<(), RemoteError> {
        Err(self.error())
    }

    async fn update(&self, _record: &DailyRecord) -> Result<(), RemoteError> {
        Err(self.error())
    }
}
