//! In-memory [`RemoteStore`] with fault injection.
//!
//! Clones share state, so several reconcilers can write to one store the way
//! independent processes share a database. Faults let callers reproduce
//! outages and the insert/insert race deterministically.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use daybook_core::TaskDate;
use tokio::sync::Mutex;

use crate::remote::{DailyRecord, RemoteError, RemoteErrorKind, RemoteStore};

#[derive(Debug, Default)]
struct Faults {
    offline: bool,
    stale_fetches: u32,
    fail_next_write: Option<RemoteErrorKind>,
}

/// Calls seen by a [`MemoryStore`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub fetches: u32,
    pub inserts: u32,
    pub updates: u32,
}

#[derive(Debug, Default)]
struct State {
    records: BTreeMap<TaskDate, DailyRecord>,
    faults: Faults,
    calls: CallCounts,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail with a connection error until turned back on.
    pub async fn set_offline(&self, offline: bool) {
        self.state.lock().await.faults.offline = offline;
    }

    /// The next `count` fetches report no record even if one exists.
    pub async fn stale_fetches(&self, count: u32) {
        self.state.lock().await.faults.stale_fetches = count;
    }

    /// Fail the next insert or update with `kind`.
    pub async fn fail_next_write(&self, kind: RemoteErrorKind) {
        self.state.lock().await.faults.fail_next_write = Some(kind);
    }

    pub async fn record(&self, date: TaskDate) -> Option<DailyRecord> {
        self.state.lock().await.records.get(&date).cloned()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn calls(&self) -> CallCounts {
        self.state.lock().await.calls
    }
}

fn offline() -> RemoteError {
    RemoteError::connection("store is offline")
}

impl State {
    fn take_write_fault(&mut self) -> Result<(), RemoteError> {
        if self.faults.offline {
            return Err(offline());
        }
        if let Some(kind) = self.faults.fail_next_write.take() {
            return Err(RemoteError::new(kind, format!("injected {kind} failure")));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn fetch(&self, date: TaskDate) -> Result<Option<DailyRecord>, RemoteError> {
        let mut state = self.state.lock().await;
        state.calls.fetches += 1;
        if state.faults.offline {
            return Err(offline());
        }
        if state.faults.stale_fetches > 0 {
            state.faults.stale_fetches -= 1;
            return Ok(None);
        }
        Ok(state.records.get(&date).cloned())
    }

    async fn insert(&self, record: &DailyRecord) -> Result<(), RemoteError> {
        let mut state = self.state.lock().await;
        state.calls.inserts += 1;
        state.take_write_fault()?;
        if state.records.contains_key(&record.date) {
            return Err(RemoteError::new(
                RemoteErrorKind::ConstraintViolation,
                "UNIQUE constraint failed: daily_tasks.date",
            ));
        }
        let mut stored = record.clone();
        stored.updated_at = Some(Utc::now());
        state.records.insert(record.date, stored);
        Ok(())
    }

    async fn update(&self, record: &DailyRecord) -> Result<(), RemoteError> {
        let mut state = self.state.lock().await;
        state.calls.updates += 1;
        state.take_write_fault()?;
        let Some(stored) = state.records.get_mut(&record.date) else {
            return Err(RemoteError::unknown(format!(
                "no daily record for {} to update",
                record.date
            )));
        };
        stored.tasks.clone_from(&record.tasks);
        stored.summary = record.summary.clone();
        stored.updated_at = Some(Utc::now());
        Ok(())
    }
}
