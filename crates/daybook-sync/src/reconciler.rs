//! Remote reconciliation.
//!
//! The [`Reconciler`] keeps the local cache and the remote store eventually
//! consistent for each date. Writes always replace the whole task list for a
//! date; nothing is merged.
//!
//! Push protocol:
//! 1. build the set and recompute its summary
//! 2. save the local snapshot (best-effort)
//! 3. look the date up remotely, then update if present or insert if absent
//! 4. an insert that loses a race to another writer is retried once as an update
//!
//! Every remote call is bounded by the configured timeout; a timeout counts
//! as a connection failure. Reads fall back to the local snapshot whenever
//! the remote store fails.

use std::future::Future;
use std::time::Duration;

use daybook_core::{CoreError, DailyTaskSet, Task, TaskDate};
use tracing::{debug, info, warn};

use crate::cache::LocalCache;
use crate::outcome::{ConnectionCheck, DataSource, SyncFailure, SyncResult, WriteAction};
use crate::remote::{DailyRecord, RemoteError, RemoteStore};
use crate::subscriptions::{Subscription, SubscriptionRegistry};
use crate::updates::TaskPatch;

pub struct Reconciler<S> {
    store: S,
    cache: LocalCache,
    timeout: Duration,
    subscriptions: SubscriptionRegistry,
}

impl<S: RemoteStore> Reconciler<S> {
    pub fn new(store: S, cache: LocalCache, timeout: Duration) -> Self {
        Self {
            store,
            cache,
            timeout,
            subscriptions: SubscriptionRegistry::new(),
        }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn cache(&self) -> &LocalCache {
        &self.cache
    }

    pub const fn subscriptions(&self) -> &SubscriptionRegistry {
        &self.subscriptions
    }

    // -- writes -------------------------------------------------------------

    /// Validate `tasks` into a set for `date` and push it.
    pub async fn push(&self, tasks: Vec<Task>, date: TaskDate) -> SyncResult {
        match DailyTaskSet::from_tasks(date, tasks) {
            Ok(set) => self.push_set(set).await,
            Err(e) => SyncResult::failed(
                format!("Rejected tasks for {date}"),
                SyncFailure::from(&e),
                Vec::new(),
            ),
        }
    }

    /// Save `set` locally and write it to the remote store.
    pub async fn push_set(&self, set: DailyTaskSet) -> SyncResult {
        let date = set.date();
        let mut warnings = Vec::new();
        self.save_snapshot(&set, &mut warnings);
        let record = DailyRecord::from_set(&set);

        let exists = match self.call("lookup", date, self.store.fetch(date)).await {
            Ok(existing) => existing.is_some(),
            Err(e) => {
                warn!(%date, error = %e, "remote lookup failed, push aborted");
                return SyncResult::failed(
                    format!("Saved {date} locally, but the remote lookup failed"),
                    SyncFailure::from(&e),
                    warnings,
                );
            }
        };

        let written = if exists {
            debug!(%date, "remote record exists, updating");
            self.call("update", date, self.store.update(&record))
                .await
                .map(|()| WriteAction::Updated)
        } else {
            debug!(%date, "no remote record, inserting");
            match self.call("insert", date, self.store.insert(&record)).await {
                Ok(()) => Ok(WriteAction::Inserted),
                Err(e) if e.is_conflict() => {
                    warn!(%date, "insert lost a race with another writer, retrying as update");
                    self.call("update", date, self.store.update(&record))
                        .await
                        .map(|()| WriteAction::UpdatedAfterConflict)
                }
                Err(e) => Err(e),
            }
        };

        match written {
            Ok(action) => {
                info!(%date, tasks = set.len(), ?action, "pushed daily tasks");
                SyncResult::Data {
                    message: format!(
                        "Successfully {} {} tasks for {date}",
                        action.verb(),
                        set.len()
                    ),
                    set,
                    source: DataSource::Remote,
                    degraded: false,
                    action: Some(action),
                    warnings,
                }
            }
            Err(e) => {
                warn!(%date, error = %e, "remote write failed");
                SyncResult::failed(
                    format!("Failed to sync tasks for {date}"),
                    SyncFailure::from(&e),
                    warnings,
                )
            }
        }
    }

    /// Pull the current set, apply `patch` to one task, and push the result.
    ///
    /// The patch runs against a copy; if it fails nothing is written.
    pub async fn update_task(
        &self,
        task_id: &str,
        patch: &TaskPatch,
        date: TaskDate,
    ) -> SyncResult {
        let current = self.pull(date, false).await;
        let warnings = current.warnings().to_vec();
        let Some(mut set) = current.into_set() else {
            return SyncResult::failed(
                format!("No tasks found for {date}"),
                SyncFailure::from(&CoreError::not_found("task", task_id)),
                warnings,
            );
        };

        if let Err(e) = set.update_task(task_id, |task| patch.apply(task)) {
            return SyncResult::failed(
                format!("Could not update task {task_id}"),
                SyncFailure::from(&e),
                warnings,
            );
        }
        debug!(%date, task_id, "patched task, pushing set");
        self.push_set(set).await.with_leading_warnings(warnings)
    }

    // -- reads --------------------------------------------------------------

    /// Fetch the set for `date`.
    ///
    /// With `prefer_cache`, a local snapshot is returned without a remote call.
    /// Otherwise the remote record wins and refreshes the snapshot; if the
    /// remote has nothing or fails, the snapshot is served instead.
    pub async fn pull(&self, date: TaskDate, prefer_cache: bool) -> SyncResult {
        if prefer_cache {
            if let Some(set) = self.cache.load(date) {
                debug!(%date, "serving local snapshot");
                return SyncResult::Data {
                    message: format!("Loaded {} tasks for {date} from local cache", set.len()),
                    set,
                    source: DataSource::Cache,
                    degraded: false,
                    action: None,
                    warnings: Vec::new(),
                };
            }
        }

        let remote_failure = match self.call("fetch", date, self.store.fetch(date)).await {
            Ok(Some(record)) => match record.into_set() {
                Ok(set) => {
                    let mut warnings = Vec::new();
                    self.save_snapshot(&set, &mut warnings);
                    info!(%date, tasks = set.len(), "pulled daily tasks");
                    return SyncResult::Data {
                        message: format!("Pulled {} tasks for {date}", set.len()),
                        set,
                        source: DataSource::Remote,
                        degraded: false,
                        action: None,
                        warnings,
                    };
                }
                Err(e) => {
                    warn!(%date, error = %e, "remote record failed validation");
                    Some(format!("remote record for {date} is invalid: {e}"))
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(%date, error = %e, "remote fetch failed, falling back to local snapshot");
                Some(e.to_string())
            }
        };
        self.fallback(date, remote_failure)
    }

    /// Sets for the `days` dates ending at `today`, newest first. Cached
    /// snapshots are preferred and dates without data are skipped.
    pub async fn history(&self, days: u32, today: TaskDate) -> Vec<DailyTaskSet> {
        let mut sets = Vec::new();
        for offset in 0..u64::from(days) {
            let Some(date) = today.days_before(offset) else {
                break;
            };
            if let Some(set) = self.pull(date, true).await.into_set() {
                sets.push(set);
            }
        }
        sets
    }

    /// Probe the remote store with a point lookup.
    pub async fn check_connection(&self) -> ConnectionCheck {
        let today = TaskDate::today();
        match self.call("probe", today, self.store.fetch(today)).await {
            Ok(_) => ConnectionCheck {
                ok: true,
                message: "Remote store connection successful".into(),
                failure: None,
            },
            Err(e) => ConnectionCheck {
                ok: false,
                message: "Remote store connection failed".into(),
                failure: Some(SyncFailure::from(&e)),
            },
        }
    }

    // -- change notification --------------------------------------------------

    /// Start watching `date` for remote changes.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Other` if an ID cannot be generated.
    pub fn subscribe(&mut self, date: TaskDate) -> Result<Subscription, CoreError> {
        let subscription = self.subscriptions.register(date)?;
        debug!(id = %subscription.id, %date, "subscribed");
        Ok(subscription)
    }

    pub fn unsubscribe(&mut self, id: &str) -> bool {
        self.subscriptions.unregister(id)
    }

    pub fn clear_subscriptions(&mut self) -> usize {
        self.subscriptions.clear()
    }

    /// Handle a change notification for one remote record.
    ///
    /// The record is validated first. If its date is watched, the local
    /// snapshot is refreshed exactly as a pull would and the set is returned;
    /// otherwise this is a no-op returning `None`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError` if the record fails validation.
    pub fn apply_remote_change(
        &self,
        record: DailyRecord,
    ) -> Result<Option<DailyTaskSet>, CoreError> {
        let set = record.into_set()?;
        if !self.subscriptions.is_watching(set.date()) {
            debug!(date = %set.date(), "change for unwatched date ignored");
            return Ok(None);
        }
        let mut warnings = Vec::new();
        self.save_snapshot(&set, &mut warnings);
        info!(date = %set.date(), tasks = set.len(), "applied remote change");
        Ok(Some(set))
    }

    // -- internals ------------------------------------------------------------

    async fn call<T, F>(&self, op: &str, date: TaskDate, fut: F) -> Result<T, RemoteError>
    where
        F: Future<Output = Result<T, RemoteError>>,
    {
        tokio::time::timeout(self.timeout, fut)
            .await
            .unwrap_or_else(|_| {
                Err(RemoteError::connection(format!(
                    "{op} for {date} timed out after {:?}",
                    self.timeout
                )))
            })
    }

    fn save_snapshot(&self, set: &DailyTaskSet, warnings: &mut Vec<String>) {
        if let Err(e) = self.cache.save(set) {
            warnings.push(format!("local snapshot not saved: {e}"));
        }
    }

    fn fallback(&self, date: TaskDate, remote_failure: Option<String>) -> SyncResult {
        let degraded = remote_failure.is_some();
        let warnings: Vec<String> = remote_failure.into_iter().collect();
        match self.cache.load(date) {
            Some(set) => SyncResult::Data {
                message: if degraded {
                    format!(
                        "Remote store unavailable; serving {} cached tasks for {date}",
                        set.len()
                    )
                } else {
                    format!("No remote record for {date}; serving local snapshot")
                },
                set,
                source: DataSource::Cache,
                degraded,
                action: None,
                warnings,
            },
            None => SyncResult::Empty {
                message: format!("No tasks found for {date}"),
                date,
                degraded,
                warnings,
            },
        }
    }
}
