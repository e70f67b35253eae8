//! Database migration runner.
//!
//! Embeds the SQL migration files at compile time and executes them on
//! open. All statements use `IF NOT EXISTS` so re-running is harmless.

use crate::error::SyncError;
use crate::store::LibSqlStore;

/// `daily_tasks` table keyed by date.
const MIGRATION_001: &str = include_str!("../migrations/001_daily_tasks.sql");

impl LibSqlStore {
    /// Run all embedded migrations in sequence.
    pub(crate) async fn run_migrations(&self) -> Result<(), SyncError> {
        self.conn()
            .execute_batch(MIGRATION_001)
            .await
            .map_err(|e| SyncError::Migration(format!("001_daily_tasks: {e}")))?;
        Ok(())
    }
}
