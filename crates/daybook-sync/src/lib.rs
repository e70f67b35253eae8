//! # daybook-sync
//!
//! Keeps each day's task set consistent between the local JSON cache and the
//! remote libSQL store.
//!
//! - [`LocalCache`] holds one snapshot file per date, written atomically.
//! - [`RemoteStore`] is the seam to the remote database; [`LibSqlStore`]
//!   talks to libSQL/Turso and [`MemoryStore`] is an in-process stand-in
//!   with fault injection.
//! - [`Reconciler`] implements push, pull, task updates, history, and
//!   change subscriptions on top of both, answering every call with a
//!   [`SyncResult`].

pub mod cache;
pub mod error;
pub mod helpers;
pub mod memory;
mod migrations;
pub mod outcome;
pub mod reconciler;
pub mod remote;
pub mod store;
pub mod subscriptions;
pub mod updates;

pub use cache::LocalCache;
pub use error::{CacheError, SyncError};
pub use memory::MemoryStore;
pub use outcome::{
    ConnectionCheck, DataSource, ErrorReason, Remediation, SyncFailure, SyncResult, WriteAction,
};
pub use reconciler::Reconciler;
pub use remote::{DailyRecord, RemoteError, RemoteErrorKind, RemoteStore, UnreachableStore};
pub use store::LibSqlStore;
pub use subscriptions::{Subscription, SubscriptionRegistry};
pub use updates::{TaskPatch, TaskPatchBuilder};
