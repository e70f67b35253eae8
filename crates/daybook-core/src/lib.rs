//! # daybook-core
//!
//! Entity model for daybook: tasks, subtasks, daily task sets, objectives
//! and planner preferences, together with the two pure engines that keep
//! them consistent:
//! - [`progress`] derives a task's progress and status from its subtasks
//! - [`summary`] rebuilds the statistics of a task collection
//!
//! Nothing here performs I/O. Persistence and reconciliation live in
//! `daybook-sync`.

pub mod date;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod payload;
pub mod planner;
pub mod progress;
pub mod summary;
pub mod validate;

pub use date::TaskDate;
pub use entities::{DailyTaskSet, DailyTaskSetRecord, Objective, Subtask, Task, TaskRecord};
pub use enums::{Category, Priority, TaskStatus, TimeBlock};
pub use errors::CoreError;
pub use payload::RawTaskPayload;
pub use planner::PlannerConfig;
pub use summary::Summary;
