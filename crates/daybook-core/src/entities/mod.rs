//! Validated entities.
//!
//! [`Task`] and [`DailyTaskSet`] keep their fields private and are only
//! reachable through checked constructors and setters. Their `*Record`
//! counterparts are the unchecked wire shapes used for storage and schemas.

mod daily;
mod objective;
mod subtask;
mod task;

pub use daily::{DailyTaskSet, DailyTaskSetRecord};
pub use objective::Objective;
pub use subtask::Subtask;
pub use task::{Task, TaskRecord};
