//! Subtask-driven progress.
//!
//! When a subtask is completed the parent task's progress is re-derived from
//! its checklist:
//!
//! | Subtasks done | Parent before   | Parent after                         |
//! |---------------|-----------------|--------------------------------------|
//! | all           | any open status | `completed`, 100%                    |
//! | some          | `not_started`   | `in_progress`, floor(100 * done / n) |
//! | some          | other open      | same status, floor(100 * done / n)   |
//! | any           | `completed`     | unchanged                            |

use crate::entities::Task;
use crate::enums::TaskStatus;

/// What [`apply_subtask_progress`] did to a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressChange {
    /// No subtasks, or the task was already completed.
    Untouched,
    /// Progress moved (or was re-asserted) without completing the task.
    Advanced { from: u8, to: u8 },
    /// Every subtask is done; the task was completed.
    Completed { from: u8 },
}

/// Percentage of `done` out of `total`, rounded down. Zero when `total` is zero.
#[must_use]
pub fn subtask_progress(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let percent = done.min(total) * 100 / total;
    u8::try_from(percent).unwrap_or(u8::MAX)
}

/// Re-derive `task`'s progress and status from its subtasks.
pub fn apply_subtask_progress(task: &mut Task) -> ProgressChange {
    let total = task.inner.subtasks.len();
    if total == 0 || task.inner.status == TaskStatus::Completed {
        return ProgressChange::Untouched;
    }

    let done = task.completed_subtasks();
    let from = task.inner.progress;
    if done == total {
        task.mark_completed();
        return ProgressChange::Completed { from };
    }

    let to = subtask_progress(done, total);
    if done > 0 && task.inner.status == TaskStatus::NotStarted {
        task.inner.status = TaskStatus::InProgress;
    }
    if task.inner.status != TaskStatus::NotStarted {
        task.inner.progress = to;
    }
    task.touch();
    ProgressChange::Advanced { from, to }
}
