//! Derived statistics over a task collection.
//!
//! A [`Summary`] is never edited in place. It is rebuilt from scratch with
//! [`Summary::from_tasks`] whenever the owning collection changes, so it
//! cannot drift from the tasks it describes.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::Task;
use crate::enums::TaskStatus;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Summary {
    pub total_tasks: u32,
    pub completed_tasks: u32,
    pub in_progress_tasks: u32,
    pub blocked_tasks: u32,
    #[serde(default)]
    pub not_started_tasks: u32,
    #[serde(default)]
    pub cancelled_tasks: u32,
    pub total_estimated_minutes: u64,
    pub total_actual_minutes: u64,
    /// Percentage of completed tasks, rounded half-up to one decimal.
    pub completion_percentage: f64,
    /// Task count per category; categories with no tasks are omitted.
    #[serde(default)]
    pub categories: BTreeMap<String, u32>,
    /// Task count per priority; priorities with no tasks are omitted.
    #[serde(default)]
    pub priorities: BTreeMap<String, u32>,
}

impl Summary {
    #[must_use]
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let mut summary = Self::default();
        for task in tasks {
            summary.total_tasks += 1;
            match task.status() {
                TaskStatus::Completed => summary.completed_tasks += 1,
                TaskStatus::InProgress => summary.in_progress_tasks += 1,
                TaskStatus::Blocked => summary.blocked_tasks += 1,
                TaskStatus::NotStarted => summary.not_started_tasks += 1,
                TaskStatus::Cancelled => summary.cancelled_tasks += 1,
            }
            summary.total_estimated_minutes += u64::from(task.estimated_minutes());
            summary.total_actual_minutes += u64::from(task.actual_minutes());
            *summary
                .categories
                .entry(task.category().as_str().to_string())
                .or_default() += 1;
            *summary
                .priorities
                .entry(task.priority().as_str().to_string())
                .or_default() += 1;
        }
        summary.completion_percentage =
            completion_percentage(summary.completed_tasks, summary.total_tasks);
        summary
    }

    /// Tasks that are neither completed, in progress, nor blocked.
    #[must_use]
    pub const fn other_tasks(&self) -> u32 {
        self.not_started_tasks + self.cancelled_tasks
    }
}

/// `100 * completed / total`, rounded half-up to one decimal place.
///
/// Computed in tenths of a percent with integer arithmetic so equal inputs
/// always give bit-identical output. Zero when `total` is zero.
#[must_use]
pub fn completion_percentage(completed: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let completed = u64::from(completed.min(total));
    let total = u64::from(total);
    let tenths = (2000 * completed + total) / (2 * total);
    #[allow(clippy::cast_precision_loss)]
    let tenths = tenths as f64;
    tenths / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{Category, Priority};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn task(priority: Priority, category: Category, estimate: u32) -> Task {
        let mut task = Task::new(format!("{priority} {category}")).unwrap();
        task.set_priority(priority);
        task.set_category(category);
        task.set_estimated_minutes(estimate).unwrap();
        task
    }

    fn three_tasks() -> Vec<Task> {
        vec![
            task(Priority::P1, Category::Development, 120),
            task(Priority::P2, Category::Admin, 60),
            task(Priority::P3, Category::Planning, 45),
        ]
    }

    #[test]
    fn empty_collection_gives_zeroed_summary() {
        assert_eq!(Summary::from_tasks(&[]), Summary::default());
        assert!(Summary::default().categories.is_empty());
    }

    #[test]
    fn three_open_tasks() {
        let summary = Summary::from_tasks(&three_tasks());
        assert_eq!(summary.total_tasks, 3);
        assert_eq!(summary.completed_tasks, 0);
        assert_eq!(summary.not_started_tasks, 3);
        assert_eq!(summary.total_estimated_minutes, 225);
        assert!(summary.completion_percentage.abs() < f64::EPSILON);
        assert_eq!(
            summary.categories,
            BTreeMap::from([
                ("admin".to_string(), 1),
                ("development".to_string(), 1),
                ("planning".to_string(), 1),
            ])
        );
        assert_eq!(
            summary.priorities,
            BTreeMap::from([
                ("P1".to_string(), 1),
                ("P2".to_string(), 1),
                ("P3".to_string(), 1),
            ])
        );
    }

    #[test]
    fn completing_one_of_three_gives_33_3() {
        let mut tasks = three_tasks();
        tasks[0].mark_completed();
        let summary = Summary::from_tasks(&tasks);
        assert_eq!(summary.completed_tasks, 1);
        assert!((summary.completion_percentage - 33.3).abs() < 1e-9);
    }

    #[test]
    fn status_counts_partition_total() {
        let mut tasks = three_tasks();
        tasks.push(task(Priority::P2, Category::Design, 30));
        tasks.push(task(Priority::P2, Category::Design, 30));
        tasks[0].mark_completed();
        tasks[1].set_status(TaskStatus::InProgress);
        tasks[2].set_status(TaskStatus::Blocked);
        tasks[3].set_status(TaskStatus::Cancelled);

        let summary = Summary::from_tasks(&tasks);
        assert_eq!(
            summary.completed_tasks
                + summary.in_progress_tasks
                + summary.blocked_tasks
                + summary.other_tasks(),
            summary.total_tasks
        );
        assert_eq!(summary.cancelled_tasks, 1);
        assert_eq!(summary.not_started_tasks, 1);
        assert_eq!(summary.categories.get("design"), Some(&2));
        assert_eq!(summary.categories.get("learning"), None);
    }

    #[test]
    fn recompute_is_byte_identical() {
        let tasks = three_tasks();
        let first = serde_json::to_string(&Summary::from_tasks(&tasks)).unwrap();
        let second = serde_json::to_string(&Summary::from_tasks(&tasks)).unwrap();
        assert_eq!(first, second);
    }

    #[rstest]
    #[case(0, 0, 0.0)]
    #[case(0, 3, 0.0)]
    #[case(1, 3, 33.3)]
    #[case(2, 3, 66.7)]
    #[case(3, 3, 100.0)]
    #[case(1, 8, 12.5)]
    #[case(1, 16, 6.3)]
    #[case(1, 6, 16.7)]
    fn completion_percentage_rounds_half_up(
        #[case] completed: u32,
        #[case] total: u32,
        #[case] expected: f64,
    ) {
        assert!((completion_percentage(completed, total) - expected).abs() < 1e-9);
    }
}
