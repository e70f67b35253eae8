use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Task;
use crate::date::TaskDate;
use crate::enums::{Priority, TaskStatus, TimeBlock};
use crate::errors::CoreError;
use crate::summary::Summary;

/// Wire shape of a daily task set. The `summary` is accepted for
/// compatibility but never trusted; it is recomputed on conversion.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DailyTaskSetRecord {
    pub date: TaskDate,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub summary: Summary,
}

/// All tasks for one calendar date plus their derived [`Summary`].
///
/// Task IDs are unique within a set. Every structural change recomputes the
/// summary from scratch; a change that fails leaves the set untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DailyTaskSetRecord")]
pub struct DailyTaskSet {
    date: TaskDate,
    tasks: Vec<Task>,
    summary: Summary,
}

impl DailyTaskSet {
    #[must_use]
    pub fn new(date: TaskDate) -> Self {
        Self {
            date,
            tasks: Vec::new(),
            summary: Summary::default(),
        }
    }

    /// Build a set from an ordered task collection.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Duplicate` if two tasks share an ID.
    pub fn from_tasks(date: TaskDate, tasks: Vec<Task>) -> Result<Self, CoreError> {
        let mut seen = HashSet::with_capacity(tasks.len());
        for task in &tasks {
            if !seen.insert(task.id()) {
                return Err(duplicate(task.id()));
            }
        }
        let summary = Summary::from_tasks(&tasks);
        Ok(Self {
            date,
            tasks,
            summary,
        })
    }

    #[must_use]
    pub const fn date(&self) -> TaskDate {
        self.date
    }

    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    #[must_use]
    pub const fn summary(&self) -> &Summary {
        &self.summary
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    #[must_use]
    pub fn get_task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    /// # Errors
    ///
    /// Returns `CoreError::Duplicate` if a task with the same ID is present.
    pub fn add_task(&mut self, task: Task) -> Result<(), CoreError> {
        if self.get_task(task.id()).is_some() {
            return Err(duplicate(task.id()));
        }
        self.tasks.push(task);
        self.recompute();
        Ok(())
    }

    /// Remove the task with `id`. Returns `false` if it was not present.
    pub fn remove_task(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id() != id);
        let removed = self.tasks.len() != before;
        if removed {
            self.recompute();
        }
        removed
    }

    /// Apply `f` to the task with `id`, then recompute the summary.
    ///
    /// `f` runs against a copy; if it fails the set keeps the original task.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` for an unknown ID, or whatever `f` returns.
    pub fn update_task<F>(&mut self, id: &str, f: F) -> Result<&Task, CoreError>
    where
        F: FnOnce(&mut Task) -> Result<(), CoreError>,
    {
        let index = self
            .tasks
            .iter()
            .position(|task| task.id() == id)
            .ok_or_else(|| CoreError::not_found("task", id))?;

        let mut updated = self.tasks[index].clone();
        f(&mut updated)?;
        if updated.id() != id {
            return Err(CoreError::validation("id", "task id cannot change"));
        }
        updated.touch();
        self.tasks[index] = updated;
        self.recompute();
        Ok(&self.tasks[index])
    }

    pub fn tasks_by_priority(&self, priority: Priority) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(move |task| task.priority() == priority)
    }

    pub fn tasks_by_status(&self, status: TaskStatus) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(move |task| task.status() == status)
    }

    pub fn tasks_by_time_block(&self, block: TimeBlock) -> impl Iterator<Item = &Task> {
        self.tasks
            .iter()
            .filter(move |task| task.time_block() == Some(block))
    }

    fn recompute(&mut self) {
        self.summary = Summary::from_tasks(&self.tasks);
    }
}

fn duplicate(id: &str) -> CoreError {
    CoreError::Duplicate {
        entity_type: "task".into(),
        id: id.to_string(),
    }
}

impl TryFrom<DailyTaskSetRecord> for DailyTaskSet {
    type Error = CoreError;

    fn try_from(record: DailyTaskSetRecord) -> Result<Self, Self::Error> {
        Self::from_tasks(record.date, record.tasks)
    }
}

impl JsonSchema for DailyTaskSet {
    fn schema_name() -> std::borrow::Cow<'static, str> {
        DailyTaskSetRecord::schema_name()
    }

    fn json_schema(generator: &mut schemars::SchemaGenerator) -> schemars::Schema {
        DailyTaskSetRecord::json_schema(generator)
    }
}
