//! Task patch builder.

use daybook_core::{Category, CoreError, Priority, Task, TaskStatus, TimeBlock};
use serde::{Deserialize, Serialize};

/// Changes to apply to one task. Only `Some` fields are touched.
///
/// Deserialization rejects unknown field names, so a patch read from user
/// input can only name fields listed here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_block: Option<Option<TimeBlock>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_criteria: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<String>>,
    /// Appended as a timestamped note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// ID of a subtask to mark completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complete_subtask: Option<String>,
}

impl TaskPatch {
    /// Read a patch from a JSON object of field changes.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` on field `fields` for unknown names or
    /// values of the wrong type.
    pub fn from_fields(
        fields: serde_json::Map<String, serde_json::Value>,
    ) -> Result<Self, CoreError> {
        serde_json::from_value(serde_json::Value::Object(fields))
            .map_err(|e| CoreError::validation("fields", e.to_string()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Apply every present field through the task's validating setters.
    ///
    /// Status is applied before progress so that an explicit progress on an
    /// in-progress task survives. Stops at the first invalid value; callers
    /// apply patches to a copy.
    ///
    /// # Errors
    ///
    /// Returns the setter's `CoreError`, or `CoreError::NotFound` for an
    /// unknown subtask.
    pub fn apply(&self, task: &mut Task) -> Result<(), CoreError> {
        if let Some(title) = &self.title {
            task.set_title(title.clone())?;
        }
        if let Some(description) = &self.description {
            task.set_description(description.clone())?;
        }
        if let Some(priority) = self.priority {
            task.set_priority(priority);
        }
        if let Some(category) = self.category {
            task.set_category(category);
        }
        if let Some(status) = self.status {
            task.set_status(status);
        }
        if let Some(progress) = self.progress {
            task.set_progress(progress)?;
        }
        if let Some(minutes) = self.estimated_minutes {
            task.set_estimated_minutes(minutes)?;
        }
        if let Some(minutes) = self.actual_minutes {
            task.set_actual_minutes(minutes);
        }
        if let Some(block) = self.time_block {
            task.set_time_block(block);
        }
        if let Some(criteria) = &self.success_criteria {
            task.set_success_criteria(criteria.clone())?;
        }
        if let Some(tags) = &self.tags {
            task.set_tags(tags.iter().cloned())?;
        }
        if let Some(dependencies) = &self.dependencies {
            task.set_dependencies(dependencies.iter().cloned())?;
        }
        if let Some(note) = &self.note {
            task.add_note(note)?;
        }
        if let Some(subtask_id) = &self.complete_subtask {
            if !task.complete_subtask(subtask_id) {
                return Err(CoreError::not_found("subtask", subtask_id.clone()));
            }
        }
        Ok(())
    }
}

pub struct TaskPatchBuilder(TaskPatch);

impl TaskPatchBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(TaskPatch::default())
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.0.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.0.description = Some(description.into());
        self
    }

    #[must_use]
    pub const fn priority(mut self, priority: Priority) -> Self {
        self.0.priority = Some(priority);
        self
    }

    #[must_use]
    pub const fn status(mut self, status: TaskStatus) -> Self {
        self.0.status = Some(status);
        self
    }

    #[must_use]
    pub const fn progress(mut self, progress: u8) -> Self {
        self.0.progress = Some(progress);
        self
    }

    #[must_use]
    pub const fn category(mut self, category: Category) -> Self {
        self.0.category = Some(category);
        self
    }

    #[must_use]
    pub const fn estimated_minutes(mut self, minutes: u32) -> Self {
        self.0.estimated_minutes = Some(minutes);
        self
    }

    #[must_use]
    pub const fn actual_minutes(mut self, minutes: u32) -> Self {
        self.0.actual_minutes = Some(minutes);
        self
    }

    #[must_use]
    pub const fn time_block(mut self, block: Option<TimeBlock>) -> Self {
        self.0.time_block = Some(block);
        self
    }

    #[must_use]
    pub fn success_criteria(mut self, criteria: Option<String>) -> Self {
        self.0.success_criteria = Some(criteria);
        self
    }

    #[must_use]
    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.0.tags = Some(tags);
        self
    }

    #[must_use]
    pub fn dependencies(mut self, dependencies: Vec<String>) -> Self {
        self.0.dependencies = Some(dependencies);
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.0.note = Some(note.into());
        self
    }

    #[must_use]
    pub fn complete_subtask(mut self, subtask_id: impl Into<String>) -> Self {
        self.0.complete_subtask = Some(subtask_id.into());
        self
    }

    #[must_use]
    pub fn build(self) -> TaskPatch {
        self.0
    }
}

impl Default for TaskPatchBuilder {
    fn default() -> Self {
        Self::new()
    }
}
