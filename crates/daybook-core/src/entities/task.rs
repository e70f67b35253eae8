use std::borrow::Cow;
use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, Utc};
use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::{Deserialize, Serialize};

use super::Subtask;
use crate::enums::{Category, Priority, TaskStatus, TimeBlock};
use crate::errors::CoreError;
use crate::ids::{PREFIX_TASK, generate_id};
use crate::progress;
use crate::validate;

const fn default_estimate() -> u32 {
    30
}

/// Wire shape of a task, as stored in cache files and remote records.
///
/// A `TaskRecord` is unchecked. Convert it into a [`Task`] to validate it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TaskRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub category: Category,
    #[serde(default = "default_estimate")]
    pub estimated_minutes: u32,
    #[serde(default)]
    pub actual_minutes: u32,
    #[serde(default)]
    pub time_block: Option<TimeBlock>,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    /// Timestamp-prefixed notes, oldest first.
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub success_criteria: Option<String>,
    /// IDs of tasks that block this one.
    #[serde(default)]
    pub dependencies: BTreeSet<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

/// A validated unit of work for one day.
///
/// Every constructor and setter checks field constraints and returns
/// `CoreError::Validation` on violation. Two couplings are normalized instead
/// of rejected:
///
/// - `status == completed` forces `progress = 100` and sets `completed_at`;
/// - `status == not_started` forces `progress = 0`.
///
/// `completed_at` is present exactly when the task is completed, and every
/// mutation refreshes `updated_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskRecord", into = "TaskRecord")]
pub struct Task {
    pub(crate) inner: TaskRecord,
}

impl Task {
    /// Create a task with default metadata: P2, `not_started`, admin, 30 minutes.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for a blank or overlong title.
    pub fn new(title: impl Into<String>) -> Result<Self, CoreError> {
        let now = Utc::now();
        let record = TaskRecord {
            id: generate_id(PREFIX_TASK)?,
            title: title.into(),
            description: String::new(),
            priority: Priority::default(),
            status: TaskStatus::default(),
            progress: 0,
            category: Category::default(),
            estimated_minutes: default_estimate(),
            actual_minutes: 0,
            time_block: None,
            subtasks: Vec::new(),
            notes: Vec::new(),
            success_criteria: None,
            dependencies: BTreeSet::new(),
            tags: BTreeSet::new(),
            created_at: now,
            updated_at: now,
            completed_at: None,
        };
        Self::try_from(record)
    }

    // -- accessors ----------------------------------------------------------

    #[must_use]
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.inner.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.inner.description
    }

    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.inner.priority
    }

    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.inner.status
    }

    #[must_use]
    pub const fn progress(&self) -> u8 {
        self.inner.progress
    }

    #[must_use]
    pub const fn category(&self) -> Category {
        self.inner.category
    }

    #[must_use]
    pub const fn estimated_minutes(&self) -> u32 {
        self.inner.estimated_minutes
    }

    #[must_use]
    pub const fn actual_minutes(&self) -> u32 {
        self.inner.actual_minutes
    }

    #[must_use]
    pub const fn time_block(&self) -> Option<TimeBlock> {
        self.inner.time_block
    }

    #[must_use]
    pub fn subtasks(&self) -> &[Subtask] {
        &self.inner.subtasks
    }

    #[must_use]
    pub fn notes(&self) -> &[String] {
        &self.inner.notes
    }

    #[must_use]
    pub fn success_criteria(&self) -> Option<&str> {
        self.inner.success_criteria.as_deref()
    }

    #[must_use]
    pub const fn dependencies(&self) -> &BTreeSet<String> {
        &self.inner.dependencies
    }

    #[must_use]
    pub const fn tags(&self) -> &BTreeSet<String> {
        &self.inner.tags
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.inner.created_at
    }

    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.inner.updated_at
    }

    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.inner.completed_at
    }

    /// Borrow the wire representation.
    #[must_use]
    pub const fn as_record(&self) -> &TaskRecord {
        &self.inner
    }

    // -- setters ------------------------------------------------------------

    /// # Errors
    ///
    /// Returns `CoreError::Validation` for a blank or overlong title.
    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), CoreError> {
        let title = title.into();
        validate::title("title", &title, validate::TITLE_MAX)?;
        self.inner.title = title;
        self.touch();
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `CoreError::Validation` above 1000 characters.
    pub fn set_description(&mut self, description: impl Into<String>) -> Result<(), CoreError> {
        let description = description.into();
        validate::char_len("description", &description, 0, validate::DESCRIPTION_MAX)?;
        self.inner.description = description;
        self.touch();
        Ok(())
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.inner.priority = priority;
        self.touch();
    }

    pub fn set_category(&mut self, category: Category) {
        self.inner.category = category;
        self.touch();
    }

    /// Move the task to `status`, normalizing progress and `completed_at`.
    ///
    /// Re-asserting `completed` keeps the original completion time.
    pub fn set_status(&mut self, status: TaskStatus) {
        let now = Utc::now();
        match status {
            TaskStatus::Completed => {
                self.inner.progress = validate::PROGRESS_MAX;
                if self.inner.status != TaskStatus::Completed || self.inner.completed_at.is_none() {
                    self.inner.completed_at = Some(now);
                }
            }
            TaskStatus::NotStarted => {
                self.inner.progress = 0;
                self.inner.completed_at = None;
            }
            TaskStatus::InProgress | TaskStatus::Blocked | TaskStatus::Cancelled => {
                self.inner.completed_at = None;
            }
        }
        self.inner.status = status;
        self.inner.updated_at = now;
    }

    /// Set progress in percent. Values above 100 are rejected; the
    /// status coupling then overrides the value for `completed` and
    /// `not_started` tasks.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` above 100.
    pub fn set_progress(&mut self, progress: u8) -> Result<(), CoreError> {
        validate::in_range("progress", progress, 0, validate::PROGRESS_MAX)?;
        self.inner.progress = progress;
        self.normalize_progress();
        self.touch();
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `CoreError::Validation` outside 5..=480 minutes.
    pub fn set_estimated_minutes(&mut self, minutes: u32) -> Result<(), CoreError> {
        validate::estimate("estimated_minutes", minutes)?;
        self.inner.estimated_minutes = minutes;
        self.touch();
        Ok(())
    }

    pub fn set_actual_minutes(&mut self, minutes: u32) {
        self.inner.actual_minutes = minutes;
        self.touch();
    }

    pub fn set_time_block(&mut self, time_block: Option<TimeBlock>) {
        self.inner.time_block = time_block;
        self.touch();
    }

    /// # Errors
    ///
    /// Returns `CoreError::Validation` for blank or overlong criteria.
    pub fn set_success_criteria(&mut self, criteria: Option<String>) -> Result<(), CoreError> {
        if let Some(text) = &criteria {
            validate::title("success_criteria", text, validate::DESCRIPTION_MAX)?;
        }
        self.inner.success_criteria = criteria;
        self.touch();
        Ok(())
    }

    /// Replace the tag set.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if any tag is blank.
    pub fn set_tags<I, S>(&mut self, tags: I) -> Result<(), CoreError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tags = tags.into_iter().map(Into::into).collect::<BTreeSet<String>>();
        validate_tags(&tags)?;
        self.inner.tags = tags;
        self.touch();
        Ok(())
    }

    /// Add a tag. Returns `false` if it was already present.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for a blank tag.
    pub fn add_tag(&mut self, tag: impl Into<String>) -> Result<bool, CoreError> {
        let tag = tag.into();
        if tag.trim().is_empty() {
            return Err(CoreError::validation("tags", "tags must not be blank"));
        }
        let inserted = self.inner.tags.insert(tag);
        self.touch();
        Ok(inserted)
    }

    /// Replace the dependency set.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for blank IDs or a self-dependency.
    pub fn set_dependencies<I, S>(&mut self, dependencies: I) -> Result<(), CoreError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let dependencies = dependencies
            .into_iter()
            .map(Into::into)
            .collect::<BTreeSet<String>>();
        validate_dependencies(&self.inner.id, &dependencies)?;
        self.inner.dependencies = dependencies;
        self.touch();
        Ok(())
    }

    /// Record that this task is blocked by `task_id`. Returns `false` if the
    /// dependency was already recorded.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for a blank ID or a self-dependency.
    pub fn add_dependency(&mut self, task_id: impl Into<String>) -> Result<bool, CoreError> {
        let task_id = task_id.into();
        validate_dependencies(&self.inner.id, std::iter::once(&task_id))?;
        let inserted = self.inner.dependencies.insert(task_id);
        self.touch();
        Ok(inserted)
    }

    // -- operations ---------------------------------------------------------

    /// Append a note prefixed with the current UTC time, e.g. `[14:05] called Bob`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for blank or overlong text.
    pub fn add_note(&mut self, text: &str) -> Result<(), CoreError> {
        validate::title("note", text, validate::DESCRIPTION_MAX)?;
        let now = Utc::now();
        self.inner.notes.push(format!("[{}] {text}", now.format("%H:%M")));
        self.inner.updated_at = now;
        Ok(())
    }

    /// Force the task to completed with a fresh completion time.
    pub fn mark_completed(&mut self) {
        let now = Utc::now();
        self.inner.status = TaskStatus::Completed;
        self.inner.progress = validate::PROGRESS_MAX;
        self.inner.completed_at = Some(now);
        self.inner.updated_at = now;
    }

    /// Append an open subtask and return its ID.
    ///
    /// A completed task stays completed at 100% when subtasks are added
    /// afterwards.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for a blank or overlong title.
    pub fn add_subtask(&mut self, title: impl Into<String>) -> Result<String, CoreError> {
        let subtask = Subtask::new(title)?;
        let id = subtask.id.clone();
        self.inner.subtasks.push(subtask);
        self.touch();
        Ok(id)
    }

    /// Mark the subtask `subtask_id` completed and re-derive progress.
    ///
    /// Returns `false` if no subtask has that ID.
    pub fn complete_subtask(&mut self, subtask_id: &str) -> bool {
        let Some(subtask) = self
            .inner
            .subtasks
            .iter_mut()
            .find(|subtask| subtask.id == subtask_id)
        else {
            return false;
        };
        subtask.completed = true;
        self.touch();
        progress::apply_subtask_progress(self);
        true
    }

    /// Number of completed subtasks.
    #[must_use]
    pub fn completed_subtasks(&self) -> usize {
        self.inner.subtasks.iter().filter(|s| s.completed).count()
    }

    /// Refresh `updated_at` without changing anything else.
    pub fn touch(&mut self) {
        self.inner.updated_at = Utc::now();
    }

    fn normalize_progress(&mut self) {
        match self.inner.status {
            TaskStatus::Completed => self.inner.progress = validate::PROGRESS_MAX,
            TaskStatus::NotStarted => self.inner.progress = 0,
            TaskStatus::InProgress | TaskStatus::Blocked | TaskStatus::Cancelled => {}
        }
    }
}

fn validate_tags(tags: &BTreeSet<String>) -> Result<(), CoreError> {
    if tags.iter().any(|tag| tag.trim().is_empty()) {
        return Err(CoreError::validation("tags", "tags must not be blank"));
    }
    Ok(())
}

fn validate_dependencies<'a>(
    own_id: &str,
    dependencies: impl IntoIterator<Item = &'a String>,
) -> Result<(), CoreError> {
    for dependency in dependencies {
        if dependency.trim().is_empty() {
            return Err(CoreError::validation(
                "dependencies",
                "dependency ids must not be blank",
            ));
        }
        if dependency == own_id {
            return Err(CoreError::validation(
                "dependencies",
                format!("task {own_id} cannot depend on itself"),
            ));
        }
    }
    Ok(())
}

impl TryFrom<TaskRecord> for Task {
    type Error = CoreError;

    fn try_from(mut record: TaskRecord) -> Result<Self, Self::Error> {
        if record.id.trim().is_empty() {
            return Err(CoreError::validation("id", "must not be empty"));
        }
        validate::title("title", &record.title, validate::TITLE_MAX)?;
        validate::char_len("description", &record.description, 0, validate::DESCRIPTION_MAX)?;
        validate::in_range("progress", record.progress, 0, validate::PROGRESS_MAX)?;
        validate::estimate("estimated_minutes", record.estimated_minutes)?;
        if let Some(criteria) = &record.success_criteria {
            validate::title("success_criteria", criteria, validate::DESCRIPTION_MAX)?;
        }
        validate_tags(&record.tags)?;
        validate_dependencies(&record.id, &record.dependencies)?;

        let mut seen = HashSet::new();
        for subtask in &record.subtasks {
            subtask.validate()?;
            if !seen.insert(subtask.id.as_str()) {
                return Err(CoreError::Duplicate {
                    entity_type: "subtask".into(),
                    id: subtask.id.clone(),
                });
            }
        }

        match record.status {
            TaskStatus::Completed => {
                record.progress = validate::PROGRESS_MAX;
                if record.completed_at.is_none() {
                    record.completed_at = Some(record.updated_at);
                }
            }
            TaskStatus::NotStarted => {
                record.progress = 0;
                record.completed_at = None;
            }
            TaskStatus::InProgress | TaskStatus::Blocked | TaskStatus::Cancelled => {
                record.completed_at = None;
            }
        }

        Ok(Self { inner: record })
    }
}

impl From<Task> for TaskRecord {
    fn from(task: Task) -> Self {
        task.inner
    }
}

impl JsonSchema for Task {
    fn schema_name() -> Cow<'static, str> {
        TaskRecord::schema_name()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        TaskRecord::json_schema(generator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(status: TaskStatus, progress: u8) -> TaskRecord {
        let mut record = Task::new("Write report").unwrap().inner;
        record.status = status;
        record.progress = progress;
        record
    }

    #[test]
    fn new_task_has_defaults() {
        let task = Task::new("Review PR").unwrap();
        assert!(task.id().starts_with("tsk-"));
        assert_eq!(task.priority(), Priority::P2);
        assert_eq!(task.status(), TaskStatus::NotStarted);
        assert_eq!(task.category(), Category::Admin);
        assert_eq!(task.estimated_minutes(), 30);
        assert_eq!(task.progress(), 0);
        assert!(task.completed_at().is_none());
    }

    #[test]
    fn rejects_out_of_range_fields() {
        assert!(Task::new("").is_err());
        assert!(Task::new("x".repeat(201)).is_err());

        let mut task = Task::new("Plan sprint").unwrap();
        assert!(task.set_estimated_minutes(4).is_err());
        assert!(task.set_estimated_minutes(481).is_err());
        assert!(task.set_progress(101).is_err());
        assert!(task.set_description("d".repeat(1001)).is_err());
        assert_eq!(task.estimated_minutes(), 30, "rejected values are not applied");
    }

    #[test]
    fn completed_record_is_normalized_to_full_progress() {
        let task = Task::try_from(record(TaskStatus::Completed, 40)).unwrap();
        assert_eq!(task.progress(), 100);
        assert!(task.completed_at().is_some());
    }

    #[test]
    fn not_started_record_is_normalized_to_zero_progress() {
        let mut raw = record(TaskStatus::NotStarted, 60);
        raw.completed_at = Some(Utc::now());
        let task = Task::try_from(raw).unwrap();
        assert_eq!(task.progress(), 0);
        assert!(task.completed_at().is_none());
    }

    #[test]
    fn record_with_out_of_range_progress_is_rejected() {
        let err = Task::try_from(record(TaskStatus::InProgress, 150)).unwrap_err();
        assert!(matches!(err, CoreError::Validation { ref field, .. } if field == "progress"));
    }

    #[test]
    fn status_transitions_drive_completed_at() {
        let mut task = Task::new("Ship release").unwrap();
        task.set_status(TaskStatus::InProgress);
        task.set_progress(40).unwrap();
        assert_eq!(task.progress(), 40);

        task.set_status(TaskStatus::Completed);
        assert_eq!(task.progress(), 100);
        let completed_at = task.completed_at().unwrap();

        task.set_status(TaskStatus::Completed);
        assert_eq!(task.completed_at(), Some(completed_at));

        task.set_status(TaskStatus::Blocked);
        assert!(task.completed_at().is_none());
        assert_eq!(task.progress(), 100);

        task.set_status(TaskStatus::NotStarted);
        assert_eq!(task.progress(), 0);
    }

    #[test]
    fn progress_on_not_started_task_stays_zero() {
        let mut task = Task::new("Draft outline").unwrap();
        task.set_progress(50).unwrap();
        assert_eq!(task.progress(), 0);
    }

    #[test]
    fn mutations_refresh_updated_at() {
        let mut task = Task::new("Email vendor").unwrap();
        let before = task.updated_at();
        std::thread::sleep(std::time::Duration::from_millis(2));
        task.set_priority(Priority::P1);
        assert!(task.updated_at() > before);
    }

    #[test]
    fn add_note_prefixes_timestamp() {
        let mut task = Task::new("Call dentist").unwrap();
        task.add_note("left voicemail").unwrap();
        let note = &task.notes()[0];
        assert!(note.starts_with('['), "note should start with a timestamp: {note}");
        assert_eq!(&note[3..4], ":");
        assert!(note.ends_with("] left voicemail"));
        assert!(task.add_note("  ").is_err());
    }

    #[test]
    fn mark_completed_sets_everything() {
        let mut task = Task::new("File taxes").unwrap();
        task.mark_completed();
        assert_eq!(task.status(), TaskStatus::Completed);
        assert_eq!(task.progress(), 100);
        assert!(task.completed_at().is_some());
    }

    #[test]
    fn complete_subtask_unknown_id_returns_false() {
        let mut task = Task::new("Refactor parser").unwrap();
        task.add_subtask("Split lexer").unwrap();
        assert!(!task.complete_subtask("sub-missing"));
        assert_eq!(task.completed_subtasks(), 0);
    }

    #[test]
    fn dependencies_reject_self_reference() {
        let mut task = Task::new("Deploy").unwrap();
        let own = task.id().to_string();
        assert!(task.add_dependency(own).is_err());
        assert!(task.add_dependency("tsk-other").unwrap());
        assert!(!task.add_dependency("tsk-other").unwrap());
    }

    #[test]
    fn duplicate_subtask_ids_are_rejected() {
        let mut raw = record(TaskStatus::InProgress, 10);
        let subtask = Subtask::new("Step one").unwrap();
        raw.subtasks = vec![subtask.clone(), subtask];
        assert!(matches!(
            Task::try_from(raw),
            Err(CoreError::Duplicate { .. })
        ));
    }

    #[test]
    fn serde_roundtrip_preserves_task() {
        let mut task = Task::new("Prepare slides").unwrap();
        task.set_category(Category::Meeting);
        task.add_subtask("Outline").unwrap();
        task.add_tag("q1").unwrap();
        let json = serde_json::to_string_pretty(&task).unwrap();
        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(back, task);
    }

    #[test]
    fn deserializing_invalid_task_fails() {
        let json = serde_json::json!({
            "id": "tsk-1",
            "title": "Too long estimate",
            "estimated_minutes": 600,
            "created_at": "2025-01-29T09:00:00Z",
            "updated_at": "2025-01-29T09:00:00Z"
        });
        assert!(serde_json::from_value::<Task>(json).is_err());
    }
}
