use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::ids::{PREFIX_SUBTASK, generate_id};
use crate::validate;

/// A checklist item inside a task. Owned by its parent [`Task`](super::Task);
/// the parent validates subtasks whenever they enter it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Subtask {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Subtask {
    /// Create an open subtask with a fresh ID.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the title is blank or longer than
    /// 200 characters.
    pub fn new(title: impl Into<String>) -> Result<Self, CoreError> {
        let subtask = Self {
            id: generate_id(PREFIX_SUBTASK)?,
            title: title.into(),
            completed: false,
            notes: None,
        };
        subtask.validate()?;
        Ok(subtask)
    }

    pub(crate) fn validate(&self) -> Result<(), CoreError> {
        if self.id.trim().is_empty() {
            return Err(CoreError::validation("subtask.id", "must not be empty"));
        }
        validate::title("subtask.title", &self.title, validate::TITLE_MAX)?;
        if let Some(notes) = &self.notes {
            validate::char_len("subtask.notes", notes, 0, validate::DESCRIPTION_MAX)?;
        }
        Ok(())
    }
}
