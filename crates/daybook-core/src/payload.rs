//! Intake of raw task payloads from the extraction pipeline.
//!
//! Payloads are loosely typed hints. Converting them into [`Task`]s is the
//! point where every constraint is enforced, before anything is reconciled.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::Task;
use crate::enums::{Category, Priority};
use crate::errors::CoreError;
use crate::planner::PlannerConfig;

const DEFAULT_SIZE: &str = "medium";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RawTaskPayload {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// A [`Category`] name.
    #[serde(default, alias = "category")]
    pub category_hint: Option<String>,
    #[serde(default)]
    pub estimated_minutes: Option<u32>,
    /// `small`, `medium`, `large` or `xlarge`; picks the default estimate.
    #[serde(default, alias = "size")]
    pub size_hint: Option<String>,
    /// `P1`/`P2`/`P3` or `high`/`medium`/`low`.
    #[serde(default, alias = "priority", alias = "raw_priority")]
    pub priority_hint: Option<String>,
    /// Subtask titles, in order.
    #[serde(default)]
    pub subtasks: Vec<String>,
}

impl Task {
    /// Validate a raw payload into a new task.
    ///
    /// Missing hints fall back to the task defaults; a missing estimate uses
    /// the planner's estimate for the payload size (`medium` when absent).
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for an unknown hint or any field
    /// outside its constraint.
    pub fn from_payload(
        payload: RawTaskPayload,
        planner: &PlannerConfig,
    ) -> Result<Self, CoreError> {
        let mut task = Self::new(payload.title)?;
        if let Some(description) = payload.description {
            task.set_description(description)?;
        }
        if let Some(hint) = payload.category_hint.as_deref() {
            task.set_category(hint.parse::<Category>()?);
        }
        if let Some(hint) = payload.priority_hint.as_deref() {
            task.set_priority(Priority::from_hint(hint)?);
        }
        let estimate = match payload.estimated_minutes {
            Some(minutes) => minutes,
            None => planner
                .default_estimates
                .for_size(payload.size_hint.as_deref().unwrap_or(DEFAULT_SIZE))?,
        };
        task.set_estimated_minutes(estimate)?;
        for title in payload.subtasks {
            task.add_subtask(title)?;
        }
        Ok(task)
    }
}

/// Convert a batch of payloads, preserving order.
///
/// # Errors
///
/// Returns the first failure, with the field prefixed by the payload index
/// (e.g. `tasks[2].title`).
pub fn tasks_from_payloads(
    payloads: Vec<RawTaskPayload>,
    planner: &PlannerConfig,
) -> Result<Vec<Task>, CoreError> {
    payloads
        .into_iter()
        .enumerate()
        .map(|(index, payload)| {
            Task::from_payload(payload, planner).map_err(|error| match error {
                CoreError::Validation { field, reason } => CoreError::Validation {
                    field: format!("tasks[{index}].{field}"),
                    reason,
                },
                other => other,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::TaskStatus;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn payload(title: &str) -> RawTaskPayload {
        RawTaskPayload {
            title: title.into(),
            ..RawTaskPayload::default()
        }
    }

    #[test]
    fn bare_payload_uses_defaults() {
        let task =
            Task::from_payload(payload("Reply to email"), &PlannerConfig::default()).unwrap();
        assert_eq!(task.priority(), Priority::P2);
        assert_eq!(task.category(), Category::Admin);
        assert_eq!(task.estimated_minutes(), 30);
        assert_eq!(task.status(), TaskStatus::NotStarted);
    }

    #[rstest]
    #[case("high", Priority::P1)]
    #[case("low", Priority::P3)]
    #[case("P1", Priority::P1)]
    fn priority_hints_are_mapped(#[case] hint: &str, #[case] expected: Priority) {
        let raw = RawTaskPayload {
            priority_hint: Some(hint.into()),
            ..payload("Fix bug")
        };
        let task = Task::from_payload(raw, &PlannerConfig::default()).unwrap();
        assert_eq!(task.priority(), expected);
    }

    #[test]
    fn size_hint_selects_default_estimate() {
        let raw = RawTaskPayload {
            size_hint: Some("xlarge".into()),
            ..payload("Migrate database")
        };
        let task = Task::from_payload(raw, &PlannerConfig::default()).unwrap();
        assert_eq!(task.estimated_minutes(), 120);
    }

    #[test]
    fn subtasks_are_created_in_order() {
        let raw = RawTaskPayload {
            subtasks: vec!["one".into(), "two".into()],
            ..payload("Write blog post")
        };
        let task = Task::from_payload(raw, &PlannerConfig::default()).unwrap();
        let titles: Vec<&str> = task.subtasks().iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["one", "two"]);
    }

    #[test]
    fn extractor_json_aliases_are_accepted() {
        let raw: RawTaskPayload = serde_json::from_str(
            r#"{"title":"Design review","category":"design","raw_priority":"high","estimated_minutes":45}"#,
        )
        .unwrap();
        let task = Task::from_payload(raw, &PlannerConfig::default()).unwrap();
        assert_eq!(task.category(), Category::Design);
        assert_eq!(task.priority(), Priority::P1);
        assert_eq!(task.estimated_minutes(), 45);
    }

    #[test]
    fn batch_errors_name_the_payload_index() {
        let bad = RawTaskPayload {
            estimated_minutes: Some(2),
            ..payload("Too short")
        };
        let err = tasks_from_payloads(vec![payload("ok"), bad], &PlannerConfig::default())
            .unwrap_err();
        let field_matches = matches!(
            err,
            CoreError::Validation { ref field, .. } if field == "tasks[1].estimated_minutes"
        );
        assert!(field_matches, "unexpected error: {err}");
    }

    #[test]
    fn unknown_category_is_rejected() {
        let raw = RawTaskPayload {
            category_hint: Some("chores".into()),
            ..payload("Laundry")
        };
        assert!(Task::from_payload(raw, &PlannerConfig::default()).is_err());
    }
}
