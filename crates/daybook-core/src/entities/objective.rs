use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::ids::{PREFIX_OBJECTIVE, generate_id};
use crate::validate;

const fn default_weight() -> f64 {
    1.0
}

const fn default_active() -> bool {
    true
}

/// A longer-running goal used as read-only context when prioritizing tasks.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Objective {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Relative importance, 0.1 to 10.0.
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Objective {
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the title or weight is out of range.
    pub fn new(title: impl Into<String>, weight: f64) -> Result<Self, CoreError> {
        let objective = Self {
            id: generate_id(PREFIX_OBJECTIVE)?,
            title: title.into(),
            description: String::new(),
            weight,
            active: true,
            created_at: Utc::now(),
        };
        objective.validate()?;
        Ok(objective)
    }

    /// # Errors
    ///
    /// Returns `CoreError::Validation` naming the first offending field.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.id.trim().is_empty() {
            return Err(CoreError::validation("id", "must not be empty"));
        }
        validate::title("title", &self.title, validate::OBJECTIVE_TITLE_MAX)?;
        validate::char_len(
            "description",
            &self.description,
            0,
            validate::OBJECTIVE_DESCRIPTION_MAX,
        )?;
        if !self.weight.is_finite() {
            return Err(CoreError::validation("weight", "must be a finite number"));
        }
        validate::in_range("weight", self.weight, validate::WEIGHT_MIN, validate::WEIGHT_MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.1, true)]
    #[case(10.0, true)]
    #[case(0.05, false)]
    #[case(10.5, false)]
    #[case(f64::NAN, false)]
    fn weight_range(#[case] weight: f64, #[case] ok: bool) {
        assert_eq!(Objective::new("Ship v2", weight).is_ok(), ok);
    }

    #[test]
    fn title_limit_is_100_chars() {
        assert!(Objective::new("x".repeat(100), 1.0).is_ok());
        assert!(Objective::new("x".repeat(101), 1.0).is_err());
    }

    #[test]
    fn deserialize_fills_defaults() {
        let objective: Objective =
            serde_json::from_str(r#"{"id":"obj-1","title":"Learn Rust"}"#).unwrap();
        assert!(objective.active);
        assert!((objective.weight - 1.0).abs() < f64::EPSILON);
        objective.validate().unwrap();
    }
}
