//! Planning preferences: work hours, energy schedule, and size-based default
//! estimates.
//!
//! Loaded once per run (see `daybook-config`) and read-only afterwards.

use std::collections::BTreeMap;

use chrono::NaiveTime;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::TimeBlock;
use crate::errors::CoreError;
use crate::validate;

const TIME_FORMAT: &str = "%H:%M";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PlannerConfig {
    #[serde(default)]
    pub work_hours: WorkHours,
    #[serde(default)]
    pub energy_schedule: EnergySchedule,
    #[serde(default)]
    pub default_estimates: DefaultEstimates,
    /// Free-form preferences passed through to downstream consumers.
    #[serde(default)]
    pub preferences: BTreeMap<String, serde_json::Value>,
}

impl PlannerConfig {
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for malformed work hours or estimates
    /// outside the task estimate range.
    pub fn validate(&self) -> Result<(), CoreError> {
        self.work_hours.validate()?;
        self.default_estimates.validate()
    }

    /// Minutes between the start and end of the work day.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the work hours are malformed.
    pub fn available_minutes(&self) -> Result<u32, CoreError> {
        let (start, end) = self.work_hours.parse()?;
        let minutes = (end - start).num_minutes();
        u32::try_from(minutes)
            .map_err(|_| CoreError::validation("work_hours", "end must be after start"))
    }
}

// ---------------------------------------------------------------------------
// WorkHours
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct WorkHours {
    /// `HH:MM`, 24-hour clock.
    pub start: String,
    /// `HH:MM`, 24-hour clock. Must be after `start`.
    pub end: String,
}

impl Default for WorkHours {
    fn default() -> Self {
        Self {
            start: "09:00".into(),
            end: "17:00".into(),
        }
    }
}

impl WorkHours {
    fn parse(&self) -> Result<(NaiveTime, NaiveTime), CoreError> {
        let start = parse_clock("work_hours.start", &self.start)?;
        let end = parse_clock("work_hours.end", &self.end)?;
        Ok((start, end))
    }

    fn validate(&self) -> Result<(), CoreError> {
        let (start, end) = self.parse()?;
        if start >= end {
            return Err(CoreError::validation(
                "work_hours",
                format!("start {} must be before end {}", self.start, self.end),
            ));
        }
        Ok(())
    }
}

fn parse_clock(field: &str, value: &str) -> Result<NaiveTime, CoreError> {
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .map_err(|_| CoreError::validation(field, format!("'{value}' is not an HH:MM time")))
}

// ---------------------------------------------------------------------------
// EnergySchedule
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EnergySchedule {
    pub peak: TimeBlock,
    pub low: TimeBlock,
}

impl Default for EnergySchedule {
    fn default() -> Self {
        Self {
            peak: TimeBlock::Morning,
            low: TimeBlock::Afternoon,
        }
    }
}

// ---------------------------------------------------------------------------
// DefaultEstimates
// ---------------------------------------------------------------------------

const fn default_small() -> u32 {
    15
}

const fn default_medium() -> u32 {
    30
}

const fn default_large() -> u32 {
    60
}

const fn default_xlarge() -> u32 {
    120
}

/// Estimated minutes by task size, used when a payload has no estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DefaultEstimates {
    #[serde(default = "default_small")]
    pub small: u32,
    #[serde(default = "default_medium")]
    pub medium: u32,
    #[serde(default = "default_large")]
    pub large: u32,
    #[serde(default = "default_xlarge")]
    pub xlarge: u32,
}

impl Default for DefaultEstimates {
    fn default() -> Self {
        Self {
            small: default_small(),
            medium: default_medium(),
            large: default_large(),
            xlarge: default_xlarge(),
        }
    }
}

impl DefaultEstimates {
    /// Estimate for a size label (`small`, `medium`, `large`, `xlarge`).
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for an unknown size.
    pub fn for_size(&self, size: &str) -> Result<u32, CoreError> {
        match size.trim().to_ascii_lowercase().as_str() {
            "small" | "s" => Ok(self.small),
            "medium" | "m" => Ok(self.medium),
            "large" | "l" => Ok(self.large),
            "xlarge" | "xl" => Ok(self.xlarge),
            other => Err(CoreError::validation(
                "size_hint",
                format!("unknown size '{other}', expected small, medium, large or xlarge"),
            )),
        }
    }

    fn validate(&self) -> Result<(), CoreError> {
        validate::estimate("default_estimates.small", self.small)?;
        validate::estimate("default_estimates.medium", self.medium)?;
        validate::estimate("default_estimates.large", self.large)?;
        validate::estimate("default_estimates.xlarge", self.xlarge)
    }
}
