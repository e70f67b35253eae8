//! Closed enumerations for daybook tasks.
//!
//! All enums serialize as `snake_case` strings, except [`Priority`] which keeps
//! its `P1`/`P2`/`P3` labels. Each enum exposes `as_str()` (the stored form)
//! and an `ALL` slice in declaration order.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Task priority.
///
/// `P1` must be done today, `P2` should be done this week, `P3` can be deferred.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
)]
pub enum Priority {
    P1,
    #[default]
    P2,
    P3,
}

impl Priority {
    pub const ALL: &'static [Self] = &[Self::P1, Self::P2, Self::P3];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::P1 => "P1",
            Self::P2 => "P2",
            Self::P3 => "P3",
        }
    }

    /// Interpret an upstream priority hint.
    ///
    /// Accepts the canonical labels (case-insensitive) and the extractor's
    /// `high`/`medium`/`low` vocabulary.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for any other value.
    pub fn from_hint(hint: &str) -> Result<Self, CoreError> {
        match hint.trim().to_ascii_lowercase().as_str() {
            "p1" | "high" | "urgent" => Ok(Self::P1),
            "p2" | "medium" | "normal" => Ok(Self::P2),
            "p3" | "low" => Ok(Self::P3),
            other => Err(CoreError::validation(
                "priority",
                format!("unknown priority hint '{other}'"),
            )),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::validation("priority", format!("unknown priority '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// TaskStatus
// ---------------------------------------------------------------------------

/// Completion status of a task.
///
/// Any status may follow any other; the coupling to `progress` is what the
/// entity enforces:
///
/// ```text
/// not_started  -> progress forced to 0
/// completed    -> progress forced to 100, completed_at set
/// in_progress | blocked | cancelled -> progress kept
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
    Blocked,
    Cancelled,
}

impl TaskStatus {
    pub const ALL: &'static [Self] = &[
        Self::NotStarted,
        Self::InProgress,
        Self::Completed,
        Self::Blocked,
        Self::Cancelled,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Blocked => "blocked",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether this status ends the task's lifecycle for the day.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('-', "_").to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| CoreError::validation("status", format!("unknown status '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// TimeBlock
// ---------------------------------------------------------------------------

/// Part of the day a task is scheduled into.
///
/// Morning is deep work, afternoon collaboration, evening admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TimeBlock {
    Morning,
    Afternoon,
    Evening,
}

impl TimeBlock {
    pub const ALL: &'static [Self] = &[Self::Morning, Self::Afternoon, Self::Evening];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
        }
    }
}

impl fmt::Display for TimeBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeBlock {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|block| block.as_str() == normalized)
            .ok_or_else(|| CoreError::validation("time_block", format!("unknown time block '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Task category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Development,
    Design,
    #[default]
    Admin,
    Learning,
    Personal,
    Meeting,
    Planning,
}

impl Category {
    pub const ALL: &'static [Self] = &[
        Self::Development,
        Self::Design,
        Self::Admin,
        Self::Learning,
        Self::Personal,
        Self::Meeting,
        Self::Planning,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Design => "design",
            Self::Admin => "admin",
            Self::Learning => "learning",
            Self::Personal => "personal",
            Self::Meeting => "meeting",
            Self::Planning => "planning",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|category| category.as_str() == normalized)
            .ok_or_else(|| CoreError::validation("category", format!("unknown category '{s}'")))
    }
}
