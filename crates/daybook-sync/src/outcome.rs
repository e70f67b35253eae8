//! Result of a reconciliation.
//!
//! Every operation answers with one of three shapes: data, an explicit empty
//! result, or a classified failure. "No data" is never an error.

use std::fmt;

use daybook_core::{CoreError, DailyTaskSet, TaskDate};
use serde::Serialize;

use crate::remote::{RemoteError, RemoteErrorKind};

// ---------------------------------------------------------------------------
// Failure taxonomy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorReason {
    Validation,
    NotFound,
    Connection,
    ConstraintViolation,
    Permission,
    Unknown,
}

impl ErrorReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Connection => "connection",
            Self::ConstraintViolation => "constraint_violation",
            Self::Permission => "permission",
            Self::Unknown => "unknown",
        }
    }

    /// The suggested next step for this kind of failure.
    #[must_use]
    pub const fn remediation(self) -> Remediation {
        match self {
            Self::Validation => Remediation::FixInput,
            Self::NotFound => Remediation::CheckTaskId,
            Self::Connection => Remediation::CheckConnection,
            Self::ConstraintViolation => Remediation::RetryAsUpdate,
            Self::Permission => Remediation::CheckCredentials,
            Self::Unknown => Remediation::InspectLogs,
        }
    }
}

impl fmt::Display for ErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<RemoteErrorKind> for ErrorReason {
    fn from(kind: RemoteErrorKind) -> Self {
        match kind {
            RemoteErrorKind::Connection => Self::Connection,
            RemoteErrorKind::ConstraintViolation => Self::ConstraintViolation,
            RemoteErrorKind::Permission => Self::Permission,
            RemoteErrorKind::Unknown => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Remediation {
    FixInput,
    CheckTaskId,
    CheckConnection,
    RetryAsUpdate,
    CheckCredentials,
    InspectLogs,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncFailure {
    pub reason: ErrorReason,
    pub suggested_fix: Remediation,
    pub detail: String,
}

impl SyncFailure {
    pub fn new(reason: ErrorReason, detail: impl Into<String>) -> Self {
        Self {
            reason,
            suggested_fix: reason.remediation(),
            detail: detail.into(),
        }
    }
}

impl From<&RemoteError> for SyncFailure {
    fn from(error: &RemoteError) -> Self {
        Self::new(error.kind.into(), error.message.clone())
    }
}

impl From<&CoreError> for SyncFailure {
    fn from(error: &CoreError) -> Self {
        let reason = match error {
            CoreError::Validation { .. } | CoreError::Duplicate { .. } => ErrorReason::Validation,
            CoreError::NotFound { .. } => ErrorReason::NotFound,
            CoreError::Other(_) => ErrorReason::Unknown,
        };
        Self::new(reason, error.to_string())
    }
}

// ---------------------------------------------------------------------------
// Result envelope
// ---------------------------------------------------------------------------

/// Where the returned task set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Remote,
    Cache,
}

/// How a push reached the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteAction {
    Inserted,
    Updated,
    /// The insert lost a race with another writer and was retried as an update.
    UpdatedAfterConflict,
}

impl WriteAction {
    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Inserted => "created",
            Self::Updated | Self::UpdatedAfterConflict => "updated",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum SyncResult {
    Data {
        message: String,
        set: DailyTaskSet,
        source: DataSource,
        /// Served from cache because the remote store was unavailable.
        degraded: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        action: Option<WriteAction>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        warnings: Vec<String>,
    },
    Empty {
        message: String,
        date: TaskDate,
        degraded: bool,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        warnings: Vec<String>,
    },
    Failed {
        message: String,
        failure: SyncFailure,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        warnings: Vec<String>,
    },
}

impl SyncResult {
    pub(crate) fn failed(
        message: impl Into<String>,
        failure: SyncFailure,
        warnings: Vec<String>,
    ) -> Self {
        Self::Failed {
            message: message.into(),
            failure,
            warnings,
        }
    }

    pub(crate) fn with_leading_warnings(mut self, mut leading: Vec<String>) -> Self {
        let warnings = match &mut self {
            Self::Data { warnings, .. }
            | Self::Empty { warnings, .. }
            | Self::Failed { warnings, .. } => warnings,
        };
        leading.append(warnings);
        *warnings = leading;
        self
    }

    /// `false` only for [`SyncResult::Failed`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }

    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        match self {
            Self::Data { degraded, .. } | Self::Empty { degraded, .. } => *degraded,
            Self::Failed { .. } => false,
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Data { message, .. }
            | Self::Empty { message, .. }
            | Self::Failed { message, .. } => message,
        }
    }

    #[must_use]
    pub const fn set(&self) -> Option<&DailyTaskSet> {
        match self {
            Self::Data { set, .. } => Some(set),
            Self::Empty { .. } | Self::Failed { .. } => None,
        }
    }

    #[must_use]
    pub fn into_set(self) -> Option<DailyTaskSet> {
        match self {
            Self::Data { set, .. } => Some(set),
            Self::Empty { .. } | Self::Failed { .. } => None,
        }
    }

    #[must_use]
    pub const fn source(&self) -> Option<DataSource> {
        match self {
            Self::Data { source, .. } => Some(*source),
            Self::Empty { .. } | Self::Failed { .. } => None,
        }
    }

    #[must_use]
    pub const fn action(&self) -> Option<WriteAction> {
        match self {
            Self::Data { action, .. } => *action,
            Self::Empty { .. } | Self::Failed { .. } => None,
        }
    }

    #[must_use]
    pub const fn failure(&self) -> Option<&SyncFailure> {
        match self {
            Self::Failed { failure, .. } => Some(failure),
            Self::Data { .. } | Self::Empty { .. } => None,
        }
    }

    #[must_use]
    pub fn warnings(&self) -> &[String] {
        match self {
            Self::Data { warnings, .. }
            | Self::Empty { warnings, .. }
            | Self::Failed { warnings, .. } => warnings,
        }
    }
}

/// Outcome of probing the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionCheck {
    pub ok: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<SyncFailure>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(ErrorReason::Validation, "fix_input")]
    #[case(ErrorReason::NotFound, "check_task_id")]
    #[case(ErrorReason::Connection, "check_connection")]
    #[case(ErrorReason::ConstraintViolation, "retry_as_update")]
    #[case(ErrorReason::Permission, "check_credentials")]
    #[case(ErrorReason::Unknown, "inspect_logs")]
    fn every_reason_has_a_remediation(#[case] reason: ErrorReason, #[case] tag: &str) {
        let json = serde_json::to_value(reason.remediation()).unwrap();
        assert_eq!(json, serde_json::json!(tag));
        assert_eq!(serde_json::to_value(reason).unwrap(), serde_json::json!(reason.as_str()));
    }

    #[test]
    fn failed_result_serializes_reason_and_fix() {
        let result = SyncResult::failed(
            "push failed",
            SyncFailure::from(&RemoteError::connection("refused")),
            vec![],
        );
        assert!(!result.is_success());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["result"], "failed");
        assert_eq!(json["failure"]["reason"], "connection");
        assert_eq!(json["failure"]["suggested_fix"], "check_connection");
        assert!(json.get("warnings").is_none());
    }

    #[test]
    fn empty_result_is_success() {
        let result = SyncResult::Empty {
            message: "no data".into(),
            date: "2025-01-29".parse().unwrap(),
            degraded: true,
            warnings: vec![],
        };
        assert!(result.is_success());
        assert!(result.is_degraded());
        assert!(result.set().is_none());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["result"], "empty");
        assert_eq!(json["date"], "2025-01-29");
    }

    #[test]
    fn core_errors_map_to_reasons() {
        let not_found = SyncFailure::from(&CoreError::not_found("task", "tsk-1"));
        assert_eq!(not_found.reason, ErrorReason::NotFound);
        let invalid = SyncFailure::from(&CoreError::validation("title", "blank"));
        assert_eq!(invalid.suggested_fix, Remediation::FixInput);
    }
}
