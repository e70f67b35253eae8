//! Prefixed identifiers.
//!
//! IDs look like `tsk-a3f8b2c1`: a three-letter prefix naming the entity,
//! a dash, and eight lowercase hex characters from the OS random source.
//! Identities loaded from storage are opaque strings and are not required to
//! follow this shape.

use crate::errors::CoreError;

pub const PREFIX_TASK: &str = "tsk";
pub const PREFIX_SUBTASK: &str = "sub";
pub const PREFIX_OBJECTIVE: &str = "obj";
pub const PREFIX_SUBSCRIPTION: &str = "wch";

pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_TASK,
    PREFIX_SUBTASK,
    PREFIX_OBJECTIVE,
    PREFIX_SUBSCRIPTION,
];

/// Generate a fresh prefixed ID.
///
/// # Errors
///
/// Returns `CoreError::Other` if the OS random source is unavailable.
pub fn generate_id(prefix: &str) -> Result<String, CoreError> {
    let mut bytes = [0u8; 4];
    getrandom::fill(&mut bytes)
        .map_err(|e| CoreError::Other(anyhow::anyhow!("failed to generate {prefix} id: {e}")))?;
    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    Ok(format!("{prefix}-{hex}"))
}
