//! Field constraint checks shared by the entities.
//!
//! Lengths are counted in characters, not bytes.

use crate::errors::CoreError;

pub const TITLE_MAX: usize = 200;
pub const DESCRIPTION_MAX: usize = 1000;
pub const OBJECTIVE_TITLE_MAX: usize = 100;
pub const OBJECTIVE_DESCRIPTION_MAX: usize = 500;
pub const ESTIMATE_MIN: u32 = 5;
pub const ESTIMATE_MAX: u32 = 480;
pub const PROGRESS_MAX: u8 = 100;
pub const WEIGHT_MIN: f64 = 0.1;
pub const WEIGHT_MAX: f64 = 10.0;

/// Require `value` to have between `min` and `max` characters (inclusive).
///
/// # Errors
///
/// Returns `CoreError::Validation` naming `field` when out of range.
pub fn char_len(field: &str, value: &str, min: usize, max: usize) -> Result<(), CoreError> {
    let len = value.chars().count();
    if len < min {
        return Err(CoreError::validation(
            field,
            format!("must be at least {min} characters, got {len}"),
        ));
    }
    if len > max {
        return Err(CoreError::validation(
            field,
            format!("must be at most {max} characters, got {len}"),
        ));
    }
    Ok(())
}

/// Require a non-blank title of at most `max` characters.
///
/// # Errors
///
/// Returns `CoreError::Validation` for empty, whitespace-only, or overlong titles.
pub fn title(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::validation(field, "must not be blank"));
    }
    char_len(field, value, 1, max)
}

/// Require `value` to lie in `[min, max]`.
///
/// # Errors
///
/// Returns `CoreError::Validation` naming `field` when out of range.
pub fn in_range<T>(field: &str, value: T, min: T, max: T) -> Result<(), CoreError>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if value < min || value > max {
        return Err(CoreError::validation(
            field,
            format!("must be between {min} and {max}, got {value}"),
        ));
    }
    Ok(())
}

/// Require an estimate within the daily planning window.
///
/// # Errors
///
/// Returns `CoreError::Validation` outside `5..=480` minutes.
pub fn estimate(field: &str, minutes: u32) -> Result<(), CoreError> {
    in_range(field, minutes, ESTIMATE_MIN, ESTIMATE_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_bounds() {
        assert!(title("title", "a", TITLE_MAX).is_ok());
        assert!(title("title", &"x".repeat(200), TITLE_MAX).is_ok());
        assert!(title("title", &"x".repeat(201), TITLE_MAX).is_err());
        assert!(title("title", "", TITLE_MAX).is_err());
        assert!(title("title", "   ", TITLE_MAX).is_err());
    }

    #[test]
    fn length_counts_chars_not_bytes() {
        let accented = "é".repeat(200);
        assert_eq!(accented.len(), 400);
        assert!(char_len("title", &accented, 1, TITLE_MAX).is_ok());
    }

    #[test]
    fn estimate_bounds() {
        assert!(estimate("estimated_minutes", 5).is_ok());
        assert!(estimate("estimated_minutes", 480).is_ok());
        assert!(estimate("estimated_minutes", 4).is_err());
        assert!(estimate("estimated_minutes", 481).is_err());
    }

    #[test]
    fn weight_range_error_names_field() {
        let err = in_range("weight", 11.0, WEIGHT_MIN, WEIGHT_MAX).unwrap_err();
        assert!(err.to_string().contains("weight"));
    }
}
