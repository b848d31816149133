use crate::error::{AppError, AppResult};
use regex::Regex;
use std::sync::LazyLock;

pub const MAX_FIELD_LEN: usize = 64;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Trim and collapse internal whitespace runs to a single space.
pub fn normalize_field(value: &str) -> String {
    WHITESPACE_RUN.replace_all(value.trim(), " ").into_owned()
}

/// Student IDs must carry at least one non-whitespace character.
pub fn validate_student_id(student_id: &str) -> AppResult<()> {
    if student_id.trim().is_empty() {
        return Err(AppError::ValidationError(
            "Please enter a valid Student ID.".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_field_len(field: &str, value: &str) -> AppResult<()> {
    if value.chars().count() > MAX_FIELD_LEN {
        return Err(AppError::ValidationError(format!(
            "{field} must be at most {MAX_FIELD_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_field() {
        assert_eq!(normalize_field("  Ana   Maria "), "Ana Maria");
        assert_eq!(normalize_field("S123"), "S123");
        assert_eq!(normalize_field("\t\n"), "");
        assert_eq!(normalize_field("Ana\t \nMaria"), "Ana Maria");
    }

    #[test]
    fn test_validate_student_id() {
        assert!(validate_student_id("S123").is_ok());
        assert!(validate_student_id("").is_err());
        assert!(validate_student_id("   \t").is_err());
    }

    #[test]
    fn test_validate_field_len() {
        assert!(validate_field_len("first_name", &"a".repeat(64)).is_ok());
        assert!(validate_field_len("first_name", &"a".repeat(65)).is_err());
    }
}
