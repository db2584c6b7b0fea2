//! Input validation shared by the services.
//!
//! Every check runs before any database call and reports a
//! `AppError::Validation` naming the offending field.

use crate::config::{MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH};
use crate::error::{AppError, Result};
use chrono::NaiveTime;

fn invalid(field: &str, reason: impl std::fmt::Display) -> AppError {
    AppError::Validation(format!("{}: {}", field, reason))
}

/// Trim a required title, rejecting empty or oversized values.
pub fn require_title(field: &str, title: &str) -> Result<String> {
    let trimmed = title.trim();

    if trimmed.is_empty() {
        return Err(invalid(field, "is required"));
    }
    if trimmed.chars().count() > MAX_TITLE_LENGTH {
        return Err(invalid(
            field,
            format!("cannot exceed {} characters", MAX_TITLE_LENGTH),
        ));
    }

    Ok(trimmed.to_string())
}

/// Reject descriptions and notes longer than the limit.
pub fn check_description(field: &str, text: &str) -> Result<()> {
    if text.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(invalid(
            field,
            format!("cannot exceed {} characters", MAX_DESCRIPTION_LENGTH),
        ));
    }
    Ok(())
}

/// Parse a 24-hour `HH:MM` time of day.
pub fn parse_time_of_day(field: &str, time: &str) -> Result<NaiveTime> {
    let time = time.trim();

    if time.len() != 5 || time.as_bytes().get(2) != Some(&b':') {
        return Err(invalid(field, "must be in HH:MM format"));
    }

    NaiveTime::parse_from_str(time, "%H:%M").map_err(|_| invalid(field, "must be a valid HH:MM time"))
}

/// Validate a `HH:MM` string and return it in canonical form.
pub fn normalize_time_of_day(field: &str, time: &str) -> Result<String> {
    let parsed = parse_time_of_day(field, time)?;
    Ok(parsed.format("%H:%M").to_string())
}

/// Validate a `#RRGGBB` color, returning it lowercased.
pub fn normalize_color(color: &str) -> Result<String> {
    let color = color.trim();
    let hex = color
        .strip_prefix('#')
        .ok_or_else(|| invalid("color", "must start with '#'"))?;

    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid("color", "must be in #RRGGBB format"));
    }

    Ok(color.to_ascii_lowercase())
}

/// Trim an optional category; empty means "use the default".
pub fn normalize_category(category: Option<&str>) -> Result<Option<String>> {
    match category.map(str::trim) {
        None | Some("") => Ok(None),
        Some(c) if c.chars().count() > MAX_TITLE_LENGTH => Err(invalid(
            "category",
            format!("cannot exceed {} characters", MAX_TITLE_LENGTH),
        )),
        Some(c) => Ok(Some(c.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_title() {
        assert_eq!(require_title("title", "  Read 20 pages ").unwrap(), "Read 20 pages");
        assert!(require_title("title", "").is_err());
        assert!(require_title("title", "   ").is_err());
        assert!(require_title("title", &"x".repeat(MAX_TITLE_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_time_of_day() {
        assert_eq!(normalize_time_of_day("time", "07:05").unwrap(), "07:05");
        assert_eq!(normalize_time_of_day("time", "23:59").unwrap(), "23:59");
        assert!(parse_time_of_day("time", "7:05").is_err());
        assert!(parse_time_of_day("time", "24:00").is_err());
        assert!(parse_time_of_day("time", "12:60").is_err());
        assert!(parse_time_of_day("time", "noon!").is_err());
    }

    #[test]
    fn test_color() {
        assert_eq!(normalize_color("#A1B2C3").unwrap(), "#a1b2c3");
        assert!(normalize_color("a1b2c3").is_err());
        assert!(normalize_color("#a1b2c").is_err());
        assert!(normalize_color("#gggggg").is_err());
    }

    #[test]
    fn test_category() {
        assert_eq!(normalize_category(None).unwrap(), None);
        assert_eq!(normalize_category(Some("  ")).unwrap(), None);
        assert_eq!(
            normalize_category(Some(" fitness ")).unwrap(),
            Some("fitness".to_string())
        );
    }

    #[test]
    fn test_description_limit() {
        assert!(check_description("description", "short").is_ok());
        assert!(check_description("description", &"x".repeat(MAX_DESCRIPTION_LENGTH + 1)).is_err());
    }
}
