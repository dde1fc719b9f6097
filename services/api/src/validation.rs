//! Validation for catalog input shapes
//!
//! Each function takes raw request values and returns either a typed value
//! or the full list of field messages.

use chrono::{Datelike, Utc};

use crate::models::movie::{DEFAULT_LIMIT, DEFAULT_PAGE, ListParams, MoviePatch, NewMovie};

/// Earliest accepted publishing year
pub const MIN_PUBLISHING_YEAR: i32 = 1800;
/// How far past the current year a publishing year may lie
pub const MAX_YEARS_AHEAD: i32 = 10;

const TITLE: &str = "title";
const PUBLISHING_YEAR: &str = "publishingYear";

/// Field-level validation failures
pub type ValidationResult<T> = Result<T, Vec<String>>;

/// Current calendar year in UTC
pub fn current_year() -> i32 {
    Utc::now().year()
}

/// Validate the fields of a new movie
pub fn validate_new_movie(
    title: Option<&str>,
    publishing_year: Option<&str>,
    current_year: i32,
) -> ValidationResult<NewMovie> {
    let mut errors = Vec::new();

    let title = match title {
        Some(title) => check_title(title, &mut errors),
        None => {
            errors.push(format!("{TITLE} should not be empty"));
            None
        }
    };
    let publishing_year = match publishing_year {
        Some(year) => check_year(year, current_year, &mut errors),
        None => {
            errors.push(format!("{PUBLISHING_YEAR} should not be empty"));
            None
        }
    };

    match (title, publishing_year) {
        (Some(title), Some(publishing_year)) if errors.is_empty() => Ok(NewMovie {
            title,
            publishing_year,
            poster: None,
        }),
        _ => Err(errors),
    }
}

/// Validate the fields of a partial update; every field is optional
pub fn validate_patch(
    title: Option<&str>,
    publishing_year: Option<&str>,
    current_year: i32,
) -> ValidationResult<MoviePatch> {
    let mut errors = Vec::new();

    let title = title.and_then(|title| check_title(title, &mut errors));
    let publishing_year =
        publishing_year.and_then(|year| check_year(year, current_year, &mut errors));

    if errors.is_empty() {
        Ok(MoviePatch {
            title,
            publishing_year,
        })
    } else {
        Err(errors)
    }
}

/// Validate listing query parameters, applying defaults
pub fn validate_list_query(
    page: Option<&str>,
    limit: Option<&str>,
    search: Option<&str>,
) -> ValidationResult<ListParams> {
    let mut errors = Vec::new();

    let page = check_positive("page", page, DEFAULT_PAGE, &mut errors);
    let limit = check_positive("limit", limit, DEFAULT_LIMIT, &mut errors);

    if errors.is_empty() {
        Ok(ListParams::new(page, limit, search))
    } else {
        Err(errors)
    }
}

/// Parse a movie id path segment
pub fn parse_id(raw: &str) -> Result<i32, String> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| "Validation failed (numeric string is expected)".to_string())
}

fn check_title(title: &str, errors: &mut Vec<String>) -> Option<String> {
    let title = title.trim();
    if title.is_empty() {
        errors.push(format!("{TITLE} should not be empty"));
        return None;
    }
    Some(title.to_string())
}

fn check_year(raw: &str, current_year: i32, errors: &mut Vec<String>) -> Option<i32> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.push(format!("{PUBLISHING_YEAR} should not be empty"));
        return None;
    }

    let Ok(year) = raw.parse::<i32>() else {
        errors.push(format!(
            "{PUBLISHING_YEAR} must be a number conforming to the specified constraints"
        ));
        return None;
    };

    let max_year = current_year + MAX_YEARS_AHEAD;
    if year < MIN_PUBLISHING_YEAR {
        errors.push(format!(
            "{PUBLISHING_YEAR} must not be less than {MIN_PUBLISHING_YEAR}"
        ));
        return None;
    }
    if year > max_year {
        errors.push(format!("{PUBLISHING_YEAR} must not be greater than {max_year}"));
        return None;
    }

    Some(year)
}

fn check_positive(field: &str, raw: Option<&str>, default: u32, errors: &mut Vec<String>) -> u32 {
    let raw = match raw.map(str::trim) {
        None | Some("") => return default,
        Some(raw) => raw,
    };

    match raw.parse::<u32>() {
        Ok(value) if value >= 1 => value,
        _ => {
            errors.push(format!("{field} must be a positive integer"));
            default
        }
    }
}
