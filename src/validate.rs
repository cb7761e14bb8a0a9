use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::Date;
use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

use crate::error::{field_errors, ApiError, FieldError};
use crate::store::{Category, Priority};

const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

fn violation(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

pub fn email(value: &str) -> Result<(), ValidationError> {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex compiles");
    }
    if EMAIL_RE.is_match(value) {
        Ok(())
    } else {
        Err(violation("email", "Please provide a valid email"))
    }
}

// The todo body rules take raw JSON values: a null or wrong-typed field is
// then a reported violation, collected with the rest, instead of aborting
// body decoding.

/// `text` on creation. Anything but a non-empty string counts as missing.
pub fn text(value: &Value) -> Result<(), ValidationError> {
    nonempty_string(value, "Text is required")
}

/// `text` on update, where the field may be left out but not blanked.
pub fn updated_text(value: &Value) -> Result<(), ValidationError> {
    nonempty_string(value, "Text cannot be empty")
}

fn nonempty_string(value: &Value, message: &'static str) -> Result<(), ValidationError> {
    match value.as_str() {
        Some(s) if !s.is_empty() => Ok(()),
        _ => Err(violation("text", message)),
    }
}

pub fn priority(value: &Value) -> Result<(), ValidationError> {
    match value.as_str() {
        Some(s) if s.parse::<Priority>().is_ok() => Ok(()),
        _ => Err(violation("priority", "Priority must be low, medium, or high")),
    }
}

pub fn category(value: &Value) -> Result<(), ValidationError> {
    match value.as_str() {
        Some(s) if s.parse::<Category>().is_ok() => Ok(()),
        _ => Err(violation(
            "category",
            "Category must be personal, work, health, education, or social",
        )),
    }
}

/// `completed` must be a JSON boolean; no string or numeric stand-ins.
pub fn completed(value: &Value) -> Result<(), ValidationError> {
    if value.is_boolean() {
        Ok(())
    } else {
        Err(violation("completed", "Completed must be a boolean"))
    }
}

/// `dueDate` on creation, where an explicit null is rejected like any
/// other non-date.
pub fn due_date(value: &Value) -> Result<(), ValidationError> {
    match value.as_str() {
        Some(s) if parse_date(s).is_some() => Ok(()),
        _ => Err(violation("due_date", "Due date must be a valid date")),
    }
}

/// `dueDate` on update, where null is the way to clear the stored date.
pub fn nullable_due_date(value: &Value) -> Result<(), ValidationError> {
    if value.is_null() {
        return Ok(());
    }
    due_date(value)
}

/// Parses a `YYYY-MM-DD` calendar date; impossible dates are rejected.
pub fn parse_date(value: &str) -> Option<Date> {
    Date::parse(value, DATE_FORMAT).ok()
}

/// Checks a path identifier, reporting the same detail shape as body rules.
pub fn path_id(raw: &str) -> Result<Uuid, ApiError> {
    path_id_with_body(raw, Ok(()))
}

/// Checks the path identifier together with the body rules so a request
/// with a bad id and a bad body reports both violations at once.
pub fn path_id_with_body(
    raw: &str,
    body: Result<(), ValidationErrors>,
) -> Result<Uuid, ApiError> {
    let mut details = Vec::new();
    let id = Uuid::parse_str(raw).ok();
    if id.is_none() {
        details.push(FieldError::new("id", "Invalid todo ID"));
    }
    if let Err(errors) = body {
        details.extend(field_errors(&errors));
    }
    match id {
        Some(id) if details.is_empty() => Ok(id),
        _ => Err(ApiError::Validation(details)),
    }
}
