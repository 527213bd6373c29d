//! Per-field validation tables.
//!
//! Each entity owns a static table of validators keyed by field name. Create
//! operations run every entry; patch operations run only the entries for the
//! fields present in the payload, so the same rules apply on both paths.

use crate::error::{StoreError, StoreResult};

/// A single field value as seen by a validator.
#[derive(Debug, Clone, Copy)]
pub enum FieldValue<'a> {
    Text(Option<&'a str>),
    Id(Option<i64>),
}

impl<'a> From<&'a Option<String>> for FieldValue<'a> {
    fn from(value: &'a Option<String>) -> Self {
        Self::Text(value.as_deref())
    }
}

impl From<Option<i64>> for FieldValue<'_> {
    fn from(value: Option<i64>) -> Self {
        Self::Id(value)
    }
}

pub struct FieldValidator {
    pub field: &'static str,
    pub message: &'static str,
    pub check: fn(FieldValue<'_>) -> bool,
}

/// Text must be present and non-empty.
fn required_text(value: FieldValue<'_>) -> bool {
    match value {
        FieldValue::Text(Some(s)) => !s.is_empty(),
        _ => false,
    }
}

/// Ids must be present and non-zero.
fn required_id(value: FieldValue<'_>) -> bool {
    matches!(value, FieldValue::Id(Some(id)) if id != 0)
}

pub const SCIENTIST_VALIDATORS: &[FieldValidator] = &[
    FieldValidator {
        field: "name",
        message: "Must have name",
        check: required_text,
    },
    FieldValidator {
        field: "field_of_study",
        message: "Must have a field of study",
        check: required_text,
    },
];

pub const MISSION_VALIDATORS: &[FieldValidator] = &[
    FieldValidator {
        field: "name",
        message: "Must have name",
        check: required_text,
    },
    FieldValidator {
        field: "scientist_id",
        message: "Must have scientist_id",
        check: required_id,
    },
    FieldValidator {
        field: "planet_id",
        message: "Must have planet_id",
        check: required_id,
    },
];

/// Validates one field against a table. Fields without an entry always pass.
pub fn validate_field(
    table: &[FieldValidator],
    field: &str,
    value: FieldValue<'_>,
) -> StoreResult<()> {
    match table.iter().find(|v| v.field == field) {
        Some(v) if !(v.check)(value) => Err(StoreError::validation(v.field, v.message)),
        _ => Ok(()),
    }
}

/// Validates a text field and returns the accepted value.
pub fn require_text(
    table: &[FieldValidator],
    field: &str,
    value: Option<String>,
) -> StoreResult<String> {
    validate_field(table, field, (&value).into())?;
    Ok(value.unwrap_or_default())
}

/// Validates an id field and returns the accepted value.
pub fn require_id(table: &[FieldValidator], field: &str, value: Option<i64>) -> StoreResult<i64> {
    validate_field(table, field, value.into())?;
    Ok(value.unwrap_or_default())
}
