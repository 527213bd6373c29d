use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A researcher who can be assigned to missions.
///
/// `name` is unique across all scientists; the store enforces it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scientist {
    pub id: i64,
    pub name: String,
    pub field_of_study: String,
    /// Avatar image URL.
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Input for creating a scientist.
///
/// Required fields are optional here so that a missing field surfaces as a
/// validation error instead of a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateScientistInput {
    pub name: Option<String>,
    pub field_of_study: Option<String>,
    pub avatar: Option<String>,
}

/// Partial update for a scientist. Only fields present in the payload are
/// applied; an explicit `null` counts as present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateScientistInput {
    #[serde(default, deserialize_with = "super::present", skip_serializing_if = "Option::is_none")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::present", skip_serializing_if = "Option::is_none")]
    pub field_of_study: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::present", skip_serializing_if = "Option::is_none")]
    pub avatar: Option<Option<String>>,
}
