use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A mission sends one scientist to one planet.
///
/// Missions are the join between [`super::Scientist`] and [`super::Planet`];
/// both foreign keys are required and must reference existing rows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Mission {
    pub id: i64,
    pub name: String,
    pub scientist_id: i64,
    pub planet_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Input for creating a mission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateMissionInput {
    pub name: Option<String>,
    pub scientist_id: Option<i64>,
    pub planet_id: Option<i64>,
}
