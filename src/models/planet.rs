use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A destination that missions travel to.
///
/// Every descriptive field is optional; planets carry no field validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Planet {
    pub id: i64,
    pub name: Option<String>,
    pub distance_from_earth: Option<String>,
    pub nearest_star: Option<String>,
    /// Image URL.
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    /// `None` until the record is first mutated.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Input for creating a planet through the seed/admin path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePlanetInput {
    pub name: Option<String>,
    pub distance_from_earth: Option<String>,
    pub nearest_star: Option<String>,
    pub image: Option<String>,
}
