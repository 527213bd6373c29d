//! Domain models for Mission Control.
//!
//! # Core Concepts
//!
//! - [`Planet`]: A destination. Planets are created through the seed/admin path
//!   and only listed over HTTP.
//! - [`Scientist`]: A researcher with a unique name and a field of study.
//! - [`Mission`]: The join record linking exactly one scientist to exactly one
//!   planet.
//!
//! Planets and scientists never reference each other directly. The
//! `Planet::scientists` and `Scientist::planets` views are derived by
//! projecting through missions at read time.

mod mission;
mod planet;
mod scientist;
pub mod validation;

pub use mission::*;
pub use planet::*;
pub use scientist::*;

use serde::{Deserialize, Deserializer};

/// The three persisted record types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Planet,
    Scientist,
    Mission,
}

impl EntityKind {
    /// Display name used in client-facing messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Planet => "Planet",
            Self::Scientist => "Scientist",
            Self::Mission => "Mission",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Any persisted record, used where the serializer walks relationships.
#[derive(Debug, Clone)]
pub enum Record {
    Planet(Planet),
    Scientist(Scientist),
    Mission(Mission),
}

impl Record {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Planet(_) => EntityKind::Planet,
            Self::Scientist(_) => EntityKind::Scientist,
            Self::Mission(_) => EntityKind::Mission,
        }
    }
}

impl From<Planet> for Record {
    fn from(planet: Planet) -> Self {
        Self::Planet(planet)
    }
}

impl From<Scientist> for Record {
    fn from(scientist: Scientist) -> Self {
        Self::Scientist(scientist)
    }
}

impl From<Mission> for Record {
    fn from(mission: Mission) -> Self {
        Self::Mission(mission)
    }
}

/// Distinguishes a field that is absent from a payload (`None`) from one that
/// is present, including an explicit `null` (`Some(None)`).
///
/// Use together with `#[serde(default)]`.
pub(crate) fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
