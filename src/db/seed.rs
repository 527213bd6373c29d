use chrono::Utc;

use super::{clear_tables, insert_mission, insert_planet, insert_scientist, Database};
use crate::error::StoreResult;
use crate::models::{CreateMissionInput, CreatePlanetInput, CreateScientistInput};

/// Counts of the records written by [`Database::seed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub planets: usize,
    pub scientists: usize,
    pub missions: usize,
}

struct SeedPlanet {
    name: &'static str,
    distance_from_earth: &'static str,
    nearest_star: &'static str,
    image: &'static str,
}

const PLANETS: &[SeedPlanet] = &[
    SeedPlanet {
        name: "TauCeti E",
        distance_from_earth: "12 light years",
        nearest_star: "TauCeti",
        image: "planet1",
    },
    SeedPlanet {
        name: "Maxxor",
        distance_from_earth: "9 parsecs",
        nearest_star: "Canus Minor",
        image: "planet2",
    },
    SeedPlanet {
        name: "Plasmus",
        distance_from_earth: "1.4 light years",
        nearest_star: "Ursa Major",
        image: "planet3",
    },
    SeedPlanet {
        name: "NuUranus",
        distance_from_earth: "4 light years",
        nearest_star: "Orion",
        image: "planet4",
    },
    SeedPlanet {
        name: "Kepler-22b",
        distance_from_earth: "600 light years",
        nearest_star: "Kepler-22",
        image: "planet5",
    },
];

/// (name, field of study)
const SCIENTISTS: &[(&str, &str)] = &[
    ("Mel T. Valent", "xenobiology"),
    ("P. Legrange", "orbital mechanics"),
    ("Ada Lovelace", "computation"),
    ("Vera Rubin", "astronomy"),
];

/// (name, scientist index, planet index)
const MISSIONS: &[(&str, usize, usize)] = &[
    ("Explore Planet X", 0, 0),
    ("Survey the Rings", 0, 2),
    ("Gravity Assist Trial", 1, 1),
    ("Signal Decoding", 2, 3),
    ("Dark Matter Census", 3, 4),
    ("Deep Survey", 3, 0),
];

impl Database {
    /// Replaces all data with the built-in sample set in one transaction.
    pub fn seed(&self) -> StoreResult<SeedSummary> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let now = Utc::now();

        clear_tables(&tx)?;

        let mut planet_ids = Vec::with_capacity(PLANETS.len());
        for p in PLANETS {
            let planet = insert_planet(
                &tx,
                CreatePlanetInput {
                    name: Some(p.name.to_string()),
                    distance_from_earth: Some(p.distance_from_earth.to_string()),
                    nearest_star: Some(p.nearest_star.to_string()),
                    image: Some(p.image.to_string()),
                },
                now,
            )?;
            planet_ids.push(planet.id);
        }

        let mut scientist_ids = Vec::with_capacity(SCIENTISTS.len());
        for (i, (name, field_of_study)) in SCIENTISTS.iter().enumerate() {
            let scientist = insert_scientist(
                &tx,
                CreateScientistInput {
                    name: Some(name.to_string()),
                    field_of_study: Some(field_of_study.to_string()),
                    avatar: Some(format!("https://robohash.org/{}", i + 1)),
                },
                now,
            )?;
            scientist_ids.push(scientist.id);
        }

        for (name, scientist, planet) in MISSIONS {
            insert_mission(
                &tx,
                CreateMissionInput {
                    name: Some(name.to_string()),
                    scientist_id: Some(scientist_ids[*scientist]),
                    planet_id: Some(planet_ids[*planet]),
                },
                now,
            )?;
        }

        tx.commit()?;

        let summary = SeedSummary {
            planets: planet_ids.len(),
            scientists: scientist_ids.len(),
            missions: MISSIONS.len(),
        };
        tracing::info!(
            planets = summary.planets,
            scientists = summary.scientists,
            missions = summary.missions,
            "Seeded database"
        );
        Ok(summary)
    }
}
