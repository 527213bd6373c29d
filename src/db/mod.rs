mod schema;
mod seed;

pub use seed::SeedSummary;

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, ToSql};

use crate::error::{StoreError, StoreResult};
use crate::models::validation::{require_id, require_text, MISSION_VALIDATORS, SCIENTIST_VALIDATORS};
use crate::models::*;
use crate::serialize::RelationSource;

const PLANET_COLUMNS: &str =
    "p.id, p.name, p.distance_from_earth, p.nearest_star, p.image, p.created_at, p.updated_at";
const SCIENTIST_COLUMNS: &str =
    "s.id, s.name, s.field_of_study, s.avatar, s.created_at, s.updated_at";
const MISSION_COLUMNS: &str =
    "m.id, m.name, m.scientist_id, m.planet_id, m.created_at, m.updated_at";

/// Handle to the SQLite store. Clones share one connection.
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        tracing::debug!("Opened database at {}", path.display());
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Platform data directory, e.g. `~/.local/share/mission-control/mission-control.db`.
    pub fn default_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "mission-control")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Ok(dirs.data_dir().join("mission-control.db"))
    }

    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path()?)
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.lock()?;
        schema::run_migrations(&conn)
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Internal("database lock poisoned".to_string()))
    }

    // ============================================================
    // Planet operations
    // ============================================================

    pub fn get_all_planets(&self) -> StoreResult<Vec<Planet>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM planets p ORDER BY p.id",
            PLANET_COLUMNS
        ))?;
        let planets = stmt
            .query_map([], planet_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(planets)
    }

    pub fn get_planet(&self, id: i64) -> StoreResult<Option<Planet>> {
        let conn = self.lock()?;
        query_planet(&conn, id)
    }

    /// Admin path; planets have no HTTP creation endpoint.
    pub fn create_planet(&self, input: CreatePlanetInput) -> StoreResult<Planet> {
        let conn = self.lock()?;
        let planet = insert_planet(&conn, input, Utc::now())?;
        tracing::debug!(id = planet.id, "Created planet");
        Ok(planet)
    }

    /// Scientists with at least one mission to the planet, each listed once.
    pub fn get_scientists_by_planet(&self, planet_id: i64) -> StoreResult<Vec<Scientist>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT DISTINCT {} FROM scientists s
             JOIN missions m ON m.scientist_id = s.id
             WHERE m.planet_id = ? ORDER BY s.id",
            SCIENTIST_COLUMNS
        ))?;
        let scientists = stmt
            .query_map([planet_id], scientist_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(scientists)
    }

    // ============================================================
    // Scientist operations
    // ============================================================

    pub fn get_all_scientists(&self) -> StoreResult<Vec<Scientist>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM scientists s ORDER BY s.id",
            SCIENTIST_COLUMNS
        ))?;
        let scientists = stmt
            .query_map([], scientist_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(scientists)
    }

    pub fn get_scientist(&self, id: i64) -> StoreResult<Option<Scientist>> {
        let conn = self.lock()?;
        query_scientist(&conn, id)
    }

    pub fn create_scientist(&self, input: CreateScientistInput) -> StoreResult<Scientist> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let scientist = insert_scientist(&tx, input, Utc::now())?;
        tx.commit()?;

        tracing::debug!(id = scientist.id, "Created scientist");
        Ok(scientist)
    }

    /// Applies only the fields present in `input`.
    ///
    /// Every provided field is validated before anything is written, and the
    /// write runs in one transaction, so a failing patch leaves the row as it
    /// was. An empty patch returns the record untouched.
    pub fn update_scientist(&self, id: i64, input: UpdateScientistInput) -> StoreResult<Scientist> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        if query_scientist(&tx, id)?.is_none() {
            return Err(StoreError::not_found(EntityKind::Scientist, id));
        }

        let mut updates = Vec::new();
        let mut params: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(name) = input.name {
            updates.push("name = ?");
            params.push(Box::new(require_text(SCIENTIST_VALIDATORS, "name", name)?));
        }
        if let Some(field_of_study) = input.field_of_study {
            updates.push("field_of_study = ?");
            params.push(Box::new(require_text(
                SCIENTIST_VALIDATORS,
                "field_of_study",
                field_of_study,
            )?));
        }
        if let Some(avatar) = input.avatar {
            updates.push("avatar = ?");
            params.push(Box::new(avatar));
        }

        if !updates.is_empty() {
            updates.push("updated_at = ?");
            params.push(Box::new(Utc::now().to_rfc3339()));
            params.push(Box::new(id));

            let sql = format!("UPDATE scientists SET {} WHERE id = ?", updates.join(", "));
            let params_ref: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
            tx.execute(&sql, params_ref.as_slice())?;
        }

        let scientist = query_scientist(&tx, id)?
            .ok_or_else(|| StoreError::not_found(EntityKind::Scientist, id))?;
        tx.commit()?;

        tracing::debug!(id, fields = updates.len(), "Updated scientist");
        Ok(scientist)
    }

    /// Deletes the scientist; their missions go with them.
    pub fn delete_scientist(&self, id: i64) -> StoreResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let rows = tx.execute("DELETE FROM scientists WHERE id = ?", [id])?;
        if rows == 0 {
            return Err(StoreError::not_found(EntityKind::Scientist, id));
        }
        tx.commit()?;

        tracing::debug!(id, "Deleted scientist");
        Ok(())
    }

    /// Planets the scientist has at least one mission to, each listed once.
    pub fn get_planets_by_scientist(&self, scientist_id: i64) -> StoreResult<Vec<Planet>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT DISTINCT {} FROM planets p
             JOIN missions m ON m.planet_id = p.id
             WHERE m.scientist_id = ? ORDER BY p.id",
            PLANET_COLUMNS
        ))?;
        let planets = stmt
            .query_map([scientist_id], planet_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(planets)
    }

    // ============================================================
    // Mission operations
    // ============================================================

    pub fn get_all_missions(&self) -> StoreResult<Vec<Mission>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM missions m ORDER BY m.id",
            MISSION_COLUMNS
        ))?;
        let missions = stmt
            .query_map([], mission_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(missions)
    }

    pub fn get_mission(&self, id: i64) -> StoreResult<Option<Mission>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM missions m WHERE m.id = ?",
            MISSION_COLUMNS
        ))?;
        Ok(stmt.query_row([id], mission_from_row).optional()?)
    }

    pub fn create_mission(&self, input: CreateMissionInput) -> StoreResult<Mission> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mission = insert_mission(&tx, input, Utc::now())?;
        tx.commit()?;

        tracing::debug!(
            id = mission.id,
            scientist_id = mission.scientist_id,
            planet_id = mission.planet_id,
            "Created mission"
        );
        Ok(mission)
    }

    pub fn get_missions_by_planet(&self, planet_id: i64) -> StoreResult<Vec<Mission>> {
        self.get_missions_where("m.planet_id", planet_id)
    }

    pub fn get_missions_by_scientist(&self, scientist_id: i64) -> StoreResult<Vec<Mission>> {
        self.get_missions_where("m.scientist_id", scientist_id)
    }

    fn get_missions_where(&self, column: &'static str, id: i64) -> StoreResult<Vec<Mission>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM missions m WHERE {} = ? ORDER BY m.id",
            MISSION_COLUMNS, column
        ))?;
        let missions = stmt
            .query_map([id], mission_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(missions)
    }

    // ============================================================
    // Maintenance
    // ============================================================

    /// Removes every record and resets id sequences.
    pub fn clear_all(&self) -> StoreResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        clear_tables(&tx)?;
        tx.commit()?;
        Ok(())
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

impl RelationSource for Database {
    fn planet(&self, id: i64) -> StoreResult<Option<Planet>> {
        self.get_planet(id)
    }

    fn scientist(&self, id: i64) -> StoreResult<Option<Scientist>> {
        self.get_scientist(id)
    }

    fn missions_for_planet(&self, planet_id: i64) -> StoreResult<Vec<Mission>> {
        self.get_missions_by_planet(planet_id)
    }

    fn missions_for_scientist(&self, scientist_id: i64) -> StoreResult<Vec<Mission>> {
        self.get_missions_by_scientist(scientist_id)
    }

    fn scientists_for_planet(&self, planet_id: i64) -> StoreResult<Vec<Scientist>> {
        self.get_scientists_by_planet(planet_id)
    }

    fn planets_for_scientist(&self, scientist_id: i64) -> StoreResult<Vec<Planet>> {
        self.get_planets_by_scientist(scientist_id)
    }
}

// ============================================================
// Statement helpers shared with seeding
// ============================================================

fn query_planet(conn: &Connection, id: i64) -> StoreResult<Option<Planet>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM planets p WHERE p.id = ?",
        PLANET_COLUMNS
    ))?;
    Ok(stmt.query_row([id], planet_from_row).optional()?)
}

fn query_scientist(conn: &Connection, id: i64) -> StoreResult<Option<Scientist>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM scientists s WHERE s.id = ?",
        SCIENTIST_COLUMNS
    ))?;
    Ok(stmt.query_row([id], scientist_from_row).optional()?)
}

fn row_exists(conn: &Connection, table: &'static str, id: i64) -> StoreResult<bool> {
    let count: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM {} WHERE id = ?", table),
        [id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn insert_planet(conn: &Connection, input: CreatePlanetInput, now: DateTime<Utc>) -> StoreResult<Planet> {
    conn.execute(
        "INSERT INTO planets (name, distance_from_earth, nearest_star, image, created_at)
         VALUES (?, ?, ?, ?, ?)",
        (
            &input.name,
            &input.distance_from_earth,
            &input.nearest_star,
            &input.image,
            now.to_rfc3339(),
        ),
    )?;

    Ok(Planet {
        id: conn.last_insert_rowid(),
        name: input.name,
        distance_from_earth: input.distance_from_earth,
        nearest_star: input.nearest_star,
        image: input.image,
        created_at: now,
        updated_at: None,
    })
}

fn insert_scientist(
    conn: &Connection,
    input: CreateScientistInput,
    now: DateTime<Utc>,
) -> StoreResult<Scientist> {
    let name = require_text(SCIENTIST_VALIDATORS, "name", input.name)?;
    let field_of_study = require_text(SCIENTIST_VALIDATORS, "field_of_study", input.field_of_study)?;

    conn.execute(
        "INSERT INTO scientists (name, field_of_study, avatar, created_at) VALUES (?, ?, ?, ?)",
        (&name, &field_of_study, &input.avatar, now.to_rfc3339()),
    )?;

    Ok(Scientist {
        id: conn.last_insert_rowid(),
        name,
        field_of_study,
        avatar: input.avatar,
        created_at: now,
        updated_at: None,
    })
}

fn insert_mission(conn: &Connection, input: CreateMissionInput, now: DateTime<Utc>) -> StoreResult<Mission> {
    let name = require_text(MISSION_VALIDATORS, "name", input.name)?;
    let scientist_id = require_id(MISSION_VALIDATORS, "scientist_id", input.scientist_id)?;
    let planet_id = require_id(MISSION_VALIDATORS, "planet_id", input.planet_id)?;

    // The foreign keys would reject these too, but without naming the field
    if !row_exists(conn, "scientists", scientist_id)? {
        return Err(StoreError::reference("scientist_id", scientist_id));
    }
    if !row_exists(conn, "planets", planet_id)? {
        return Err(StoreError::reference("planet_id", planet_id));
    }

    conn.execute(
        "INSERT INTO missions (name, scientist_id, planet_id, created_at) VALUES (?, ?, ?, ?)",
        (&name, scientist_id, planet_id, now.to_rfc3339()),
    )?;

    Ok(Mission {
        id: conn.last_insert_rowid(),
        name,
        scientist_id,
        planet_id,
        created_at: now,
        updated_at: None,
    })
}

fn clear_tables(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(
        "DELETE FROM missions;
         DELETE FROM scientists;
         DELETE FROM planets;
         DELETE FROM sqlite_sequence WHERE name IN ('missions', 'scientists', 'planets');",
    )?;
    Ok(())
}

// ============================================================
// Row mapping
// ============================================================

fn planet_from_row(row: &Row<'_>) -> rusqlite::Result<Planet> {
    Ok(Planet {
        id: row.get(0)?,
        name: row.get(1)?,
        distance_from_earth: row.get(2)?,
        nearest_star: row.get(3)?,
        image: row.get(4)?,
        created_at: datetime_column(row, 5)?,
        updated_at: optional_datetime_column(row, 6)?,
    })
}

fn scientist_from_row(row: &Row<'_>) -> rusqlite::Result<Scientist> {
    Ok(Scientist {
        id: row.get(0)?,
        name: row.get(1)?,
        field_of_study: row.get(2)?,
        avatar: row.get(3)?,
        created_at: datetime_column(row, 4)?,
        updated_at: optional_datetime_column(row, 5)?,
    })
}

fn mission_from_row(row: &Row<'_>) -> rusqlite::Result<Mission> {
    Ok(Mission {
        id: row.get(0)?,
        name: row.get(1)?,
        scientist_id: row.get(2)?,
        planet_id: row.get(3)?,
        created_at: datetime_column(row, 4)?,
        updated_at: optional_datetime_column(row, 5)?,
    })
}

fn datetime_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    parse_datetime(idx, &row.get::<_, String>(idx)?)
}

fn optional_datetime_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    row.get::<_, Option<String>>(idx)?
        .map(|s| parse_datetime(idx, &s))
        .transpose()
}

fn parse_datetime(idx: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
