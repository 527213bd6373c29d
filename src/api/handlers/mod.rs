use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;

use super::ApiError;
use crate::db::Database;
use crate::error::StoreError;
use crate::models::*;
use crate::serialize::{self, Rules};

type ApiResult<T> = Result<T, ApiError>;

// ============================================================
// Root
// ============================================================

pub async fn home() -> &'static str {
    ""
}

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn not_found() -> ApiError {
    ApiError::not_found("Not found")
}

// ============================================================
// Scientists
// ============================================================

pub async fn list_scientists(State(db): State<Database>) -> ApiResult<Json<Vec<Value>>> {
    let scientists = db.get_all_scientists()?;
    Ok(Json(serialize::to_values(&db, scientists, &Rules::scientist())?))
}

pub async fn get_scientist(
    State(db): State<Database>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Value>> {
    let Path(id) = id?;
    let scientist = db
        .get_scientist(id)?
        .ok_or_else(|| StoreError::not_found(EntityKind::Scientist, id))?;
    serialize_scientist(&db, scientist)
}

pub async fn create_scientist(
    State(db): State<Database>,
    input: Result<Json<CreateScientistInput>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(input) = input?;
    let scientist = db.create_scientist(input)?;
    tracing::info!(id = scientist.id, "Scientist created");
    serialize_scientist(&db, scientist)
}

pub async fn update_scientist(
    State(db): State<Database>,
    id: Result<Path<i64>, PathRejection>,
    input: Result<Json<UpdateScientistInput>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Path(id) = id?;
    // An absent record wins over a malformed body
    if db.get_scientist(id)?.is_none() {
        return Err(StoreError::not_found(EntityKind::Scientist, id).into());
    }
    let Json(input) = input?;
    let scientist = db.update_scientist(id, input)?;
    serialize_scientist(&db, scientist)
}

pub async fn delete_scientist(
    State(db): State<Database>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    db.delete_scientist(id)?;
    tracing::info!(id, "Scientist deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn serialize_scientist(db: &Database, scientist: Scientist) -> ApiResult<Json<Value>> {
    let value = serialize::to_value(db, &scientist.into(), &Rules::scientist())?;
    Ok(Json(value))
}

// ============================================================
// Planets
// ============================================================

pub async fn list_planets(State(db): State<Database>) -> ApiResult<Json<Vec<Value>>> {
    let planets = db.get_all_planets()?;
    Ok(Json(serialize::to_values(&db, planets, &Rules::planet_listing())?))
}

// ============================================================
// Missions
// ============================================================

pub async fn create_mission(
    State(db): State<Database>,
    input: Result<Json<CreateMissionInput>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(input) = input?;
    let mission = db.create_mission(input)?;
    tracing::info!(id = mission.id, "Mission created");
    let value = serialize::to_value(&db, &mission.into(), &Rules::mission())?;
    Ok(Json(value))
}
