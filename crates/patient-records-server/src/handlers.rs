//! Request handlers.

use std::collections::BTreeMap;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use patient_records_core::models::{NewPatient, PatientRecord, PatientUpdate};
use patient_records_core::store::{SortKey, SortOrder};

use crate::error::ApiError;
use crate::AppState;

pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Patient Management System API" }))
}

pub async fn about() -> Json<Value> {
    Json(json!({ "message": "A fully functional API to manage your patient records" }))
}

/// GET /view
pub async fn view(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<String, PatientRecord>>, ApiError> {
    Ok(Json(state.store.list_all()?))
}

/// GET /patient/:id
pub async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PatientRecord>, ApiError> {
    Ok(Json(state.store.get(&id)?))
}

#[derive(Debug, Deserialize)]
pub struct SortParams {
    sort_by: Option<String>,
    order: Option<String>,
}

/// GET /sort?sort_by=height|weight|bmi&order=asc|desc
pub async fn sort_patients(
    State(state): State<AppState>,
    Query(params): Query<SortParams>,
) -> Result<Json<Vec<PatientRecord>>, ApiError> {
    let key: SortKey = params
        .sort_by
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest("Missing sort_by parameter".to_string()))?
        .parse()?;
    let order = match params.order.as_deref() {
        Some(order) => order.parse()?,
        None => SortOrder::default(),
    };

    Ok(Json(state.store.list_sorted(key, order)?))
}

/// POST /create
pub async fn create_patient(
    State(state): State<AppState>,
    payload: Result<Json<NewPatient>, JsonRejection>,
) -> Result<(StatusCode, Json<PatientRecord>), ApiError> {
    let Json(input) = payload?;
    let record = state.store.create(input)?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// PUT /edit/:id
pub async fn edit_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<PatientUpdate>, JsonRejection>,
) -> Result<Json<PatientRecord>, ApiError> {
    let Json(update) = payload?;
    Ok(Json(state.store.update(&id, update)?))
}

/// DELETE /delete/:id
pub async fn delete_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.store.delete(&id)?;
    Ok(Json(json!({ "message": "Patient deleted", "id": id })))
}
