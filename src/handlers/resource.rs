//! Resource CRUD handlers: list, read, create, update, delete.
//!
//! Absence maps to 404 `{message: "<table> not found"}`; store failures are logged and
//! surface as 500 `{error: "Server error"}` (see [`AppError`]).

use crate::error::AppError;
use crate::extractors::{RecordBody, RowId};
use crate::response::{created, deleted, ok};
use crate::state::ResourceState;
use axum::{extract::State, response::IntoResponse};

fn not_found(state: &ResourceState) -> AppError {
    AppError::NotFound(state.resource().to_string())
}

pub async fn list(State(state): State<ResourceState>) -> Result<impl IntoResponse, AppError> {
    let rows = state.accessor.find_all().await?;
    Ok(ok(rows))
}

pub async fn read(
    State(state): State<ResourceState>,
    RowId(id): RowId,
) -> Result<impl IntoResponse, AppError> {
    let row = state
        .accessor
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found(&state))?;
    Ok(ok(row))
}

pub async fn create(
    State(state): State<ResourceState>,
    RecordBody(record): RecordBody,
) -> Result<impl IntoResponse, AppError> {
    let row = state.accessor.create(&record).await?;
    tracing::debug!(resource = %state.resource(), "row created");
    Ok(created(row))
}

pub async fn update(
    State(state): State<ResourceState>,
    RowId(id): RowId,
    RecordBody(record): RecordBody,
) -> Result<impl IntoResponse, AppError> {
    let record = record.for_update()?;
    let row = state
        .accessor
        .update(id, &record)
        .await?
        .ok_or_else(|| not_found(&state))?;
    Ok(ok(row))
}

pub async fn delete(
    State(state): State<ResourceState>,
    RowId(id): RowId,
) -> Result<impl IntoResponse, AppError> {
    let row = state
        .accessor
        .remove(id)
        .await?
        .ok_or_else(|| not_found(&state))?;
    Ok(deleted(row))
}
