//! Journal routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::app::AppState;
use crate::database::{CreateJournalEntryRequest, JournalEntry, UpdateJournalEntryRequest};
use crate::error::Result;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<JournalEntry>>> {
    Ok(Json(state.journal.list_entries().await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateJournalEntryRequest>,
) -> Result<(StatusCode, Json<JournalEntry>)> {
    let entry = state.journal.create_entry(req).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<JournalEntry>> {
    Ok(Json(state.journal.get_entry(&id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateJournalEntryRequest>,
) -> Result<Json<JournalEntry>> {
    Ok(Json(state.journal.update_entry(&id, req).await?))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode> {
    state.journal.delete_entry(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
