//! Reminder routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::app::AppState;
use crate::database::{CreateReminderRequest, Reminder};
use crate::error::Result;

#[derive(Debug, Deserialize)]
pub struct UpdateReminderRequest {
    pub enabled: bool,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Reminder>>> {
    Ok(Json(state.reminders.list_reminders().await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateReminderRequest>,
) -> Result<(StatusCode, Json<Reminder>)> {
    let reminder = state.reminders.create_reminder(req).await?;
    Ok((StatusCode::CREATED, Json(reminder)))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Reminder>> {
    Ok(Json(state.reminders.get_reminder(&id).await?))
}

/// Enable or disable a reminder.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateReminderRequest>,
) -> Result<Json<Reminder>> {
    Ok(Json(state.reminders.set_enabled(&id, req.enabled).await?))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode> {
    state.reminders.delete_reminder(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
