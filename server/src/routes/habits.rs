//! Habit routes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::app::AppState;
use crate::database::{
    CreateHabitRequest, Habit, HabitCompletion, HabitWithStatus, UpdateHabitRequest,
};
use crate::error::Result;
use crate::services::HabitStats;

/// Query string for the habit list.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub include_archived: bool,
}

/// Body of a toggle request: the state the client currently shows.
#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub is_currently_completed: bool,
}

/// Body of a reminder update.
#[derive(Debug, Deserialize)]
pub struct ReminderRequest {
    pub enabled: bool,
    #[serde(default)]
    pub time: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<HabitWithStatus>>> {
    let habits = state.habits.list_habits(query.include_archived).await?;
    Ok(Json(habits))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateHabitRequest>,
) -> Result<(StatusCode, Json<Habit>)> {
    let habit = state.habits.add_habit(req).await?;
    Ok((StatusCode::CREATED, Json(habit)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HabitWithStatus>> {
    Ok(Json(state.habits.get_habit(&id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateHabitRequest>,
) -> Result<Json<Habit>> {
    Ok(Json(state.habits.update_habit(&id, req).await?))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode> {
    state.habits.delete_habit(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Check a habit in or out for today.
pub async fn toggle(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ToggleRequest>,
) -> Result<Json<HabitWithStatus>> {
    let habit = state
        .habits
        .toggle_habit(&id, req.is_currently_completed)
        .await?;
    Ok(Json(habit))
}

pub async fn archive(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Habit>> {
    Ok(Json(state.habits.archive_habit(&id).await?))
}

pub async fn restore(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Habit>> {
    Ok(Json(state.habits.restore_habit(&id).await?))
}

pub async fn update_reminder(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ReminderRequest>,
) -> Result<Json<Habit>> {
    let habit = state
        .habits
        .update_reminder(&id, req.enabled, req.time)
        .await?;
    Ok(Json(habit))
}

pub async fn stats(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<HabitStats>> {
    Ok(Json(state.habits.habit_stats(&id).await?))
}

pub async fn completions(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<HabitCompletion>>> {
    Ok(Json(state.habits.completion_history(&id).await?))
}
