//! Daily goal routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::database::{CreateDailyGoalRequest, DailyGoal, DailyGoalLog};
use crate::error::Result;
use crate::services::daily_goals::LogDayRequest;

/// A logged day together with the refreshed goal.
#[derive(Debug, Serialize)]
pub struct LogDayResponse {
    pub goal: DailyGoal,
    pub log: DailyGoalLog,
}

#[derive(Debug, Deserialize)]
pub struct ReminderRequest {
    /// `HH:MM`, or null to remove the reminder
    #[serde(default)]
    pub time: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub is_active: bool,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<DailyGoal>>> {
    Ok(Json(state.daily_goals.list_daily_goals().await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateDailyGoalRequest>,
) -> Result<(StatusCode, Json<DailyGoal>)> {
    let goal = state.daily_goals.create_daily_goal(req).await?;
    Ok((StatusCode::CREATED, Json(goal)))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<DailyGoal>> {
    Ok(Json(state.daily_goals.get_daily_goal(&id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateRequest>,
) -> Result<Json<DailyGoal>> {
    Ok(Json(state.daily_goals.set_active(&id, req.is_active).await?))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode> {
    state.daily_goals.delete_daily_goal(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn logs(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<DailyGoalLog>>> {
    Ok(Json(state.daily_goals.list_logs(&id).await?))
}

pub async fn log_day(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<LogDayRequest>,
) -> Result<Json<LogDayResponse>> {
    let (goal, log) = state.daily_goals.log_day(&id, req).await?;
    Ok(Json(LogDayResponse { goal, log }))
}

pub async fn set_reminder(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ReminderRequest>,
) -> Result<Json<DailyGoal>> {
    Ok(Json(state.daily_goals.set_reminder(&id, req.time).await?))
}
