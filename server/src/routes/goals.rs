//! Goal routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::app::AppState;
use crate::database::{CreateGoalRequest, Goal, GoalProgress};
use crate::error::Result;
use crate::services::GoalPartition;

/// Body of a progress update.
#[derive(Debug, Deserialize)]
pub struct ProgressRequest {
    pub increment: i64,
}

/// Goals split into active, completed and expired.
pub async fn list(State(state): State<AppState>) -> Result<Json<GoalPartition>> {
    Ok(Json(state.goals.partitioned_goals().await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateGoalRequest>,
) -> Result<(StatusCode, Json<Goal>)> {
    let goal = state.goals.add_goal(req).await?;
    Ok((StatusCode::CREATED, Json(goal)))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Goal>> {
    Ok(Json(state.goals.get_goal(&id).await?))
}

pub async fn progress(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ProgressRequest>,
) -> Result<Json<GoalProgress>> {
    let progress = state.goals.update_goal_progress(&id, req.increment).await?;
    Ok(Json(progress))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode> {
    state.goals.delete_goal(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
