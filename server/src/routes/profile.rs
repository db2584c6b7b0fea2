//! Profile routes.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::app::AppState;
use crate::database::Profile;
use crate::error::Result;

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub display_name: String,
}

pub async fn get(State(state): State<AppState>) -> Result<Json<Profile>> {
    Ok(Json(state.goals.get_profile().await?))
}

pub async fn update(
    State(state): State<AppState>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<Profile>> {
    Ok(Json(state.goals.update_display_name(&req.display_name).await?))
}
