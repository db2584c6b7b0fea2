//! Settings routes.

use axum::extract::State;
use axum::Json;

use crate::app::AppState;
use crate::error::Result;
use crate::services::AppSettings;

pub async fn get(State(state): State<AppState>) -> Result<Json<AppSettings>> {
    Ok(Json(state.settings.load().await?))
}

/// Replace all settings; rejected settings leave the file untouched.
pub async fn replace(
    State(state): State<AppState>,
    Json(settings): Json<AppSettings>,
) -> Result<Json<AppSettings>> {
    Ok(Json(state.settings.update(settings).await?))
}
