//! Route handlers for the JSON API.

pub mod daily_goals;
pub mod goals;
pub mod habits;
pub mod health;
pub mod journal;
pub mod profile;
pub mod reminders;
pub mod settings;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::app::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health))
        // Habits
        .route("/api/habits", get(habits::list).post(habits::create))
        .route(
            "/api/habits/:id",
            get(habits::get).patch(habits::update).delete(habits::delete),
        )
        .route("/api/habits/:id/toggle", post(habits::toggle))
        .route("/api/habits/:id/archive", post(habits::archive))
        .route("/api/habits/:id/restore", post(habits::restore))
        .route("/api/habits/:id/reminder", put(habits::update_reminder))
        .route("/api/habits/:id/stats", get(habits::stats))
        .route("/api/habits/:id/completions", get(habits::completions))
        // Goals and profile
        .route("/api/goals", get(goals::list).post(goals::create))
        .route("/api/goals/:id", get(goals::get).delete(goals::delete))
        .route("/api/goals/:id/progress", post(goals::progress))
        .route("/api/profile", get(profile::get).patch(profile::update))
        // Daily goals
        .route(
            "/api/daily-goals",
            get(daily_goals::list).post(daily_goals::create),
        )
        .route(
            "/api/daily-goals/:id",
            get(daily_goals::get)
                .patch(daily_goals::update)
                .delete(daily_goals::delete),
        )
        .route(
            "/api/daily-goals/:id/logs",
            get(daily_goals::logs).post(daily_goals::log_day),
        )
        .route("/api/daily-goals/:id/reminder", put(daily_goals::set_reminder))
        // Journal
        .route("/api/journal", get(journal::list).post(journal::create))
        .route(
            "/api/journal/:id",
            get(journal::get).patch(journal::update).delete(journal::delete),
        )
        // Reminders
        .route("/api/reminders", get(reminders::list).post(reminders::create))
        .route(
            "/api/reminders/:id",
            get(reminders::get)
                .patch(reminders::update)
                .delete(reminders::delete),
        )
        // Settings
        .route("/api/settings", get(settings::get).put(settings::replace))
}

/// Router with state and request tracing attached.
pub fn app(state: AppState) -> Router {
    router().layer(TraceLayer::new_for_http()).with_state(state)
}
