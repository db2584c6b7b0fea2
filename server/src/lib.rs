//! Habitual library
//!
//! Habit, goal and journal tracking exposed as a JSON API over SQLite,
//! with scheduled reminders and missed-day notices.

pub mod app;
pub mod config;
pub mod database;
pub mod error;
pub mod routes;
pub mod services;
pub mod streaks;
pub mod validation;
