//! Pustaka library desk
//!
//! A small library-management server: staff register books and members,
//! move books through borrow/reserve/return states, and keep a borrow/return
//! history log. Collections are persisted as JSON array files.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
