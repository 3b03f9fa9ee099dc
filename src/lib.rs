//! Local Library catalog server
//!
//! A REST JSON API for a lending library catalog: authors, genres, books
//! and the physical copies on loan, with referential-integrity checks on
//! delete and a validate-then-persist pipeline on every write.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod validation;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
