//! Librarium Library Management Service
//!
//! A Rust REST service for managing a small library: books, borrowers, and
//! the checkout/return ledger, with availability accounting derived from
//! the ledger.

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
