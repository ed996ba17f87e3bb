//! Crate entrypoint wiring together configuration, DB, rendering, and APIs.

pub mod api;
pub mod bind;
pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod service;
pub mod validation;

use bind::writer::ConfigWriter;
use config::AppConfig;
use db::Db;

use std::sync::Arc;

/// Complete application dependencies shared across handlers.
pub struct AppState {
    pub config: AppConfig,
    pub db: Db,
    pub writer: ConfigWriter,
}

impl AppState {
    pub fn new(config: AppConfig, db: Db) -> Self {
        let writer = config.writer();
        Self { config, db, writer }
    }
}

/// Arc-wrapped version of `AppState` passed into Axum extensions.
pub type SharedState = Arc<AppState>;
