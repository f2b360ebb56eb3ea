use std::sync::Arc;

pub mod config;
pub mod database;
pub mod error;
pub mod grid;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

pub use config::Config;
pub use database::{KeyValueStore, PresetRepository};
pub use services::{RosterService, ScheduleService, SessionStore};

/// Shared services handed to every worker.
#[derive(Clone)]
pub struct AppState {
    pub roster: RosterService,
    pub presets: PresetRepository,
}

impl AppState {
    pub fn new(
        config: &Config,
        store: Arc<dyn KeyValueStore>,
        scheduler: Arc<dyn ScheduleService>,
    ) -> Self {
        let presets = PresetRepository::new(store);
        let sessions = SessionStore::new(config.session_ttl(), config.max_sessions);

        Self {
            roster: RosterService::new(sessions, scheduler, presets.clone()),
            presets,
        }
    }
}
