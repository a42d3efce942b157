pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod services;
pub mod startup;

use services::generation::GenerationService;
use std::sync::Arc;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub settings: config::Settings,
    pub generation: Arc<GenerationService>,
}

impl AppState {
    pub fn new(settings: config::Settings, generation: Arc<GenerationService>) -> Self {
        Self {
            settings,
            generation,
        }
    }
}
