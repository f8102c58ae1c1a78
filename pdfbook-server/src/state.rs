//! Application state

use crate::config::ServerConfig;
use pdfbook_core::ConversionService;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Conversion orchestrator shared by all requests
    pub service: Arc<ConversionService>,

    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(service: ConversionService, config: ServerConfig) -> Self {
        Self {
            service: Arc::new(service),
            config: Arc::new(config),
        }
    }
}
