// API module - HTTP route handlers

pub mod common;
pub mod definitions;
pub mod error;
pub mod health;
pub mod instances;

pub use common::{ErrorResponse, ListResponse};
pub use error::ApiError;

use std::sync::Arc;
use waypoint_engine::{InMemoryDefinitionStore, InstanceEngine};

/// Engine type served over HTTP
pub type Engine = InstanceEngine<InMemoryDefinitionStore>;

/// App state shared across routes
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
    /// Prefix the API routes are mounted under, used for Location headers
    pub api_prefix: String,
}

impl AppState {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self {
            engine,
            api_prefix: String::new(),
        }
    }

    pub fn with_prefix(mut self, api_prefix: impl Into<String>) -> Self {
        self.api_prefix = api_prefix.into();
        self
    }

    pub(crate) fn location(&self, path: &str) -> String {
        format!("{}{}", self.api_prefix, path)
    }
}
