//! Store and engine configuration
//!
//! Definition checking belongs to the store, id handling to the engine, so
//! each reads only its own settings.

use std::env;

use crate::workflow::ValidationMode;

/// Default number of ids drawn before giving up on a colliding id source
pub const DEFAULT_MAX_ID_ATTEMPTS: u32 = 8;

/// Configuration for a definition store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreConfig {
    /// How submitted definitions are validated
    pub validation: ValidationMode,
}

impl StoreConfig {
    /// Create configuration from environment variables
    ///
    /// Environment variables:
    /// - `WAYPOINT_STRICT_DEFINITIONS`: `true`/`1` enables strict validation (default: lenient)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let strict = lookup("WAYPOINT_STRICT_DEFINITIONS")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        Self {
            validation: if strict {
                ValidationMode::Strict
            } else {
                ValidationMode::Lenient
            },
        }
    }

    /// Use strict definition validation
    pub fn strict(mut self) -> Self {
        self.validation = ValidationMode::Strict;
        self
    }
}

/// Configuration for the instance engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// How many fresh ids `start_instance` draws when the id source
    /// returns one that is already registered
    pub max_id_attempts: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_id_attempts: DEFAULT_MAX_ID_ATTEMPTS,
        }
    }
}

impl EngineConfig {
    /// Create configuration from environment variables
    ///
    /// Environment variables:
    /// - `WAYPOINT_MAX_ID_ATTEMPTS`: id draws per instance start (default: 8, minimum 1)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let max_id_attempts = lookup("WAYPOINT_MAX_ID_ATTEMPTS")
            .and_then(|s| s.parse().ok())
            .filter(|n: &u32| *n > 0)
            .unwrap_or(DEFAULT_MAX_ID_ATTEMPTS);

        Self { max_id_attempts }
    }

    /// Set how many ids are drawn per instance start
    pub fn with_max_id_attempts(mut self, attempts: u32) -> Self {
        self.max_id_attempts = attempts.max(1);
        self
    }
}
