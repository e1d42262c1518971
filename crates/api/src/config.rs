// API server configuration
// Decision: Environment only; a .env file is loaded by main before this is read

use std::env;

use waypoint_engine::{EngineConfig, StoreConfig};

/// Default listen address for the HTTP server
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:9000";

/// Configuration for the HTTP server
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Socket address to bind (`WAYPOINT_BIND_ADDR`)
    pub bind_addr: String,
    /// Prefix for all API routes (`API_PREFIX`), e.g. "/api" gives /api/v1/...
    pub api_prefix: String,
    /// Origins allowed by CORS (`CORS_ALLOWED_ORIGINS`, comma separated).
    /// Empty means same-origin requests only.
    pub cors_allowed_origins: Vec<String>,
    pub store: StoreConfig,
    pub engine: EngineConfig,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(
            |key| env::var(key).ok(),
            StoreConfig::from_env(),
            EngineConfig::from_env(),
        )
    }

    fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        store: StoreConfig,
        engine: EngineConfig,
    ) -> Self {
        let bind_addr = lookup("WAYPOINT_BIND_ADDR")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        // Normalized to "" or "/segment" (nest requires a leading slash)
        let api_prefix = lookup("API_PREFIX")
            .map(|p| p.trim().trim_matches('/').to_string())
            .filter(|p| !p.is_empty())
            .map(|p| format!("/{}", p))
            .unwrap_or_default();

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            bind_addr,
            api_prefix,
            cors_allowed_origins,
            store,
            engine,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> ApiConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(
            |key| vars.get(key).cloned(),
            StoreConfig::default(),
            EngineConfig::default(),
        )
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.api_prefix, "");
        assert!(config.cors_allowed_origins.is_empty());
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("WAYPOINT_BIND_ADDR", "127.0.0.1:8080"),
            ("API_PREFIX", "/api/"),
            (
                "CORS_ALLOWED_ORIGINS",
                "https://a.example.com, https://b.example.com,",
            ),
        ]);
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.api_prefix, "/api");
        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://a.example.com", "https://b.example.com"]
        );
    }

    #[test]
    fn test_prefix_normalized() {
        assert_eq!(config(&[("API_PREFIX", "api")]).api_prefix, "/api");
        assert_eq!(config(&[("API_PREFIX", "/")]).api_prefix, "");
    }
}
