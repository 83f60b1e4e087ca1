//! Server configuration
//!
//! Built-in defaults, overridden by `CATALOG_*` environment variables
//! (`CATALOG_BIND_ADDRESS`, `CATALOG_JWT_SECRET`, ...). List values such as
//! `CATALOG_ALLOWED_ORIGINS` are comma separated.

use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

/// Placeholder secret; startup warns when it is still in use
pub const DEFAULT_JWT_SECRET: &str = "change-me-in-production";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub app_name: String,
    pub bind_address: String,
    pub jwt_secret: String,
    pub access_token_expire_minutes: i64,
    /// Used when `RUST_LOG` is not set
    pub log_level: String,
    /// Requests allowed per client within one rate limit period
    pub rate_limit_requests: u32,
    pub rate_limit_period_secs: u64,
    /// `*` allows any origin
    pub allowed_origins: Vec<String>,
    /// Create the admin account and sample items on startup
    pub seed_demo_data: bool,
    pub admin_password: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            app_name: "Catalog API".to_string(),
            bind_address: "0.0.0.0:8000".to_string(),
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            access_token_expire_minutes: 30,
            log_level: "info".to_string(),
            rate_limit_requests: 100,
            rate_limit_period_secs: 60,
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:8080".to_string(),
            ],
            seed_demo_data: true,
            admin_password: "AdminPass123".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_environment(Environment::with_prefix("CATALOG"))
    }

    fn from_environment(env: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Config::try_from(&ServerConfig::default())?)
            .add_source(
                env.try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("allowed_origins"),
            )
            .build()?
            .try_deserialize()
    }

    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix("CATALOG").source(Some(source))
    }

    #[test]
    fn defaults_apply_without_environment() {
        let config = ServerConfig::from_environment(env(&[])).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:8000");
        assert_eq!(config.access_token_expire_minutes, 30);
        assert_eq!(config.rate_limit_requests, 100);
        assert!(config.seed_demo_data);
        assert!(config.uses_default_secret());
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = ServerConfig::from_environment(env(&[
            ("CATALOG_BIND_ADDRESS", "127.0.0.1:9000"),
            ("CATALOG_JWT_SECRET", "s3cret"),
            ("CATALOG_ACCESS_TOKEN_EXPIRE_MINUTES", "5"),
            ("CATALOG_SEED_DEMO_DATA", "false"),
            ("CATALOG_ALLOWED_ORIGINS", "https://a.dev,https://b.dev"),
        ]))
        .unwrap();

        assert_eq!(config.bind_address, "127.0.0.1:9000");
        assert_eq!(config.access_token_expire_minutes, 5);
        assert!(!config.seed_demo_data);
        assert!(!config.uses_default_secret());
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.dev".to_string(), "https://b.dev".to_string()]
        );
    }
}
