mod cors;
mod server;

pub use cors::{parse_origins, CorsConfig, DEFAULT_ALLOWED_ORIGINS};
pub use server::ServerConfig;

use crate::error::{AppError, AppResult};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// `from_env` is this with `std::env::var`; tests pass a map instead so
    /// they never touch process-wide state.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_host = lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let server_port = lookup("SERVER_PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse()
            .map_err(|_| AppError::Configuration("Invalid SERVER_PORT".to_string()))?;

        // CORS config
        let allowed_origins = parse_origins(lookup("APP_CORS_ALLOWED_ORIGINS").as_deref());
        let require_origins = lookup("APP_CORS_REQUIRE_ORIGINS")
            .unwrap_or_else(|| "false".to_string())
            .parse()
            .map_err(|_| AppError::Configuration("Invalid APP_CORS_REQUIRE_ORIGINS".to_string()))?;

        let config = Config {
            server: ServerConfig {
                host: server_host,
                port: server_port,
            },
            cors: CorsConfig {
                allowed_origins,
                require_origins,
            },
        };

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> AppResult<()> {
        if self.server.host.trim().is_empty() {
            return Err(AppError::Configuration(
                "SERVER_HOST cannot be empty".to_string(),
            ));
        }

        self.cors.validate()
    }
}

impl CorsConfig {
    /// An empty origin list is only an error when explicitly requested.
    pub fn validate(&self) -> AppResult<()> {
        if self.require_origins && self.allowed_origins.is_empty() {
            return Err(AppError::Configuration(
                "APP_CORS_ALLOWED_ORIGINS is empty but APP_CORS_REQUIRE_ORIGINS is set".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(
            config.cors.allowed_origins,
            vec!["http://localhost:5173", "http://localhost:5174"]
        );
        assert!(!config.cors.require_origins);
    }

    #[test]
    fn test_origins_from_lookup() {
        let config = Config::from_lookup(lookup_from(&[(
            "APP_CORS_ALLOWED_ORIGINS",
            "https://bigsofa.example, https://admin.bigsofa.example",
        )]))
        .unwrap();

        assert_eq!(
            config.cors.allowed_origins,
            vec!["https://bigsofa.example", "https://admin.bigsofa.example"]
        );
    }

    #[test]
    fn test_set_but_empty_is_not_default() {
        let config =
            Config::from_lookup(lookup_from(&[("APP_CORS_ALLOWED_ORIGINS", "")])).unwrap();
        assert!(config.cors.allowed_origins.is_empty());
    }

    #[test]
    fn test_require_origins_rejects_empty_list() {
        let result = Config::from_lookup(lookup_from(&[
            ("APP_CORS_ALLOWED_ORIGINS", " , "),
            ("APP_CORS_REQUIRE_ORIGINS", "true"),
        ]));
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn test_invalid_port() {
        let result = Config::from_lookup(lookup_from(&[("SERVER_PORT", "not_a_port")]));
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn test_invalid_require_flag() {
        let result = Config::from_lookup(lookup_from(&[("APP_CORS_REQUIRE_ORIGINS", "yes")]));
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn test_empty_host_rejected() {
        let result = Config::from_lookup(lookup_from(&[("SERVER_HOST", "  ")]));
        assert!(result.is_err());
    }
}
