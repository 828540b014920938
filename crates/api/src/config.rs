//! Process configuration, read from the environment (optionally via `.env`).

use axum::http::HeaderValue;
use thiserror::Error;

use technia_observability::LogFormat;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set when USE_PERSISTENT_STORES=true")]
    Missing(&'static str),

    #[error("invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Where records live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// Process memory, seeded with demo data.
    InMemory,
    Postgres { database_url: String, max_connections: u32 },
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub backend: StoreBackend,
    pub cors_allowed_origin: HeaderValue,
    pub log_format: LogFormat,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            backend: StoreBackend::InMemory,
            cors_allowed_origin: HeaderValue::from_static("http://localhost:5173"),
            log_format: LogFormat::Json,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Unset or blank variables take
    /// their defaults.
    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| get(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let host = var("API_HOST").unwrap_or(defaults.host);
        let port = match var("API_PORT") {
            Some(v) => v.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: "API_PORT",
                reason: e.to_string(),
            })?,
            None => defaults.port,
        };

        let persistent = var("USE_PERSISTENT_STORES")
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        let backend = if persistent {
            let database_url = var("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
            let max_connections = match var("DB_MAX_CONNECTIONS") {
                Some(v) => v.trim().parse::<u32>().map_err(|e| ConfigError::Invalid {
                    name: "DB_MAX_CONNECTIONS",
                    reason: e.to_string(),
                })?,
                None => 5,
            };
            StoreBackend::Postgres {
                database_url,
                max_connections,
            }
        } else {
            StoreBackend::InMemory
        };

        let cors_allowed_origin = match var("CORS_ALLOWED_ORIGIN") {
            Some(v) => HeaderValue::from_str(v.trim()).map_err(|e| ConfigError::Invalid {
                name: "CORS_ALLOWED_ORIGIN",
                reason: e.to_string(),
            })?,
            None => defaults.cors_allowed_origin,
        };

        let log_format = match var("LOG_FORMAT") {
            Some(v) => v
                .parse::<LogFormat>()
                .map_err(|reason| ConfigError::Invalid {
                    name: "LOG_FORMAT",
                    reason,
                })?,
            None => defaults.log_format,
        };

        Ok(Self {
            host,
            port,
            backend,
            cors_allowed_origin,
            log_format,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from(vars: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults_to_in_memory_on_port_8000() {
        let cfg = from(&[]).unwrap();
        assert_eq!(cfg.bind_addr(), "0.0.0.0:8000");
        assert_eq!(cfg.backend, StoreBackend::InMemory);
        assert_eq!(cfg.cors_allowed_origin, "http://localhost:5173");
        assert_eq!(cfg.log_format, LogFormat::Json);
    }

    #[test]
    fn persistent_stores_need_a_database_url() {
        assert!(matches!(
            from(&[("USE_PERSISTENT_STORES", "true")]),
            Err(ConfigError::Missing("DATABASE_URL"))
        ));

        let cfg = from(&[
            ("USE_PERSISTENT_STORES", "TRUE"),
            ("DATABASE_URL", "postgres://localhost/technia"),
        ])
        .unwrap();
        assert_eq!(
            cfg.backend,
            StoreBackend::Postgres {
                database_url: "postgres://localhost/technia".to_string(),
                max_connections: 5,
            }
        );
    }

    #[test]
    fn malformed_values_are_reported_by_name() {
        let err = from(&[("API_PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("API_PORT"));

        let err = from(&[("LOG_FORMAT", "xml")]).unwrap_err();
        assert!(err.to_string().contains("LOG_FORMAT"));
    }
}
