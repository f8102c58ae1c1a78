//! Server configuration from the environment

use pdfbook_core::converter::{ConverterSettings, DEFAULT_TIMEOUT};
use std::fmt::Display;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_MAX_UPLOAD_MB: usize = 64;

/// Origins allowed by the development CORS default
pub const DEV_ORIGINS: [&str; 4] = [
    "http://localhost:3000",
    "http://localhost:5173",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:5173",
];

/// Which origins may call the API from a browser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

impl Default for CorsOrigins {
    fn default() -> Self {
        CorsOrigins::List(DEV_ORIGINS.iter().map(|s| s.to_string()).collect())
    }
}

impl CorsOrigins {
    /// `*` for any origin, otherwise a comma-separated list
    pub fn parse(value: &str) -> Self {
        if value.trim() == "*" {
            return CorsOrigins::Any;
        }
        CorsOrigins::List(
            value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        )
    }
}

/// Runtime settings of the HTTP server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub converter: ConverterSettings,

    /// Largest accepted request body, in bytes
    pub max_upload_bytes: usize,

    pub cors_origins: CorsOrigins,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            converter: ConverterSettings::default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
            cors_origins: CorsOrigins::default(),
        }
    }
}

impl ServerConfig {
    /// Read `PDFBOOK_*` variables from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any variable source
    ///
    /// Values that fail to parse are logged and replaced by their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let bind = parse_or(&lookup, "PDFBOOK_BIND", defaults.bind);
        let timeout_secs = parse_or(
            &lookup,
            "PDFBOOK_CONVERTER_TIMEOUT_SECS",
            DEFAULT_TIMEOUT.as_secs(),
        );
        let max_upload_mb = parse_or(&lookup, "PDFBOOK_MAX_UPLOAD_MB", DEFAULT_MAX_UPLOAD_MB);

        let workspace_root = lookup("PDFBOOK_WORKSPACE_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        let cors_origins = lookup("PDFBOOK_CORS_ORIGINS")
            .map(|value| CorsOrigins::parse(&value))
            .unwrap_or(defaults.cors_origins);

        Self {
            bind,
            converter: ConverterSettings {
                timeout: Duration::from_secs(timeout_secs),
                workspace_root,
            },
            max_upload_bytes: max_upload_mb.saturating_mul(1024 * 1024),
            cors_origins,
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(
                    %key,
                    value = %raw,
                    error = %e,
                    "Invalid setting, using {}",
                    default
                );
                default
            }
        },
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert_eq!(config.bind.to_string(), DEFAULT_BIND);
        assert_eq!(config.converter.timeout, Duration::from_secs(300));
        assert_eq!(config.converter.workspace_root, None);
        assert_eq!(config.max_upload_bytes, 64 * 1024 * 1024);
        assert_eq!(config.cors_origins, CorsOrigins::default());
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("PDFBOOK_BIND", "0.0.0.0:8080"),
            ("PDFBOOK_CONVERTER_TIMEOUT_SECS", "45"),
            ("PDFBOOK_WORKSPACE_DIR", "/var/tmp/pdfbook"),
            ("PDFBOOK_MAX_UPLOAD_MB", "8"),
            ("PDFBOOK_CORS_ORIGINS", "https://a.example, https://b.example,"),
        ]);
        assert_eq!(config.bind.port(), 8080);
        assert_eq!(config.converter.timeout, Duration::from_secs(45));
        assert_eq!(
            config.converter.workspace_root,
            Some(PathBuf::from("/var/tmp/pdfbook"))
        );
        assert_eq!(config.max_upload_bytes, 8 * 1024 * 1024);
        assert_eq!(
            config.cors_origins,
            CorsOrigins::List(vec![
                "https://a.example".to_string(),
                "https://b.example".to_string()
            ])
        );
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config(&[
            ("PDFBOOK_BIND", "not-an-address"),
            ("PDFBOOK_CONVERTER_TIMEOUT_SECS", "-1"),
            ("PDFBOOK_MAX_UPLOAD_MB", "lots"),
            ("PDFBOOK_WORKSPACE_DIR", "  "),
        ]);
        assert_eq!(config.bind.to_string(), DEFAULT_BIND);
        assert_eq!(config.converter.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.max_upload_bytes, 64 * 1024 * 1024);
        assert_eq!(config.converter.workspace_root, None);
    }

    #[test]
    fn test_cors_wildcard() {
        assert_eq!(CorsOrigins::parse(" * "), CorsOrigins::Any);
    }
}
