//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `MONGODB_URI` - MongoDB connection string (may name a database in its path)
//!
//! ## Optional
//! - `MONGODB_DATABASE` - Database holding the analytics collections
//!   (default: the database named in `MONGODB_URI`)
//! - `SHOPSIGHT_HOST` - Bind address (default: 0.0.0.0)
//! - `SHOPSIGHT_PORT` - Listen port, falls back to `PORT` (default: 8000)
//! - `SHOPSIGHT_ALLOWED_ORIGIN` - Origin allowed by CORS
//!   (default: <https://shopify-front-one.vercel.app>)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Sentry traces sample rate (default: 1.0)

use std::net::{IpAddr, SocketAddr};

use axum::http::HeaderValue;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_ALLOWED_ORIGIN: &str = "https://shopify-front-one.vercel.app";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// API application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// MongoDB connection string (contains credentials)
    pub mongodb_uri: SecretString,
    /// Database name override; `None` defers to the connection string
    pub database: Option<String>,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Origin the CORS layer allows
    pub allowed_origin: HeaderValue,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or fail to
    /// parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let mongodb_uri = get_required_env("MONGODB_URI").map(SecretString::from)?;
        let database = get_optional_env("MONGODB_DATABASE");
        let host = get_env_or_default("SHOPSIGHT_HOST", "0.0.0.0")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SHOPSIGHT_HOST".to_string(), e.to_string())
            })?;
        let port = get_port()?;
        let allowed_origin =
            parse_origin(&get_env_or_default("SHOPSIGHT_ALLOWED_ORIGIN", DEFAULT_ALLOWED_ORIGIN))
                .map_err(|reason| {
                    ConfigError::InvalidEnvVar("SHOPSIGHT_ALLOWED_ORIGIN".to_string(), reason)
                })?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            mongodb_uri,
            database,
            host,
            port,
            allowed_origin,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get the listen port, with fallback to the generic `PORT` variable set by
/// most hosting platforms.
fn get_port() -> Result<u16, ConfigError> {
    for key in ["SHOPSIGHT_PORT", "PORT"] {
        if let Ok(value) = std::env::var(key) {
            return value
                .parse::<u16>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()));
        }
    }
    Ok(DEFAULT_PORT)
}

/// Parse and normalize a CORS origin.
///
/// Accepts an absolute `http` or `https` URL and reduces it to its origin
/// (scheme, host, and any non-default port), so a trailing path or slash in
/// the variable does not break origin matching.
fn parse_origin(value: &str) -> Result<HeaderValue, String> {
    let url = Url::parse(value).map_err(|e| e.to_string())?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(format!("unsupported scheme {:?}", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err("origin must have a host".to_string());
    }
    HeaderValue::from_str(&url.origin().ascii_serialization()).map_err(|e| e.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origin_plain() {
        let origin = parse_origin("https://shopify-front-one.vercel.app").unwrap();
        assert_eq!(origin, "https://shopify-front-one.vercel.app");
    }

    #[test]
    fn test_parse_origin_strips_path_and_slash() {
        let origin = parse_origin("https://dashboard.example.com/some/path/").unwrap();
        assert_eq!(origin, "https://dashboard.example.com");
    }

    #[test]
    fn test_parse_origin_keeps_explicit_port() {
        let origin = parse_origin("http://localhost:3000").unwrap();
        assert_eq!(origin, "http://localhost:3000");
    }

    #[test]
    fn test_parse_origin_rejects_non_http_scheme() {
        assert!(parse_origin("ftp://example.com").is_err());
        assert!(parse_origin("localhost:3000").is_err());
    }

    #[test]
    fn test_parse_origin_rejects_garbage() {
        assert!(parse_origin("not a url").is_err());
        assert!(parse_origin("").is_err());
    }

    #[test]
    fn test_default_allowed_origin_parses() {
        assert!(parse_origin(DEFAULT_ALLOWED_ORIGIN).is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            mongodb_uri: SecretString::from("mongodb://localhost:27017/shopsight"),
            database: None,
            host: "0.0.0.0".parse().unwrap(),
            port: 8000,
            allowed_origin: HeaderValue::from_static("https://shopify-front-one.vercel.app"),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "0.0.0.0");
        assert_eq!(addr.port(), 8000);
    }
}
