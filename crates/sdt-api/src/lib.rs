//! SDT API /v1: REST endpoints over the normalization pipeline
pub mod handlers;
pub mod metrics;
pub mod middleware;

use axum::{
    routing::{get, post},
    Router,
};
use chrono_tz::Tz;
use sdt_core::{parse_timezone, ConfigurationError, RequestContext};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use metrics::Metrics;

/// Default listen address
pub const DEFAULT_ADDR: &str = "0.0.0.0:8787";

/// Service settings read from the environment
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// `SDT_ADDR`
    pub addr: String,
    /// `SDT_TIMEZONE`: user timezone when a request names none
    pub timezone: Tz,
    /// `SDT_FIRST_DAY`: regional first day of week, 0 = Sunday
    pub first_day: u8,
    /// `SDT_LANG`
    pub language: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            timezone: Tz::UTC,
            first_day: 0,
            language: "en".to_string(),
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Read settings through `get`, so callers control where values come from
    pub fn from_env_with<F>(get: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let timezone = match var("SDT_TIMEZONE") {
            Some(name) => parse_timezone(&name)?,
            None => defaults.timezone,
        };
        let first_day = match var("SDT_FIRST_DAY") {
            Some(day) => day
                .parse::<u8>()
                .ok()
                .filter(|day| *day < 7)
                .ok_or_else(|| ConfigurationError::Settings(format!("SDT_FIRST_DAY must be 0-6, got '{}'", day)))?,
            None => defaults.first_day,
        };

        Ok(Self {
            addr: var("SDT_ADDR").unwrap_or(defaults.addr),
            timezone,
            first_day,
            language: var("SDT_LANG").unwrap_or(defaults.language),
        })
    }

    /// Context for one request, before per-request overrides
    pub fn request_context(&self) -> RequestContext {
        RequestContext::new(self.timezone)
            .with_first_day(self.first_day)
            .with_language(self.language.clone())
    }
}

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(config: ServiceConfig) -> Result<Self, prometheus::Error> {
        Ok(Self {
            config: Arc::new(config),
            metrics: Arc::new(Metrics::new()?),
        })
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/v1/health", get(handlers::health))
        .route("/v1/normalize", post(handlers::normalize))
        .route("/v1/picker", post(handlers::picker))
        .route("/metrics", get(handlers::metrics))
        .with_state(state)
        .layer(middleware::cors())
        .layer(TraceLayer::new_for_http())
}

pub async fn run(config: ServiceConfig) -> anyhow::Result<()> {
    let addr = config.addr.clone();
    let app = create_app(AppState::new(config)?);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("SDT API listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::from_env_with(env(&[])).unwrap();
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.addr, "0.0.0.0:8787");
    }

    #[test]
    fn test_overrides() {
        let config = ServiceConfig::from_env_with(env(&[
            ("SDT_ADDR", "127.0.0.1:9000"),
            ("SDT_TIMEZONE", "Europe/Warsaw"),
            ("SDT_FIRST_DAY", "1"),
            ("SDT_LANG", "pl"),
        ]))
        .unwrap();
        assert_eq!(config.addr, "127.0.0.1:9000");
        assert_eq!(config.timezone, chrono_tz::Europe::Warsaw);
        assert_eq!(config.request_context().first_day, 1);
        assert_eq!(config.request_context().language, "pl");
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            ServiceConfig::from_env_with(env(&[("SDT_TIMEZONE", "Mars/Olympus")])).unwrap_err(),
            ConfigurationError::UnknownTimezone("Mars/Olympus".to_string())
        );
        assert!(ServiceConfig::from_env_with(env(&[("SDT_FIRST_DAY", "7")])).is_err());
    }
}
