use crate::vetting::FlexibilityLevel;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Rows evaluated per batch unless `APP_BATCH_LIMIT` says otherwise.
pub const DEFAULT_BATCH_LIMIT: usize = 100;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub vetting: VettingSettings,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let flexibility_level = match env::var("APP_FLEXIBILITY_LEVEL") {
            Ok(raw) => parse_flexibility(&raw)?,
            Err(_) => FlexibilityLevel::default(),
        };

        let batch_limit = match env::var("APP_BATCH_LIMIT") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|limit| *limit > 0)
                .ok_or(ConfigError::InvalidBatchLimit)?,
            Err(_) => DEFAULT_BATCH_LIMIT,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            vetting: VettingSettings {
                flexibility_level,
                batch_limit,
            },
        })
    }
}

fn parse_flexibility(raw: &str) -> Result<FlexibilityLevel, ConfigError> {
    raw.trim()
        .parse::<u8>()
        .ok()
        .and_then(FlexibilityLevel::new)
        .ok_or(ConfigError::InvalidFlexibility)
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Batch defaults applied when a request does not carry its own.
#[derive(Debug, Clone, Copy)]
pub struct VettingSettings {
    pub flexibility_level: FlexibilityLevel,
    pub batch_limit: usize,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidFlexibility,
    InvalidBatchLimit,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidFlexibility => {
                write!(f, "APP_FLEXIBILITY_LEVEL must be an integer between 1 and 10")
            }
            ConfigError::InvalidBatchLimit => {
                write!(f, "APP_BATCH_LIMIT must be a positive integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidFlexibility
            | ConfigError::InvalidBatchLimit => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("APP_FLEXIBILITY_LEVEL");
        env::remove_var("APP_BATCH_LIMIT");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.vetting.flexibility_level, FlexibilityLevel::default());
        assert_eq!(config.vetting.batch_limit, DEFAULT_BATCH_LIMIT);
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn reads_flexibility_and_batch_limit() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_FLEXIBILITY_LEVEL", " 8 ");
        env::set_var("APP_BATCH_LIMIT", "250");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.vetting.flexibility_level.get(), 8);
        assert_eq!(config.vetting.batch_limit, 250);
        reset_env();
    }

    #[test]
    fn rejects_out_of_range_flexibility() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_FLEXIBILITY_LEVEL", "11");
        let error = AppConfig::load().expect_err("level 11 is invalid");
        assert!(matches!(error, ConfigError::InvalidFlexibility));

        env::set_var("APP_FLEXIBILITY_LEVEL", "5");
        env::set_var("APP_BATCH_LIMIT", "0");
        let error = AppConfig::load().expect_err("zero batch limit is invalid");
        assert!(matches!(error, ConfigError::InvalidBatchLimit));
        reset_env();
    }
}
