use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

pub const DEFAULT_RESERVATIONS_URL: &str = "https://api.hospitable.com/v2/reservations";
pub const DEFAULT_INSIGHTS_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_INSIGHTS_MODEL: &str = "gemini-1.5-flash";

/// Deployment stage, taken from `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "production" | "prod" => Self::Production,
            "ci" | "test" => Self::Test,
            _ => Self::Development,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub upstream: UpstreamConfig,
}

impl AppConfig {
    /// Reads `.env` (if present) and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::parse(&env_or("APP_ENV", "development"));
        let port: u16 = env_or("APP_PORT", "3000")
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;
        let timeout_secs = env_or("UPSTREAM_TIMEOUT_SECS", "30")
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or(ConfigError::InvalidTimeout)?;

        Ok(Self {
            environment,
            server: ServerConfig {
                host: env_or("APP_HOST", "127.0.0.1"),
                port,
            },
            telemetry: TelemetryConfig {
                log_level: env_or("APP_LOG_LEVEL", "info"),
                ansi: environment == AppEnvironment::Development,
            },
            upstream: UpstreamConfig {
                reservations_url: env_or("RESERVATIONS_API_URL", DEFAULT_RESERVATIONS_URL),
                reservations_api_key: non_empty_var("RESERVATIONS_API_KEY"),
                insights_url: env_or("INSIGHTS_API_URL", DEFAULT_INSIGHTS_URL),
                insights_model: env_or("INSIGHTS_MODEL", DEFAULT_INSIGHTS_MODEL),
                insights_api_key: non_empty_var("INSIGHTS_API_KEY"),
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Bind address; `localhost` is resolved to the IPv4 loopback.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = match self.host.as_str() {
            host if host.eq_ignore_ascii_case("localhost") => IpAddr::from([127, 0, 0, 1]),
            host => host
                .parse::<IpAddr>()
                .map_err(|source| ConfigError::InvalidHost { source })?,
        };
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    /// Colourised output, only useful on an interactive terminal.
    pub ansi: bool,
}

/// Endpoints and credentials for the reservation and insight APIs. Keys stay
/// server-side; a missing key disables the matching proxy.
#[derive(Clone)]
pub struct UpstreamConfig {
    pub reservations_url: String,
    pub reservations_api_key: Option<String>,
    pub insights_url: String,
    pub insights_model: String,
    pub insights_api_key: Option<String>,
    pub timeout: Duration,
}

impl UpstreamConfig {
    pub fn http_client(&self) -> Result<reqwest::Client, ConfigError> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|source| ConfigError::HttpClient { source })
    }
}

impl fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |key: &Option<String>| key.as_ref().map(|_| "<redacted>");
        f.debug_struct("UpstreamConfig")
            .field("reservations_url", &self.reservations_url)
            .field("reservations_api_key", &redact(&self.reservations_api_key))
            .field("insights_url", &self.insights_url)
            .field("insights_model", &self.insights_model)
            .field("insights_api_key", &redact(&self.insights_api_key))
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidTimeout,
    HttpClient { source: reqwest::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT is not a port number (0-65535)"),
            ConfigError::InvalidHost { source } => {
                write!(f, "APP_HOST is not an IP address or localhost: {source}")
            }
            ConfigError::InvalidTimeout => {
                write!(f, "UPSTREAM_TIMEOUT_SECS must be a positive number of seconds")
            }
            ConfigError::HttpClient { source } => {
                write!(f, "unable to build upstream HTTP client: {}", source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidTimeout => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::HttpClient { source } => Some(source),
        }
    }
}
