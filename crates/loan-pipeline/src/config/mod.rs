use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::workflows::statement::CompletionStatus;
use crate::workflows::underwriting::UnderwritingPolicy;

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
    pub pipeline: PipelineConfig,
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(&var_or("APP_ENV", "development"));

        let host = var_or("APP_HOST", "127.0.0.1");
        let port = var_or("APP_PORT", "3000")
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = var_or("APP_LOG_LEVEL", "info");

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            pipeline: PipelineConfig::from_env()?,
        })
    }
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

/// Annual base rates above this percentage are refused at load time.
const MAX_BASE_RATE: Decimal = dec!(100);

/// Pricing and collaborator settings for the loan pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub base_rate: Decimal,
    pub upstream_timeout: Duration,
    pub upstream_retries: u32,
    pub completion: CompletionStatus,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            base_rate: UnderwritingPolicy::default().base_rate,
            upstream_timeout: Duration::from_millis(5000),
            upstream_retries: 0,
            completion: CompletionStatus::CreditIssued,
        }
    }
}

impl PipelineConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let base_rate = match env::var("PIPELINE_BASE_RATE") {
            Ok(value) => value
                .trim()
                .parse::<Decimal>()
                .ok()
                .filter(|rate| !rate.is_sign_negative() && *rate <= MAX_BASE_RATE)
                .ok_or(ConfigError::InvalidBaseRate { value })?,
            Err(_) => defaults.base_rate,
        };

        let upstream_timeout = match env::var("PIPELINE_UPSTREAM_TIMEOUT_MS") {
            Ok(value) => value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|millis| *millis > 0)
                .map(Duration::from_millis)
                .ok_or(ConfigError::InvalidUpstreamTimeout { value })?,
            Err(_) => defaults.upstream_timeout,
        };

        let upstream_retries = match env::var("PIPELINE_UPSTREAM_RETRIES") {
            Ok(value) => value
                .trim()
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidUpstreamRetries { value })?,
            Err(_) => defaults.upstream_retries,
        };

        let completion = match env::var("PIPELINE_COMPLETION_STATUS") {
            Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
                "credit_issued" => CompletionStatus::CreditIssued,
                "cc_approved" => CompletionStatus::CcApproved,
                _ => return Err(ConfigError::InvalidCompletionStatus { value }),
            },
            Err(_) => defaults.completion,
        };

        Ok(Self {
            base_rate,
            upstream_timeout,
            upstream_retries,
            completion,
        })
    }

    /// Underwriting thresholds with the configured base rate.
    pub fn policy(&self) -> UnderwritingPolicy {
        UnderwritingPolicy {
            base_rate: self.base_rate,
            ..UnderwritingPolicy::default()
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidBaseRate { value: String },
    InvalidUpstreamTimeout { value: String },
    InvalidUpstreamRetries { value: String },
    InvalidCompletionStatus { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidBaseRate { value } => {
                write!(f, "PIPELINE_BASE_RATE must be a decimal from 0 to 100, got '{value}'")
            }
            ConfigError::InvalidUpstreamTimeout { value } => write!(
                f,
                "PIPELINE_UPSTREAM_TIMEOUT_MS must be a positive integer, got '{value}'"
            ),
            ConfigError::InvalidUpstreamRetries { value } => write!(
                f,
                "PIPELINE_UPSTREAM_RETRIES must be a non-negative integer, got '{value}'"
            ),
            ConfigError::InvalidCompletionStatus { value } => write!(
                f,
                "PIPELINE_COMPLETION_STATUS must be credit_issued or cc_approved, got '{value}'"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
