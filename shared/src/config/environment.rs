//! Deployment environment and the log output each one gets

use serde::{Deserialize, Serialize};
use std::env;

/// Where the credential services are running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn name(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }

    /// The development JWT secret is refused here
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    /// Reads `ENVIRONMENT`; unset or unrecognised values mean development
    pub fn from_env() -> Self {
        env::var("ENVIRONMENT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    /// Dotenv file loaded ahead of `.env`
    pub fn dotenv_file(&self) -> String {
        format!(".env.{}", self.name())
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" | "stage" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("Unknown environment: {}", other)),
        }
    }
}

/// Subscriber settings consumed by [`crate::logging::init`]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,

    /// ANSI colours in pretty and compact output
    #[serde(default)]
    pub ansi: bool,

    /// File and line of each event
    #[serde(default)]
    pub source_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl LoggingConfig {
    /// Development logs every refresh attempt in colour; deployed
    /// environments emit JSON lines for the log shipper.
    pub fn for_environment(environment: Environment) -> Self {
        let (level, format) = match environment {
            Environment::Development => ("debug", LogFormat::Pretty),
            Environment::Staging => ("info", LogFormat::Json),
            Environment::Production => ("info,ba_core=warn", LogFormat::Json),
        };

        Self {
            level: level.to_string(),
            format,
            ansi: format != LogFormat::Json,
            source_location: !environment.is_production(),
        }
    }

    /// Environment defaults, overridden by `LOG_LEVEL` and `LOG_FORMAT`
    pub fn from_env(environment: Environment) -> Self {
        let mut config = Self::for_environment(environment);
        if let Ok(level) = env::var("LOG_LEVEL") {
            config.level = level;
        }
        if let Some(format) = env::var("LOG_FORMAT").ok().and_then(|f| f.parse().ok()) {
            config.format = format;
            config.ansi = format != LogFormat::Json;
        }
        config
    }
}

/// Output layout of log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            other => Err(format!("Unknown log format: {}", other)),
        }
    }
}
