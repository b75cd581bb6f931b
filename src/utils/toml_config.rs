//! TOML-based configuration for Portcullis
//!
//! Configuration is read once at startup from `portcullis.toml`. Secrets never
//! live in the file itself: the file names the environment variables that hold
//! them, and [`AppConfig::load`] resolves and validates those before anything
//! else starts.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Minimum signing secret length accepted in production.
pub const MIN_PRODUCTION_SECRET_LEN: usize = 32;

/// Longest accepted token lifetime: one year.
pub const MAX_TOKEN_VALIDITY_SECS: u64 = 365 * 24 * 60 * 60;

/// Root configuration structure loaded from portcullis.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Defaults to `json` in production and `pretty` elsewhere.
    #[serde(default)]
    pub log_format: Option<LogFormat>,

    #[serde(default)]
    pub environment: Environment,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: None,
            environment: Environment::default(),
        }
    }
}

impl ServerConfig {
    pub fn effective_log_format(&self) -> LogFormat {
        match (self.log_format, self.environment) {
            (Some(format), _) => format,
            (None, Environment::Production) => LogFormat::Json,
            (None, Environment::Development) => LogFormat::Pretty,
        }
    }
}

// ============= Authentication Configuration =============

#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Environment variable name containing the JWT signing secret
    #[serde(default = "default_jwt_secret_env")]
    pub jwt_secret_env: String,

    /// Resolved from `jwt_secret_env` at load time
    #[serde(skip)]
    pub jwt_secret: String,

    #[serde(default = "default_token_validity_secs")]
    pub token_validity_secs: u64,

    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,
}

fn default_jwt_secret_env() -> String {
    "JWT_SECRET_KEY".to_string()
}

fn default_token_validity_secs() -> u64 {
    86_400
}

fn default_min_password_length() -> usize {
    6
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret_env: default_jwt_secret_env(),
            jwt_secret: String::new(),
            token_validity_secs: default_token_validity_secs(),
            min_password_length: default_min_password_length(),
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret_env", &self.jwt_secret_env)
            .field("jwt_secret", &"<redacted>")
            .field("token_validity_secs", &self.token_validity_secs)
            .field("min_password_length", &self.min_password_length)
            .finish()
    }
}

// ============= Database Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Local database path, or `:memory:`
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Environment variable for Turso URL (optional cloud config)
    pub turso_url_env: Option<String>,

    /// Environment variable for Turso auth token
    pub turso_token_env: Option<String>,

    #[serde(skip)]
    pub turso_url: Option<String>,

    #[serde(skip)]
    pub turso_token: Option<String>,
}

fn default_database_url() -> String {
    "./data/portcullis.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            turso_url_env: None,
            turso_token_env: None,
            turso_url: None,
            turso_token: None,
        }
    }
}

// ============= Rate Limit Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Sustained per-IP rate; also used as the burst size
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: u32,

    /// Key clients on `X-Forwarded-For`/`X-Real-IP` instead of the peer
    /// address. Only safe behind a proxy that overwrites those headers.
    #[serde(default)]
    pub trust_proxy_headers: bool,
}

fn default_true() -> bool {
    true
}

fn default_requests_per_minute() -> u32 {
    100
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            requests_per_minute: default_requests_per_minute(),
            trust_proxy_headers: false,
        }
    }
}

// ============= Errors and Warnings =============

/// Non-fatal configuration problems
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub message: String,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),
}

impl AppConfig {
    /// Load configuration from a TOML file, resolving secrets from the
    /// process environment.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content, |name| std::env::var(name).ok())
    }

    /// Parse, resolve secrets through `env`, and validate.
    pub fn parse<F>(content: &str, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: AppConfig = toml::from_str(content)?;
        config.resolve_secrets(env)?;
        config.validate()?;
        Ok(config)
    }

    /// Fill in every secret referenced by an environment variable name.
    pub fn resolve_secrets<F>(&mut self, env: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| {
            env(name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
        };

        self.auth.jwt_secret = lookup(&self.auth.jwt_secret_env)?;

        if let Some(ref name) = self.database.turso_url_env {
            self.database.turso_url = Some(lookup(name)?);
        }
        if let Some(ref name) = self.database.turso_token_env {
            self.database.turso_token = Some(lookup(name)?);
        }

        Ok(())
    }

    /// Validate the configuration. Secrets must already be resolved.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.jwt_secret.is_empty() {
            return Err(ConfigError::MissingEnvVar(self.auth.jwt_secret_env.clone()));
        }

        if self.server.environment == Environment::Production
            && self.auth.jwt_secret.len() < MIN_PRODUCTION_SECRET_LEN
        {
            return Err(ConfigError::ValidationError(format!(
                "JWT secret must be at least {} bytes in production",
                MIN_PRODUCTION_SECRET_LEN
            )));
        }

        if self.auth.token_validity_secs == 0 {
            return Err(ConfigError::ValidationError(
                "auth.token_validity_secs must be greater than zero".to_string(),
            ));
        }

        if self.auth.token_validity_secs > MAX_TOKEN_VALIDITY_SECS {
            return Err(ConfigError::ValidationError(format!(
                "auth.token_validity_secs must be at most {}",
                MAX_TOKEN_VALIDITY_SECS
            )));
        }

        if self.auth.min_password_length == 0 {
            return Err(ConfigError::ValidationError(
                "auth.min_password_length must be greater than zero".to_string(),
            ));
        }

        if self.rate_limit.enabled && self.rate_limit.requests_per_minute == 0 {
            return Err(ConfigError::ValidationError(
                "rate_limit.requests_per_minute must be greater than zero".to_string(),
            ));
        }

        if self.database.url.trim().is_empty() && self.database.turso_url.is_none() {
            return Err(ConfigError::ValidationError(
                "database.url must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate configuration and collect warnings for risky settings
    pub fn validate_with_warnings(&self) -> Result<Vec<ConfigWarning>, ConfigError> {
        self.validate()?;

        let mut warnings = Vec::new();

        if self.auth.jwt_secret.len() < MIN_PRODUCTION_SECRET_LEN {
            warnings.push(ConfigWarning {
                message: format!(
                    "JWT secret is shorter than {} bytes; this is rejected in production",
                    MIN_PRODUCTION_SECRET_LEN
                ),
            });
        }

        if !self.rate_limit.enabled && self.server.environment == Environment::Production {
            warnings.push(ConfigWarning {
                message: "Rate limiting is disabled in production".to_string(),
            });
        }

        Ok(warnings)
    }

    /// The resolved JWT signing secret
    pub fn jwt_secret(&self) -> &str {
        &self.auth.jwt_secret
    }

    /// Builds a configuration with defaults and the given secret. Used by
    /// tests and embedders that skip the TOML file.
    pub fn with_jwt_secret(secret: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.auth.jwt_secret = secret.into();
        config
    }
}
