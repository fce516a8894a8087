use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;
use validator::{Validate, ValidationError};

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const CONFIG_DIR: &str = "config";
const DEFAULT_UPLOAD_MAX_BYTES: u64 = 5 * 1024 * 1024;
const DEV_DEFAULT_JWT_SECRET: &str =
    "this_is_a_development_secret_key_for_local_use_only_change_me";

/// Application configuration with validation.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Database connection URL
    pub database_url: String,

    /// JWT signing secret (minimum 32 characters)
    #[validate(length(min = 32), custom = "validate_jwt_secret")]
    pub jwt_secret: String,

    /// Identity token lifetime in seconds
    #[serde(default = "default_jwt_expiration")]
    pub jwt_expiration: u64,

    /// Password-reset token lifetime in seconds
    #[serde(default = "default_reset_token_expiration")]
    pub reset_token_expiration: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Application environment ("development", "production", "test")
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Logging level filter
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// Whether to run database migrations on startup
    #[serde(default)]
    pub auto_migrate: bool,

    /// Directory for generated PDF documents
    #[serde(default = "default_documents_dir")]
    pub documents_dir: String,

    /// Directory for uploaded payment receipts
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: String,

    /// Maximum accepted upload size in bytes
    #[serde(default = "default_upload_max_bytes")]
    pub upload_max_bytes: u64,
}

fn default_jwt_expiration() -> u64 {
    3600
}
fn default_reset_token_expiration() -> u64 {
    3600
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_environment() -> String {
    DEFAULT_ENV.to_string()
}
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
fn default_documents_dir() -> String {
    "documents".to_string()
}
fn default_uploads_dir() -> String {
    "uploads".to_string()
}
fn default_upload_max_bytes() -> u64 {
    DEFAULT_UPLOAD_MAX_BYTES
}

fn validate_jwt_secret(secret: &str) -> Result<(), ValidationError> {
    if secret.trim().is_empty() {
        return Err(ValidationError::new("jwt_secret_empty"));
    }
    Ok(())
}

impl AppConfig {
    /// Programmatic constructor, primarily for tests.
    pub fn new(
        database_url: String,
        jwt_secret: String,
        jwt_expiration: u64,
        host: String,
        port: u16,
        environment: String,
    ) -> Self {
        Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            reset_token_expiration: default_reset_token_expiration(),
            host,
            port,
            environment,
            log_level: default_log_level(),
            log_json: false,
            auto_migrate: false,
            documents_dir: default_documents_dir(),
            uploads_dir: default_uploads_dir(),
            upload_max_bytes: default_upload_max_bytes(),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development" || self.environment == "test"
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    fn validate_full(&self) -> Result<(), ConfigError> {
        self.validate()
            .map_err(|e| ConfigError::Message(format!("invalid configuration: {}", e)))?;
        if !self.is_development() && self.jwt_secret.trim() == DEV_DEFAULT_JWT_SECRET {
            return Err(ConfigError::Message(
                "jwt_secret is the development default; set APP__JWT_SECRET".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load configuration from `config/` files layered with `APP__*` environment variables.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let environment =
        std::env::var("APP__ENVIRONMENT").unwrap_or_else(|_| DEFAULT_ENV.to_string());

    let config = Config::builder()
        .set_default("database_url", "sqlite://fabrika.db?mode=rwc")?
        .set_default("jwt_secret", DEV_DEFAULT_JWT_SECRET)?
        .set_default("environment", environment.clone())?
        .add_source(File::with_name(&format!("{}/default", CONFIG_DIR)).required(false))
        .add_source(File::with_name(&format!("{}/{}", CONFIG_DIR, environment)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let config: AppConfig = config.try_deserialize()?;
    config.validate_full()?;
    Ok(config)
}

/// Initialise the global tracing subscriber.
pub fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        let _ = builder.json().try_init();
    } else {
        let _ = builder.try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> Result<AppConfig, ConfigError> {
        let config = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        let config: AppConfig = config.try_deserialize()?;
        config.validate_full()?;
        Ok(config)
    }

    #[test]
    fn minimal_config_applies_defaults() {
        let config = from_toml(
            r#"
            database_url = "sqlite://test.db?mode=rwc"
            jwt_secret = "a_sufficiently_long_testing_secret_value_1234"
            "#,
        )
        .expect("config should load");

        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.jwt_expiration, 3600);
        assert_eq!(config.documents_dir, "documents");
        assert!(config.is_development());
    }

    #[test]
    fn short_jwt_secret_is_rejected() {
        let result = from_toml(
            r#"
            database_url = "sqlite://test.db?mode=rwc"
            jwt_secret = "short"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn production_rejects_the_dev_default_secret() {
        let result = from_toml(&format!(
            r#"
            database_url = "postgres://localhost/fabrika"
            jwt_secret = "{}"
            environment = "production"
            "#,
            DEV_DEFAULT_JWT_SECRET
        ));
        assert!(result.is_err());
    }
}
