use std::env;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64_STANDARD};
use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "sqlite://catalog.db?mode=rwc";
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone)]
pub struct CatalogServerConfig {
    pub database_url: String,
    pub listen_addr: String,
    pub max_connections: u32,
    pub graphiql_enabled: bool,
    pub auth: AuthConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable `{0}` is not set")]
    MissingVar(&'static str),
    #[error("invalid value for environment variable `{0}`")]
    InvalidVar(&'static str),
}

impl CatalogServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("CATALOG_DATABASE_URL")
            .or_else(|_| env::var("DATABASE_URL"))
            .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let listen_addr =
            env::var("CATALOG_LISTEN_ADDR").unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string());

        let max_connections = match env::var("CATALOG_DB_MAX_CONNECTIONS") {
            Ok(v) => v
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::InvalidVar("CATALOG_DB_MAX_CONNECTIONS"))?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };

        let graphiql_enabled = env::var("CATALOG_GRAPHIQL")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(true);

        let auth = AuthConfig::from_env()?;

        tracing::info!(
            listen_addr = %listen_addr,
            max_connections,
            graphiql_enabled,
            "catalog config loaded"
        );

        Ok(Self {
            database_url,
            listen_addr,
            max_connections,
            graphiql_enabled,
            auth,
        })
    }
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    jwt_secret: SecretString,
}

impl AuthConfig {
    pub fn new(jwt_secret: SecretString) -> Self {
        Self { jwt_secret }
    }

    fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = env::var("CATALOG_JWT_SECRET")
            .map_err(|_| ConfigError::MissingVar("CATALOG_JWT_SECRET"))?;
        validate_jwt_secret(&jwt_secret)?;

        Ok(Self::new(SecretString::new(jwt_secret.into())))
    }

    pub fn jwt_secret(&self) -> &SecretString {
        &self.jwt_secret
    }
}

fn validate_jwt_secret(secret: &str) -> Result<(), ConfigError> {
    let decoded = BASE64_STANDARD
        .decode(secret.as_bytes())
        .map_err(|_| ConfigError::InvalidVar("CATALOG_JWT_SECRET"))?;

    if decoded.len() < 32 {
        return Err(ConfigError::InvalidVar("CATALOG_JWT_SECRET"));
    }

    Ok(())
}
