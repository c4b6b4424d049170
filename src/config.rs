use std::env;

use crate::error::ConfigError;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Process configuration, read once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    /// Secret used to sign and verify bearer tokens.
    pub secret_key: String,
    /// Plaintext for the seed `admin` account; hashed before it is stored.
    pub admin_password: String,
    pub bind_addr: String,
    pub max_connections: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let admin_password = required("ADMIN_PASSWORD")?;
        if admin_password == "password" {
            return Err(ConfigError::Invalid(
                "ADMIN_PASSWORD",
                "the default password is not allowed".to_string(),
            ));
        }

        let max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(v) => v
                .parse()
                .map_err(|_| ConfigError::Invalid("DB_MAX_CONNECTIONS", v))?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Config {
            database_url: required("DATABASE_URL")?,
            secret_key: required("SECRET_KEY")?,
            admin_password,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            max_connections,
        })
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::Missing(key)),
    }
}
