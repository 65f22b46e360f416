use std::net::IpAddr;

#[derive(Debug, Clone)]
pub struct Config {
    pub db: DbConfig,
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
}

/// Connection parameters for the users database.
#[derive(Debug, Clone, PartialEq)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let db = DbConfig::from_env()?;

        let host: IpAddr = env_or("USERS_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid USERS_HOST: {e}"))?;

        let port: u16 = env_or("USERS_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid USERS_PORT: {e}"))?;

        let log_level = env_or("USERS_LOG_LEVEL", "info");

        Ok(Config {
            db,
            host,
            port,
            log_level,
        })
    }
}

impl DbConfig {
    pub fn from_env() -> Result<Self, String> {
        let port: u16 = env_or("USERS_DB_PORT", "5432")
            .parse()
            .map_err(|e| format!("Invalid USERS_DB_PORT: {e}"))?;

        Ok(DbConfig {
            host: env_or("USERS_DB_HOST", "localhost"),
            port,
            database: env_or("USERS_DB_NAME", "users"),
            user: env_or("USERS_DB_USER", "postgres"),
            password: env_required("USERS_DB_PASSWORD")?,
        })
    }

    /// Same server and credentials, different database.
    pub fn with_database(&self, database: &str) -> Self {
        DbConfig {
            database: database.to_string(),
            ..self.clone()
        }
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
