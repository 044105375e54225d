use std::{fmt, num::ParseIntError, path::Path};
use thiserror::Error;

pub const ENV_FILENAME: &str = ".env";

pub const DB_HOST: &str = "DB_HOST";
pub const DB_PORT: &str = "DB_PORT";
pub const DB_USER: &str = "DB_USER";
pub const DB_PASSWORD: &str = "DB_PASSWORD";
pub const DB_NAME: &str = "DB_NAME";

/// Database connection parameters read from the environment.
#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Error loading .env file: {0}")]
    EnvFile(#[from] dotenvy::Error),
    #[error("Environment variable {0} is not set")]
    Missing(&'static str),
    #[error("Environment variable DB_PORT is not a valid port: {0}")]
    InvalidPort(#[from] ParseIntError),
}

impl Config {
    /// Loads the env file at `path`, then reads the database variables.
    /// A missing file is an error. Variables already set in the process win
    /// over the file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        dotenvy::from_path(path)?;
        tracing::debug!("Loaded environment from {}", path.display());
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &'static str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        Ok(Self {
            host: require(DB_HOST)?,
            port: require(DB_PORT)?.trim().parse()?,
            user: require(DB_USER)?,
            password: require(DB_PASSWORD)?,
            database: require(DB_NAME)?,
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .finish()
    }
}
