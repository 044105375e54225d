use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::Path,
    sync::Arc,
};

use axum::{routing::get, Router};
use thiserror::Error;
use tower_http::trace::TraceLayer;

use crate::{
    config::{Config, ConfigError},
    db::DbError,
    plants::{PgPlantRepository, PlantRepository},
};

pub mod api;
pub mod config;
pub mod db;
pub mod model;
pub mod plants;

pub const LISTEN_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
pub const LISTEN_PORT: u16 = 8080;

pub fn listen_addr() -> SocketAddr {
    SocketAddr::from((LISTEN_HOST, LISTEN_PORT))
}

#[derive(Clone)]
pub struct GlobalState {
    pub plants: Arc<dyn PlantRepository>,
}

impl GlobalState {
    pub fn new<R: PlantRepository>(plants: R) -> Self {
        Self {
            plants: Arc::new(plants),
        }
    }
}

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Database setup failed: {0}")]
    Db(#[from] DbError),
}

/// Connects to the database and makes sure the `plants` table exists.
///
/// Errors are returned, not acted on; the caller decides whether to exit.
pub async fn bootstrap(config: &Config) -> Result<PgPlantRepository, StartupError> {
    let pool = db::connect(config).await?;
    db::ensure_schema(&pool).await?;
    Ok(PgPlantRepository::new(pool))
}

/// Reads the config from `env_file` and the process environment, then
/// bootstraps the database.
pub async fn load_and_bootstrap(env_file: &Path) -> Result<PgPlantRepository, StartupError> {
    let config = Config::load_from(env_file)?;
    bootstrap(&config).await
}

pub fn build_router(state: GlobalState) -> Router {
    Router::new()
        .route("/", get(api::greeting))
        .route("/plants", get(api::list_plants))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;

    #[test]
    fn listens_on_all_interfaces_port_8080() {
        assert_eq!(listen_addr().to_string(), "0.0.0.0:8080");
    }

    #[tokio::test]
    async fn bootstrap_fails_fast_on_unreachable_database() {
        let config = Config {
            host: "127.0.0.1".into(),
            // Nothing listens on port 1.
            port: 1,
            user: "gardener".into(),
            password: "s3cret".into(),
            database: "garden".into(),
        };

        let started = Instant::now();
        let err = bootstrap(&config).await.unwrap_err();
        assert!(
            started.elapsed() < Duration::from_secs(5),
            "startup took {:?}",
            started.elapsed()
        );
        assert!(matches!(
            err,
            StartupError::Db(DbError::Connect(sqlx::Error::Io(_)))
        ));
    }

    #[tokio::test]
    async fn missing_env_file_stops_startup() {
        let err = load_and_bootstrap(Path::new("no-such-dir/.env"))
            .await
            .unwrap_err();
        assert!(matches!(err, StartupError::Config(ConfigError::EnvFile(_))));
    }
}
