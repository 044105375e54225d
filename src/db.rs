use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions, PgSslMode},
    Connection, PgConnection, PgPool,
};
use thiserror::Error;

use crate::config::Config;

const CREATE_PLANTS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS plants (
        plantID SERIAL PRIMARY KEY,
        plantName VARCHAR(50),
        plantPlantTime DATE,
        plantHarvestTime DATE,
        waterFrequency INTEGER,
        fertilizeFrequency INTEGER,
        photo VARCHAR(255)
    )
";

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Could not connect to database: {0}")]
    Connect(#[source] sqlx::Error),
    #[error("Database did not answer ping: {0}")]
    Ping(#[source] sqlx::Error),
    #[error("Could not create plants table: {0}")]
    Schema(#[source] sqlx::Error),
}

pub fn connect_options(config: &Config) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .database(&config.database)
        .ssl_mode(PgSslMode::Disable)
}

/// Opens one connection and pings it, then hands out a pool for the same
/// server. A refused or failed first connection is returned as is.
pub async fn connect(config: &Config) -> Result<PgPool, DbError> {
    let options = connect_options(config);

    let mut conn = PgConnection::connect_with(&options)
        .await
        .map_err(DbError::Connect)?;
    conn.ping().await.map_err(DbError::Ping)?;
    if let Err(err) = conn.close().await {
        tracing::warn!("Error closing startup connection: {}", err);
    }

    let pool = PgPoolOptions::new().connect_lazy_with(options);

    tracing::info!(
        host = %config.host,
        port = config.port,
        database = %config.database,
        "Connected to database"
    );
    Ok(pool)
}

pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

pub async fn ensure_schema(pool: &PgPool) -> Result<(), DbError> {
    sqlx::query(CREATE_PLANTS_TABLE)
        .execute(pool)
        .await
        .map_err(DbError::Schema)?;
    tracing::debug!("plants table is present");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;

    fn config() -> Config {
        Config {
            host: "db.local".into(),
            port: 5433,
            user: "gardener".into(),
            password: "s3cret".into(),
            database: "garden".into(),
        }
    }

    #[test]
    fn options_carry_config_values() {
        let options = connect_options(&config());

        assert_eq!(options.get_host(), "db.local");
        assert_eq!(options.get_port(), 5433);
        assert_eq!(options.get_username(), "gardener");
        assert_eq!(options.get_database(), Some("garden"));
        assert!(matches!(options.get_ssl_mode(), PgSslMode::Disable));
    }

    #[tokio::test]
    async fn refused_connection_is_reported_without_retry() {
        let mut config = config();
        config.host = "127.0.0.1".into();
        // Nothing listens on port 1.
        config.port = 1;

        let started = Instant::now();
        let err = connect(&config).await.unwrap_err();
        assert!(started.elapsed() < Duration::from_secs(5));
        match err {
            DbError::Connect(sqlx::Error::Io(io)) => {
                assert_eq!(io.kind(), std::io::ErrorKind::ConnectionRefused)
            }
            other => panic!("expected refused connection, got {other:?}"),
        }
    }

    #[sqlx::test]
    #[ignore = "needs a postgres server in DATABASE_URL"]
    async fn schema_creation_is_idempotent(pool: PgPool) {
        ensure_schema(&pool).await.unwrap();
        ensure_schema(&pool).await.unwrap();

        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = 'plants'",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(tables, 1);
    }

    #[sqlx::test]
    #[ignore = "needs a postgres server in DATABASE_URL"]
    async fn ping_succeeds_on_live_pool(pool: PgPool) {
        ping(&pool).await.unwrap();
    }
}
