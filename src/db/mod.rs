//! Persistence: connection pool construction, schema migrations and the data-access
//! functions for lists and tasks.
//!
//! Data-access functions take a `&mut PgConnection` so that a request works on the
//! single pooled connection it acquired. Lookups report a missing row as `Ok(None)`;
//! every write runs in its own transaction and is committed before returning.

pub mod lists;
pub mod tasks;

use sqlx::migrate::Migrator;
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::PoolConfig;
use crate::error::AppError;

pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Pool options derived from the configuration: `size` idle connections kept warm,
/// `size + max_overflow` at most, connections recycled after `recycle`.
pub fn pool_options(config: &PoolConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .min_connections(config.size)
        .max_connections(config.max_connections())
        .acquire_timeout(config.acquire_timeout)
        .max_lifetime(config.recycle)
}

pub async fn connect(database_url: &str, config: &PoolConfig) -> Result<PgPool, AppError> {
    let pool = pool_options(config).connect(database_url).await?;
    log::info!(
        "Database pool ready ({} steady, {} max connections)",
        config.size,
        config.max_connections()
    );
    Ok(pool)
}

/// Applies any pending migrations from `migrations/`.
pub async fn migrate(pool: &PgPool) -> Result<(), AppError> {
    MIGRATOR.run(pool).await?;
    log::info!("Database schema is up to date");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_pool_options_follow_config() {
        let config = PoolConfig {
            size: 2,
            max_overflow: 4,
            acquire_timeout: Duration::from_secs(3),
            recycle: Duration::from_secs(90),
        };
        let options = pool_options(&config);

        assert_eq!(options.get_min_connections(), 2);
        assert_eq!(options.get_max_connections(), 6);
        assert_eq!(options.get_acquire_timeout(), Duration::from_secs(3));
        assert_eq!(options.get_max_lifetime(), Some(Duration::from_secs(90)));
    }

    #[test]
    fn test_migrations_are_embedded() {
        assert!(MIGRATOR.iter().count() >= 1);
    }
}
