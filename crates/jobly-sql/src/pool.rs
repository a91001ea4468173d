//! Connection pool utilities

use crate::config::DbConfig;
use crate::error::{SqlError, SqlResult};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use tokio_postgres::NoTls;

/// Create a connection pool from a [`DbConfig`].
///
/// Uses `NoTls`; the pool connects lazily, so a bad host only surfaces on the
/// first `pool.get()`.
///
/// # Example
///
/// ```ignore
/// let pool = jobly_sql::create_pool(&DbConfig::from_env()?)?;
/// let client = pool.get().await?;
/// ```
pub fn create_pool(config: &DbConfig) -> SqlResult<Pool> {
    let pg_config: tokio_postgres::Config = config
        .database_url
        .parse()
        .map_err(|e: tokio_postgres::Error| SqlError::Connection(e.to_string()))?;

    let mgr = Manager::from_config(
        pg_config,
        NoTls,
        ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        },
    );
    Pool::builder(mgr)
        .max_size(config.max_pool_size)
        .build()
        .map_err(|e| SqlError::Pool(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unparsable_url() {
        let err = create_pool(&DbConfig::new("not a url ://")).unwrap_err();
        assert!(matches!(err, SqlError::Connection(_)));
    }
}
