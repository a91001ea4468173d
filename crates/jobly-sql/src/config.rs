//! Database configuration.

use crate::error::{SqlError, SqlResult};

/// Default maximum number of pooled connections.
pub const DEFAULT_POOL_SIZE: usize = 16;

/// Connection settings for the backing Postgres database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub database_url: String,
    pub max_pool_size: usize,
}

impl DbConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_pool_size: DEFAULT_POOL_SIZE,
        }
    }

    /// Override the maximum pool size.
    pub fn max_pool_size(mut self, max_pool_size: usize) -> Self {
        self.max_pool_size = max_pool_size;
        self
    }

    /// Read `DATABASE_URL` (required) and `DATABASE_POOL_SIZE` (optional).
    pub fn from_env() -> SqlResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> SqlResult<Self> {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| SqlError::Connection("DATABASE_URL is not set".to_string()))?;

        let max_pool_size = match lookup("DATABASE_POOL_SIZE") {
            Some(raw) => raw.trim().parse::<usize>().ok().filter(|n| *n > 0).ok_or_else(|| {
                SqlError::Connection(format!("invalid DATABASE_POOL_SIZE: {raw:?}"))
            })?,
            None => DEFAULT_POOL_SIZE,
        };

        Ok(Self {
            database_url,
            max_pool_size,
        })
    }
}
