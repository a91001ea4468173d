//! Row mapping traits and utilities

use crate::error::{SqlError, SqlResult};
use tokio_postgres::Row;

/// Trait for types that can be constructed from a database row.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> SqlResult<Self>;
}

/// Extension trait for Row to provide convenient column access
pub trait RowExt {
    /// Try to get a column value, returning SqlError::Decode on failure
    fn try_get_column<T>(&self, column: &str) -> SqlResult<T>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a>;
}

impl RowExt for Row {
    fn try_get_column<T>(&self, column: &str) -> SqlResult<T>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a>,
    {
        self.try_get(column)
            .map_err(|e| SqlError::decode(column, e.to_string()))
    }
}
