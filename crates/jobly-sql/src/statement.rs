//! Complete parameterized statements.

use crate::client::GenericClient;
use crate::error::{SqlError, SqlResult};
use crate::value::Value;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// SQL text with `$1, $2, ...` placeholders and the values they bind.
#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    sql: String,
    params: Vec<Value>,
    tag: Option<String>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
            tag: None,
        }
    }

    /// Associate a tag for logging (e.g. `"jobs.update"`).
    pub fn tagged(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Parameter refs compatible with `tokio-postgres`.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params
            .iter()
            .map(|p| p as &(dyn ToSql + Sync))
            .collect()
    }

    fn trace(&self) {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "jobly_sql::sql",
            tag = self.tag.as_deref().unwrap_or("-"),
            param_count = self.params.len(),
            sql = %self.sql,
        );
    }

    /// Execute and return all rows.
    pub async fn fetch_all(&self, conn: &impl GenericClient) -> SqlResult<Vec<Row>> {
        self.trace();
        conn.query(&self.sql, &self.params_ref()).await
    }

    /// Execute and return the first row, if any.
    pub async fn fetch_opt(&self, conn: &impl GenericClient) -> SqlResult<Option<Row>> {
        self.trace();
        conn.query_opt(&self.sql, &self.params_ref()).await
    }

    /// Execute and return the first row, or [`SqlError::NotFound`] naming `what`.
    pub async fn fetch_one(&self, conn: &impl GenericClient, what: &str) -> SqlResult<Row> {
        self.fetch_opt(conn)
            .await?
            .ok_or_else(|| SqlError::not_found(what.to_string()))
    }

    /// Execute and return the number of affected rows.
    pub async fn execute(&self, conn: &impl GenericClient) -> SqlResult<u64> {
        self.trace();
        conn.execute(&self.sql, &self.params_ref()).await
    }
}
