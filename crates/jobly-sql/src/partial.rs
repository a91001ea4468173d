//! Partial-update compilation.
//!
//! Turns a sparse [`AttributeBag`] into the `SET` list of an `UPDATE` statement:
//!
//! ```ignore
//! use jobly_sql::{AttributeBag, NameMap, compile_partial_update};
//!
//! const USERS: NameMap<'static> =
//!     NameMap::new(&[("firstName", "first_name"), ("age", "age")]);
//!
//! let bag = AttributeBag::new().with("firstName", "Aliya").with("age", 32);
//! let fragment = compile_partial_update(&bag, &USERS)?;
//!
//! assert_eq!(fragment.set_clause(), r#""first_name"=$1, "age"=$2"#);
//! ```

use crate::attrs::AttributeBag;
use crate::error::{SqlError, SqlResult};
use crate::name_map::NameMap;
use crate::statement::Statement;
use crate::value::Value;
use std::fmt::Write;

/// The `SET` list of an update plus its bind values.
///
/// Placeholder `$n` in [`set_clause`](Self::set_clause) binds `values()[n - 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledFragment {
    set_clause: String,
    values: Vec<Value>,
}

impl CompiledFragment {
    /// Comma-joined `"column"=$n` assignments.
    pub fn set_clause(&self) -> &str {
        &self.set_clause
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Number of bound values; also the highest placeholder ordinal.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.set_clause, self.values)
    }

    /// Assemble a full `UPDATE` keyed on `key_column`.
    ///
    /// The key binds to the placeholder after the last assignment. `table`,
    /// `key_column` and `returning` are written verbatim and must be fixed
    /// identifiers.
    pub fn into_update(
        self,
        table: &str,
        key_column: &str,
        key: impl Into<Value>,
        returning: &str,
    ) -> Statement {
        let key_idx = self.values.len() + 1;
        let mut sql = format!(
            "UPDATE {table} SET {} WHERE {key_column} = ${key_idx}",
            self.set_clause
        );
        if !returning.is_empty() {
            sql.push_str(" RETURNING ");
            sql.push_str(returning);
        }

        let mut params = self.values;
        params.push(key.into());
        Statement::new(sql, params)
    }
}

/// Compile the `SET` list for updating the fields in `attributes`.
///
/// Each entry becomes `"<column>"=$<n>`, numbered from 1 in bag order, with
/// the column resolved through `names`. Fails with [`SqlError::EmptyInput`] if
/// the bag is empty, and with [`SqlError::UnknownField`] if `names` is an
/// allow-list that does not list a field.
///
/// Only values are parameterized. Column names are quoted but not escaped.
pub fn compile_partial_update(
    attributes: &AttributeBag,
    names: &NameMap<'_>,
) -> SqlResult<CompiledFragment> {
    if attributes.is_empty() {
        return Err(SqlError::EmptyInput);
    }

    let mut set_clause = String::new();
    let mut values = Vec::with_capacity(attributes.len());
    for (idx, (field, value)) in attributes.iter().enumerate() {
        let column = names.resolve(field)?;
        if idx > 0 {
            set_clause.push_str(", ");
        }
        // Writing to a String cannot fail.
        let _ = write!(set_clause, "\"{column}\"=${}", idx + 1);
        values.push(value.clone());
    }

    Ok(CompiledFragment { set_clause, values })
}
