//! Convenient imports for typical `jobly-sql` usage.
//!
//! ```ignore
//! use jobly_sql::prelude::*;
//! ```

pub use crate::{
    AttributeBag, FromRow, GenericClient, NameMap, RowExt, SqlError, SqlResult, Statement, Value,
    compile_filter, compile_partial_update,
};
pub use crate::models::{Company, Job, User};

#[cfg(feature = "pool")]
pub use crate::{DbConfig, create_pool};
