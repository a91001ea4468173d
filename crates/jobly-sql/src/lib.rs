//! # jobly-sql
//!
//! The SQL layer of the Jobly backend: compiles sparse request data into
//! parameterized Postgres statements.
//!
//! ## Features
//!
//! - **Partial updates**: an ordered [`AttributeBag`] plus a static [`NameMap`]
//!   compiles to a `"column"=$n, ...` list whose placeholders line up with the
//!   bound values ([`compile_partial_update`])
//! - **Filtered reads**: optional list criteria compile to an `AND`-joined
//!   `WHERE` fragment, omitted when nothing is filtered ([`compile_filter`])
//! - **Values, not identifiers**: every value is bound as a parameter; column
//!   names come only from static maps, and [`NameMap::allow_list`] rejects
//!   fields it does not list
//! - **Transaction-friendly**: statements run on anything implementing
//!   [`GenericClient`] (client, transaction, pooled connection)
//!
//! ## Example
//!
//! ```ignore
//! use jobly_sql::{AttributeBag, NameMap, compile_partial_update};
//!
//! const USERS: NameMap<'static> =
//!     NameMap::new(&[("firstName", "first_name"), ("lastName", "last_name")]);
//!
//! let data = AttributeBag::new().with("firstName", "Test1").with("lastName", "Testing1");
//! let stmt = compile_partial_update(&data, &USERS)?
//!     .into_update("users", "username", "u1", "username");
//!
//! // UPDATE users SET "first_name"=$1, "last_name"=$2 WHERE username = $3 RETURNING username
//! let row = stmt.fetch_one(&client, "No user: u1").await?;
//! ```

pub mod attrs;
pub mod client;
pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod name_map;
pub mod partial;
pub mod prelude;
pub mod row;
pub mod statement;
pub mod value;

pub use attrs::AttributeBag;
pub use client::GenericClient;
pub use config::DbConfig;
pub use error::{SqlError, SqlResult};
pub use filter::{
    FilterField, FilterSpec, Predicate, WhereFragment, compile_filter, compile_filter_from,
};
pub use name_map::{NameMap, Policy};
pub use partial::{CompiledFragment, compile_partial_update};
pub use row::{FromRow, RowExt};
pub use statement::Statement;
pub use value::Value;

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::create_pool;
