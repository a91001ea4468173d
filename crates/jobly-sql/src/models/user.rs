//! Users: `users (username, first_name, last_name, email, is_admin)`.
//!
//! Passwords are hashed by the auth layer; a `password` entry in an update bag
//! must already hold the hash.

use crate::attrs::AttributeBag;
use crate::client::GenericClient;
use crate::error::SqlResult;
use crate::name_map::NameMap;
use crate::partial::compile_partial_update;
use crate::row::{FromRow, RowExt};
use crate::statement::Statement;
use crate::value::Value;
use serde::Serialize;
use tokio_postgres::Row;

pub const TABLE: &str = "users";

pub const RETURNING: &str = r#"username, first_name AS "firstName", last_name AS "lastName", email, is_admin AS "isAdmin""#;

/// Fields a user update may touch. `username` is the key and never changes.
pub const UPDATE_FIELDS: NameMap<'static> = NameMap::allow_list(&[
    ("firstName", "first_name"),
    ("lastName", "last_name"),
    ("isAdmin", "is_admin"),
    ("email", "email"),
    ("password", "password"),
]);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_admin: bool,
}

impl FromRow for User {
    fn from_row(row: &Row) -> SqlResult<Self> {
        Ok(Self {
            username: row.try_get_column("username")?,
            first_name: row.try_get_column("firstName")?,
            last_name: row.try_get_column("lastName")?,
            email: row.try_get_column("email")?,
            is_admin: row.try_get_column("isAdmin")?,
        })
    }
}

pub fn get_statement(username: &str) -> Statement {
    Statement::new(
        format!("SELECT {RETURNING} FROM {TABLE} WHERE username = $1"),
        vec![Value::from(username)],
    )
    .tagged("users.get")
}

pub fn update_statement(username: &str, data: &AttributeBag) -> SqlResult<Statement> {
    let fragment = compile_partial_update(data, &UPDATE_FIELDS)?;
    Ok(fragment
        .into_update(TABLE, "username", username, RETURNING)
        .tagged("users.update"))
}

pub fn remove_statement(username: &str) -> Statement {
    Statement::new(
        format!("DELETE FROM {TABLE} WHERE username = $1 RETURNING username"),
        vec![Value::from(username)],
    )
    .tagged("users.remove")
}

fn no_user(username: &str) -> String {
    format!("No user: {username}")
}

impl User {
    pub async fn get(conn: &impl GenericClient, username: &str) -> SqlResult<User> {
        let row = get_statement(username)
            .fetch_one(conn, &no_user(username))
            .await?;
        User::from_row(&row)
    }

    pub async fn update(
        conn: &impl GenericClient,
        username: &str,
        data: &AttributeBag,
    ) -> SqlResult<User> {
        let row = update_statement(username, data)?
            .fetch_one(conn, &no_user(username))
            .await?;
        User::from_row(&row)
    }

    pub async fn remove(conn: &impl GenericClient, username: &str) -> SqlResult<()> {
        remove_statement(username)
            .fetch_one(conn, &no_user(username))
            .await?;
        Ok(())
    }
}
