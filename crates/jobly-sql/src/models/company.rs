//! Companies: `companies (handle, name, description, num_employees, logo_url)`.

use crate::attrs::AttributeBag;
use crate::client::GenericClient;
use crate::error::{SqlError, SqlResult};
use crate::filter::{FilterField, FilterSpec, Predicate, compile_filter};
use crate::name_map::NameMap;
use crate::partial::compile_partial_update;
use crate::row::{FromRow, RowExt};
use crate::statement::Statement;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

pub const TABLE: &str = "companies";

pub const RETURNING: &str = r#"handle, name, description, num_employees AS "numEmployees", logo_url AS "logoUrl""#;

/// Fields a company update may touch. The handle is the key and never changes.
pub const UPDATE_FIELDS: NameMap<'static> = NameMap::allow_list(&[
    ("name", "name"),
    ("description", "description"),
    ("numEmployees", "num_employees"),
    ("logoUrl", "logo_url"),
]);

/// `GET /companies` criteria.
pub const FILTERS: FilterSpec<'static> = FilterSpec::new(&[
    FilterField::new("minEmployees", "num_employees", Predicate::AtLeast),
    FilterField::new("maxEmployees", "num_employees", Predicate::AtMost),
    FilterField::new("name", "name", Predicate::Contains),
]);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

impl FromRow for Company {
    fn from_row(row: &Row) -> SqlResult<Self> {
        Ok(Self {
            handle: row.try_get_column("handle")?,
            name: row.try_get_column("name")?,
            description: row.try_get_column("description")?,
            num_employees: row.try_get_column("numEmployees")?,
            logo_url: row.try_get_column("logoUrl")?,
        })
    }
}

/// Body of `POST /companies`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i64>,
    pub logo_url: Option<String>,
}

pub fn insert_statement(new: &NewCompany) -> Statement {
    Statement::new(
        format!(
            "INSERT INTO {TABLE} (handle, name, description, num_employees, logo_url) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {RETURNING}"
        ),
        vec![
            Value::from(new.handle.as_str()),
            Value::from(new.name.as_str()),
            Value::from(new.description.as_str()),
            Value::from(new.num_employees),
            Value::from(new.logo_url.clone()),
        ],
    )
    .tagged("companies.create")
}

/// Companies matching `filters`, ordered by name.
///
/// A `minEmployees` above `maxEmployees` is rejected before any SQL is built.
pub fn find_all_statement(filters: &AttributeBag) -> SqlResult<Statement> {
    if let (Some(min), Some(max)) = (
        employee_bound(filters, "minEmployees"),
        employee_bound(filters, "maxEmployees"),
    ) && min > max
    {
        return Err(SqlError::validation(
            "minEmployees cannot be greater than maxEmployees",
        ));
    }

    let fragment = compile_filter(filters, &FILTERS)?;
    let sql = format!(
        "SELECT {RETURNING} FROM {TABLE}{} ORDER BY name",
        fragment.where_clause()
    );
    let (_, values) = fragment.into_parts();
    Ok(Statement::new(sql, values).tagged("companies.find_all"))
}

fn employee_bound(filters: &AttributeBag, key: &str) -> Option<i64> {
    filters.get(key)?.as_integer()
}

pub fn get_statement(handle: &str) -> Statement {
    Statement::new(
        format!("SELECT {RETURNING} FROM {TABLE} WHERE handle = $1"),
        vec![Value::from(handle)],
    )
    .tagged("companies.get")
}

pub fn update_statement(handle: &str, data: &AttributeBag) -> SqlResult<Statement> {
    super::check_int4(data, "numEmployees")?;
    let fragment = compile_partial_update(data, &UPDATE_FIELDS)?;
    Ok(fragment
        .into_update(TABLE, "handle", handle, RETURNING)
        .tagged("companies.update"))
}

pub fn remove_statement(handle: &str) -> Statement {
    Statement::new(
        format!("DELETE FROM {TABLE} WHERE handle = $1 RETURNING handle"),
        vec![Value::from(handle)],
    )
    .tagged("companies.remove")
}

fn no_company(handle: &str) -> String {
    format!("No company: {handle}")
}

impl Company {
    /// Insert a company; a taken handle surfaces as [`SqlError::UniqueViolation`].
    pub async fn create(conn: &impl GenericClient, new: &NewCompany) -> SqlResult<Company> {
        let row = insert_statement(new)
            .fetch_one(conn, "company insert returned no row")
            .await?;
        Company::from_row(&row)
    }

    pub async fn find_all(
        conn: &impl GenericClient,
        filters: &AttributeBag,
    ) -> SqlResult<Vec<Company>> {
        let rows = find_all_statement(filters)?.fetch_all(conn).await?;
        rows.iter().map(Company::from_row).collect()
    }

    pub async fn get(conn: &impl GenericClient, handle: &str) -> SqlResult<Company> {
        let row = get_statement(handle)
            .fetch_one(conn, &no_company(handle))
            .await?;
        Company::from_row(&row)
    }

    pub async fn update(
        conn: &impl GenericClient,
        handle: &str,
        data: &AttributeBag,
    ) -> SqlResult<Company> {
        let row = update_statement(handle, data)?
            .fetch_one(conn, &no_company(handle))
            .await?;
        Company::from_row(&row)
    }

    pub async fn remove(conn: &impl GenericClient, handle: &str) -> SqlResult<()> {
        remove_statement(handle)
            .fetch_one(conn, &no_company(handle))
            .await?;
        Ok(())
    }
}
