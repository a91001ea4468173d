//! Jobs: `jobs (id, title, salary, equity, company_handle)`.

use crate::attrs::AttributeBag;
use crate::client::GenericClient;
use crate::error::SqlResult;
use crate::filter::{FilterField, FilterSpec, Predicate, compile_filter};
use crate::name_map::NameMap;
use crate::partial::compile_partial_update;
use crate::row::{FromRow, RowExt};
use crate::statement::Statement;
use crate::value::Value;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

use super::company::Company;

pub const TABLE: &str = "jobs";

/// Columns returned by writes, aliased to API field names.
pub const RETURNING: &str = r#"id, title, salary, equity, company_handle AS "companyHandle""#;

/// Fields a job update may touch. `id` and `companyHandle` are immutable.
pub const UPDATE_FIELDS: NameMap<'static> = NameMap::allow_list(&[
    ("title", "title"),
    ("salary", "salary"),
    ("equity", "equity"),
]);

/// `GET /jobs` criteria.
pub const FILTERS: FilterSpec<'static> = FilterSpec::new(&[
    FilterField::new("minSalary", "salary", Predicate::AtLeast),
    FilterField::new("hasEquity", "equity", Predicate::Positive),
    FilterField::new("title", "title", Predicate::Contains),
]);

/// A job as returned by writes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

impl FromRow for Job {
    fn from_row(row: &Row) -> SqlResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
            company_handle: row.try_get_column("companyHandle")?,
        })
    }
}

/// A row of `GET /jobs`, carrying the owning company's name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListing {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
    pub company_name: Option<String>,
}

impl FromRow for JobListing {
    fn from_row(row: &Row) -> SqlResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
            company_handle: row.try_get_column("companyHandle")?,
            company_name: row.try_get_column("companyName")?,
        })
    }
}

/// A single job with its company nested, as returned by `GET /jobs/:id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobDetail {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company: Company,
}

/// Body of `POST /jobs`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub title: String,
    pub salary: Option<i64>,
    pub equity: Option<String>,
    pub company_handle: String,
}

pub fn insert_statement(new: &NewJob) -> Statement {
    Statement::new(
        format!(
            "INSERT INTO {TABLE} (title, salary, equity, company_handle) \
             VALUES ($1, $2, $3, $4) RETURNING {RETURNING}"
        ),
        vec![
            Value::from(new.title.as_str()),
            Value::from(new.salary),
            Value::from(new.equity.clone()),
            Value::from(new.company_handle.as_str()),
        ],
    )
    .tagged("jobs.create")
}

pub fn find_all_statement(filters: &AttributeBag) -> SqlResult<Statement> {
    let fragment = compile_filter(filters, &FILTERS)?;
    let sql = format!(
        r#"SELECT j.id, j.title, j.salary, j.equity, j.company_handle AS "companyHandle", c.name AS "companyName"
           FROM {TABLE} j
           LEFT JOIN companies AS c ON c.handle = j.company_handle{}
           ORDER BY title"#,
        fragment.where_clause()
    );
    let (_, values) = fragment.into_parts();
    Ok(Statement::new(sql, values).tagged("jobs.find_all"))
}

pub fn get_statement(id: i32) -> Statement {
    Statement::new(
        format!(r#"SELECT {RETURNING} FROM {TABLE} WHERE id = $1"#),
        vec![Value::from(id)],
    )
    .tagged("jobs.get")
}

/// `UPDATE jobs SET ... WHERE id = $n RETURNING ...` for the fields in `data`.
pub fn update_statement(id: i32, data: &AttributeBag) -> SqlResult<Statement> {
    super::check_int4(data, "salary")?;
    let fragment = compile_partial_update(data, &UPDATE_FIELDS)?;
    Ok(fragment
        .into_update(TABLE, "id", id, RETURNING)
        .tagged("jobs.update"))
}

pub fn remove_statement(id: i32) -> Statement {
    Statement::new(
        format!("DELETE FROM {TABLE} WHERE id = $1 RETURNING id"),
        vec![Value::from(id)],
    )
    .tagged("jobs.remove")
}

fn no_job(id: i32) -> String {
    format!("No job: {id}")
}

impl Job {
    pub async fn create(conn: &impl GenericClient, new: &NewJob) -> SqlResult<Job> {
        let row = insert_statement(new).fetch_one(conn, "job insert returned no row").await?;
        Job::from_row(&row)
    }

    /// All jobs matching `filters`, ordered by title.
    pub async fn find_all(
        conn: &impl GenericClient,
        filters: &AttributeBag,
    ) -> SqlResult<Vec<JobListing>> {
        let rows = find_all_statement(filters)?.fetch_all(conn).await?;
        rows.iter().map(JobListing::from_row).collect()
    }

    pub async fn get(conn: &impl GenericClient, id: i32) -> SqlResult<JobDetail> {
        let row = get_statement(id).fetch_one(conn, &no_job(id)).await?;
        let job = Job::from_row(&row)?;
        let company = Company::get(conn, &job.company_handle).await?;
        Ok(JobDetail {
            id: job.id,
            title: job.title,
            salary: job.salary,
            equity: job.equity,
            company,
        })
    }

    /// Apply a partial update; only `title`, `salary` and `equity` may change.
    pub async fn update(conn: &impl GenericClient, id: i32, data: &AttributeBag) -> SqlResult<Job> {
        let row = update_statement(id, data)?.fetch_one(conn, &no_job(id)).await?;
        Job::from_row(&row)
    }

    pub async fn remove(conn: &impl GenericClient, id: i32) -> SqlResult<()> {
        remove_statement(id).fetch_one(conn, &no_job(id)).await?;
        Ok(())
    }
}
