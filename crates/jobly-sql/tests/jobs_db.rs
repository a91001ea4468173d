use jobly_sql::models::{Company, Job};
use jobly_sql::{AttributeBag, SqlError, SqlResult};
use rust_decimal::Decimal;
use tokio_postgres::{Client, NoTls};

async fn try_connect() -> Option<Client> {
    dotenvy::dotenv().ok();
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(v) => v,
        Err(_) => {
            eprintln!("DATABASE_URL is not set; skipping");
            return None;
        }
    };
    let (client, connection) = tokio_postgres::connect(&database_url, NoTls)
        .await
        .expect("Failed to connect to DATABASE_URL with NoTls");
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            eprintln!("tokio-postgres connection error: {e}");
        }
    });
    Some(client)
}

const SCHEMA: &str = r#"
CREATE TEMP TABLE companies (
    handle VARCHAR(25) PRIMARY KEY CHECK (handle = lower(handle)),
    name TEXT UNIQUE NOT NULL,
    num_employees INTEGER CHECK (num_employees >= 0),
    description TEXT NOT NULL,
    logo_url TEXT
) ON COMMIT DROP;

CREATE TEMP TABLE jobs (
    id SERIAL PRIMARY KEY,
    title TEXT NOT NULL,
    salary INTEGER CHECK (salary >= 0),
    equity NUMERIC CHECK (equity <= 1.0),
    company_handle VARCHAR(25) NOT NULL REFERENCES companies ON DELETE CASCADE
) ON COMMIT DROP;

INSERT INTO companies (handle, name, num_employees, description, logo_url)
VALUES ('c1', 'C1', 1, 'Desc1', 'http://c1.img');

INSERT INTO jobs (title, salary, equity, company_handle)
VALUES ('J1', 1, '0.1', 'c1'), ('J2', 2, '0.2', 'c1'), ('J3', 3, NULL, 'c1');
"#;

fn titles<T>(items: &[T], title: impl Fn(&T) -> &str) -> Vec<String> {
    items.iter().map(|i| title(i).to_string()).collect()
}

#[tokio::test]
async fn job_crud_roundtrip() -> SqlResult<()> {
    let Some(mut client) = try_connect().await else {
        return Ok(());
    };
    let mut tx = client.transaction().await?;
    tx.batch_execute(SCHEMA).await?;

    let all = Job::find_all(&tx, &AttributeBag::new()).await?;
    assert_eq!(titles(&all, |j| j.title.as_str()), ["J1", "J2", "J3"]);
    assert_eq!(all[0].company_name.as_deref(), Some("C1"));

    let with_equity = Job::find_all(&tx, &AttributeBag::new().with("hasEquity", true)).await?;
    assert_eq!(titles(&with_equity, |j| j.title.as_str()), ["J1", "J2"]);

    let filtered = Job::find_all(
        &tx,
        &AttributeBag::new().with("minSalary", 2).with("title", "3"),
    )
    .await?;
    assert_eq!(titles(&filtered, |j| j.title.as_str()), ["J3"]);

    let bad_key = Job::find_all(&tx, &AttributeBag::new().with("nope", "nope")).await;
    assert!(matches!(bad_key, Err(SqlError::UnknownField(_))));

    let j1 = all[0].id;
    let updated = Job::update(&tx, j1, &AttributeBag::new().with("title", "new-job")).await?;
    assert_eq!(updated.title, "new-job");
    assert_eq!(updated.salary, Some(1));
    assert_eq!(updated.equity, Some(Decimal::new(1, 1)));
    assert_eq!(updated.company_handle, "c1");

    let updated = Job::update(&tx, j1, &AttributeBag::new().with("equity", "0.5")).await?;
    assert_eq!(updated.equity, Some(Decimal::new(5, 1)));

    // A failed statement aborts the transaction; keep it behind a savepoint.
    let savepoint = tx.transaction().await?;
    let negative = Job::update(&savepoint, j1, &AttributeBag::new().with("salary", -1)).await;
    let err = negative.unwrap_err();
    assert!(matches!(err, SqlError::CheckViolation(_)), "{err}");
    assert!(err.is_client_error());
    savepoint.rollback().await?;

    let missing = Job::update(&tx, 0, &AttributeBag::new().with("title", "x")).await;
    assert!(matches!(missing, Err(SqlError::NotFound(_))));

    let detail = Job::get(&tx, j1).await?;
    assert_eq!(detail.company.handle, "c1");
    assert_eq!(detail.company.logo_url.as_deref(), Some("http://c1.img"));

    Job::remove(&tx, j1).await?;
    assert!(Job::remove(&tx, j1).await.unwrap_err().is_not_found());

    tx.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn company_update_maps_columns() -> SqlResult<()> {
    let Some(mut client) = try_connect().await else {
        return Ok(());
    };
    let tx = client.transaction().await?;
    tx.batch_execute(SCHEMA).await?;

    let data = AttributeBag::new()
        .with("numEmployees", 10)
        .with("logoUrl", "http://new.img");
    let company = Company::update(&tx, "c1", &data).await?;
    assert_eq!(company.num_employees, Some(10));
    assert_eq!(company.logo_url.as_deref(), Some("http://new.img"));

    let found = Company::find_all(&tx, &AttributeBag::new().with("minEmployees", 5)).await?;
    assert_eq!(found.len(), 1);

    tx.rollback().await?;
    Ok(())
}
