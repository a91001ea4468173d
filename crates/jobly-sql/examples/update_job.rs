//! Apply a partial update to a job and list jobs with a filter.
//!
//! ```text
//! DATABASE_URL=postgres://localhost/jobly cargo run -p jobly-sql --example update_job -- 1 '{"title":"Staff Engineer"}'
//! ```

use jobly_sql::models::Job;
use jobly_sql::{AttributeBag, DbConfig, create_pool};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut args = std::env::args().skip(1);
    let id: i32 = args
        .next()
        .ok_or_else(|| anyhow::anyhow!("usage: update_job <id> <json>"))?
        .parse()?;
    let body: serde_json::Value = serde_json::from_str(&args.next().unwrap_or_else(|| "{}".into()))?;

    let pool = create_pool(&DbConfig::from_env()?)?;
    let client = pool.get().await?;

    let data = AttributeBag::from_json(body)?;
    match Job::update(&client, id, &data).await {
        Ok(job) => println!("{}", serde_json::to_string_pretty(&job)?),
        Err(e) if e.is_client_error() => eprintln!("rejected: {e}"),
        Err(e) => return Err(e.into()),
    }

    let with_equity = AttributeBag::new().with("hasEquity", true);
    for job in Job::find_all(&client, &with_equity).await? {
        println!("{} ({})", job.title, job.company_name.unwrap_or_default());
    }

    Ok(())
}
