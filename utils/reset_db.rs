use anyhow::Context;
use sea_orm::{ConnectionTrait, Database, DbBackend, Statement};

const TABLES: [&str; 6] = [
    "posted_content",
    "project_files",
    "projects",
    "clients",
    "editors",
    "seaql_migrations",
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_target(false).init();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let db = Database::connect(database_url)
        .await
        .context("Failed to connect to database")?;

    for table in TABLES {
        db.execute(Statement::from_string(
            DbBackend::Postgres,
            format!("DROP TABLE IF EXISTS \"{table}\" CASCADE;"),
        ))
        .await
        .with_context(|| format!("Failed to drop {table}"))?;
        tracing::info!(table, "Dropped");
    }

    db.execute(Statement::from_string(
        DbBackend::Postgres,
        "DROP FUNCTION IF EXISTS set_updated_at() CASCADE;".to_owned(),
    ))
    .await
    .context("Failed to drop set_updated_at()")?;

    tracing::info!("Database reset successfully");
    Ok(())
}
