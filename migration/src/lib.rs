pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_projects_table;
mod m20260301_000002_create_clients_table;
mod m20260301_000003_create_project_files_table;
mod m20260301_000004_create_posted_content_table;
mod m20260301_000005_create_editors_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_projects_table::Migration),
            Box::new(m20260301_000002_create_clients_table::Migration),
            Box::new(m20260301_000003_create_project_files_table::Migration),
            Box::new(m20260301_000004_create_posted_content_table::Migration),
            Box::new(m20260301_000005_create_editors_table::Migration),
        ]
    }
}

/// Attaches the shared `set_updated_at()` trigger to `table`.
///
/// The function itself is created by the first migration.
pub(crate) async fn add_updated_at_trigger(
    manager: &SchemaManager<'_>,
    table: &str,
) -> Result<(), DbErr> {
    manager
        .get_connection()
        .execute_unprepared(&format!(
            "CREATE TRIGGER trg_{table}_updated_at BEFORE UPDATE ON {table} \
             FOR EACH ROW EXECUTE FUNCTION set_updated_at()"
        ))
        .await?;
    Ok(())
}
