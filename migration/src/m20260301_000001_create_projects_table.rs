use sea_orm_migration::prelude::*;

use crate::add_updated_at_trigger;

#[derive(DeriveMigrationName)]
pub struct Migration;

const SET_UPDATED_AT_FN: &str = r#"
CREATE OR REPLACE FUNCTION set_updated_at() RETURNS trigger AS $$
BEGIN
    NEW.updated_at = NOW();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;
"#;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(SET_UPDATED_AT_FN)
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Projects::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Projects::Client).string().not_null())
                    .col(ColumnDef::new(Projects::Title).string().not_null())
                    .col(ColumnDef::new(Projects::Type).string().not_null())
                    .col(ColumnDef::new(Projects::Subtype).string())
                    .col(
                        ColumnDef::new(Projects::Status)
                            .string()
                            .not_null()
                            .default("draft"),
                    )
                    .col(
                        ColumnDef::new(Projects::Priority)
                            .string()
                            .not_null()
                            .default("medium"),
                    )
                    .col(
                        ColumnDef::new(Projects::Version)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Projects::DueDate).date().not_null())
                    .col(ColumnDef::new(Projects::EstimatedHours).double())
                    .col(ColumnDef::new(Projects::Budget).double())
                    .col(ColumnDef::new(Projects::Description).text().not_null())
                    .col(ColumnDef::new(Projects::Objectives).text())
                    .col(ColumnDef::new(Projects::TargetAudience).text())
                    .col(
                        ColumnDef::new(Projects::Platforms)
                            .array(ColumnType::Text)
                            .not_null()
                            .default(SimpleExpr::Custom("'{}'".to_owned())),
                    )
                    .col(ColumnDef::new(Projects::Deliverables).text())
                    .col(ColumnDef::new(Projects::Feedback).text())
                    .col(ColumnDef::new(Projects::LastActivity).string())
                    .col(
                        ColumnDef::new(Projects::Tags)
                            .array(ColumnType::Text)
                            .not_null()
                            .default(SimpleExpr::Custom("'{}'".to_owned())),
                    )
                    .col(
                        ColumnDef::new(Projects::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Projects::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        add_updated_at_trigger(manager, "projects").await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Projects::Table).to_owned())
            .await?;
        manager
            .get_connection()
            .execute_unprepared("DROP FUNCTION IF EXISTS set_updated_at()")
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Projects {
    Table,
    Id,
    Client,
    Title,
    Type,
    Subtype,
    Status,
    Priority,
    Version,
    DueDate,
    EstimatedHours,
    Budget,
    Description,
    Objectives,
    TargetAudience,
    Platforms,
    Deliverables,
    Feedback,
    LastActivity,
    Tags,
    CreatedAt,
    UpdatedAt,
}
