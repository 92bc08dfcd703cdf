use sea_orm_migration::prelude::*;

use crate::add_updated_at_trigger;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Editors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Editors::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Editors::Name).string().not_null())
                    .col(ColumnDef::new(Editors::Email).string().not_null())
                    .col(ColumnDef::new(Editors::Timezone).string())
                    .col(ColumnDef::new(Editors::Country).string())
                    .col(
                        ColumnDef::new(Editors::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Editors::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Editors::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        add_updated_at_trigger(manager, "editors").await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Editors::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Editors {
    Table,
    Id,
    Name,
    Email,
    Timezone,
    Country,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
