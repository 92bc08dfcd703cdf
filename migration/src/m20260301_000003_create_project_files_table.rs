use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProjectFiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProjectFiles::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ProjectFiles::ProjectId).integer().not_null())
                    .col(ColumnDef::new(ProjectFiles::Name).string().not_null())
                    .col(ColumnDef::new(ProjectFiles::Size).big_integer().not_null())
                    .col(ColumnDef::new(ProjectFiles::Type).string().not_null())
                    .col(
                        ColumnDef::new(ProjectFiles::S3Key)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(ProjectFiles::Url).string().not_null())
                    .col(
                        ColumnDef::new(ProjectFiles::UploadDate)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ProjectFiles::Version)
                            .string()
                            .not_null()
                            .default("1.0"),
                    )
                    .col(ColumnDef::new(ProjectFiles::UploadedBy).string().not_null())
                    .col(
                        ColumnDef::new(ProjectFiles::IsLatest)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(ProjectFiles::PreviousVersionId).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_files_project_id")
                            .from(ProjectFiles::Table, ProjectFiles::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_project_files_project_name")
                    .table(ProjectFiles::Table)
                    .col(ProjectFiles::ProjectId)
                    .col(ProjectFiles::Name)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProjectFiles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ProjectFiles {
    Table,
    Id,
    ProjectId,
    Name,
    Size,
    Type,
    S3Key,
    Url,
    UploadDate,
    Version,
    UploadedBy,
    IsLatest,
    PreviousVersionId,
}

#[derive(DeriveIden)]
enum Projects {
    Table,
    Id,
}
