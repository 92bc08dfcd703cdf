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
                    .table(PostedContent::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PostedContent::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PostedContent::ProjectId).integer())
                    .col(ColumnDef::new(PostedContent::ProjectTitle).string())
                    .col(ColumnDef::new(PostedContent::Client).string())
                    .col(ColumnDef::new(PostedContent::ContentForm).string().not_null())
                    .col(ColumnDef::new(PostedContent::ContentBucket).string())
                    .col(
                        ColumnDef::new(PostedContent::NumberOfContent)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(PostedContent::Link).string())
                    .col(ColumnDef::new(PostedContent::Caption).text())
                    .col(ColumnDef::new(PostedContent::Feedback).text())
                    .col(ColumnDef::new(PostedContent::Comments).text())
                    .col(
                        ColumnDef::new(PostedContent::NumberOfLikes)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(PostedContent::LiveLink).string())
                    .col(ColumnDef::new(PostedContent::Platform).string().not_null())
                    .col(ColumnDef::new(PostedContent::ScheduledDate).date())
                    .col(ColumnDef::new(PostedContent::PostedDate).date())
                    .col(
                        ColumnDef::new(PostedContent::Status)
                            .string()
                            .not_null()
                            .default("draft")
                            .check(Expr::col(PostedContent::Status).is_in([
                                "draft",
                                "scheduled",
                                "posted",
                            ])),
                    )
                    .col(
                        ColumnDef::new(PostedContent::Analytics)
                            .json_binary()
                            .not_null()
                            .default(SimpleExpr::Custom("'{}'".to_owned())),
                    )
                    .col(
                        ColumnDef::new(PostedContent::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(PostedContent::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_posted_content_project_id")
                            .from(PostedContent::Table, PostedContent::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        add_updated_at_trigger(manager, "posted_content").await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PostedContent::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PostedContent {
    Table,
    Id,
    ProjectId,
    ProjectTitle,
    Client,
    ContentForm,
    ContentBucket,
    NumberOfContent,
    Link,
    Caption,
    Feedback,
    Comments,
    NumberOfLikes,
    LiveLink,
    Platform,
    ScheduledDate,
    PostedDate,
    Status,
    Analytics,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Projects {
    Table,
    Id,
}
