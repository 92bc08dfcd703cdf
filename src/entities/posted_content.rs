use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "posted_content")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub project_id: Option<i32>,
    pub project_title: Option<String>,
    pub client: Option<String>,
    pub content_form: String,
    pub content_bucket: Option<String>,
    pub number_of_content: i32,
    pub link: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub caption: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub feedback: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub comments: Option<String>,
    pub number_of_likes: i32,
    pub live_link: Option<String>,
    pub platform: String,
    pub scheduled_date: Option<Date>,
    pub posted_date: Option<Date>,
    pub status: PostStatus,
    #[sea_orm(column_type = "JsonBinary")]
    pub analytics: PostAnalytics,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(
    EnumIter, DeriveActiveEnum, Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize,
    Serialize, utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "scheduled")]
    Scheduled,
    #[sea_orm(string_value = "posted")]
    Posted,
}

/// Engagement counters; every field is optional and absent ones are
/// omitted from the stored json.
#[derive(
    Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize, FromJsonQueryResult,
    utoipa::ToSchema,
)]
pub struct PostAnalytics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shares: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saves: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reach: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::project::Entity",
        from = "Column::ProjectId",
        to = "super::project::Column::Id",
        on_delete = "Cascade"
    )]
    Project,
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
