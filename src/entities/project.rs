use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::workflow::ProjectStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub client: String,
    pub title: String,
    #[sea_orm(column_name = "type")]
    pub content_type: ContentType,
    pub subtype: Option<String>,
    /// Raw column value; read it through [`Model::workflow_status`].
    pub status: String,
    pub priority: Priority,
    pub version: i32,
    pub due_date: Date,
    #[sea_orm(column_type = "Double", nullable)]
    pub estimated_hours: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub budget: Option<f64>,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub objectives: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub target_audience: Option<String>,
    pub platforms: Vec<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub deliverables: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub feedback: Option<String>,
    pub last_activity: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Model {
    /// Status with legacy values normalised.
    pub fn workflow_status(&self) -> ProjectStatus {
        ProjectStatus::from_stored(&self.status)
    }
}

#[derive(
    EnumIter, DeriveActiveEnum, Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize,
    utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    #[sea_orm(string_value = "video")]
    Video,
    #[sea_orm(string_value = "image")]
    Image,
    #[sea_orm(string_value = "text")]
    Text,
}

#[derive(
    EnumIter, DeriveActiveEnum, Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize,
    Serialize, utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[sea_orm(string_value = "low")]
    Low,
    #[default]
    #[sea_orm(string_value = "medium")]
    Medium,
    #[sea_orm(string_value = "high")]
    High,
    #[sea_orm(string_value = "urgent")]
    Urgent,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::project_file::Entity")]
    ProjectFile,
    #[sea_orm(has_many = "super::posted_content::Entity")]
    PostedContent,
}

impl Related<super::project_file::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProjectFile.def()
    }
}

impl Related<super::posted_content::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PostedContent.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
