use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::versioning::VersionedFile;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "project_files")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub project_id: i32,
    pub name: String,
    pub size: i64,
    #[sea_orm(column_name = "type")]
    pub mime_type: String,
    #[sea_orm(unique)]
    pub s3_key: String,
    pub url: String,
    pub upload_date: DateTime,
    pub version: String,
    pub uploaded_by: String,
    pub is_latest: bool,
    pub previous_version_id: Option<String>,
}

impl VersionedFile for Model {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn is_latest(&self) -> bool {
        self.is_latest
    }
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
