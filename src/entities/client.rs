use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Contact and billing record. Projects refer to a client only through the
/// free-text `projects.client` column, which holds the company name.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "clients")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub email: String,
    pub company: String,
    pub phone: Option<String>,
    pub created_date: Date,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
