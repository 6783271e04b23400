//! Role entity (static reference data).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role seeded for administrators.
pub const ADMIN_ROLE_ID: i32 = 1;

/// Role assigned to newly registered users.
pub const DEFAULT_ROLE_ID: i32 = 2;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "roles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user::Entity")]
    Users,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
