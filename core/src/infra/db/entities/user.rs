//! User entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
	#[sea_orm(primary_key, column_name = "ID")]
	pub id: i64,
	pub user_login: String,
	pub user_email: String,
	pub display_name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
	#[sea_orm(has_many = "super::user_meta::Entity")]
	Meta,
}

impl Related<super::user_meta::Entity> for Entity {
	fn to() -> RelationDef {
		Relation::Meta.def()
	}
}

impl ActiveModelBehavior for ActiveModel {}
