//! User meta entity
//!
//! Unlike the other meta tables the primary key is `umeta_id`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "usermeta")]
pub struct Model {
	#[sea_orm(primary_key)]
	pub umeta_id: i64,
	pub user_id: i64,
	pub meta_key: Option<String>,
	#[sea_orm(column_type = "Text", nullable)]
	pub meta_value: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
	#[sea_orm(
		belongs_to = "super::user::Entity",
		from = "Column::UserId",
		to = "super::user::Column::Id"
	)]
	User,
}

impl Related<super::user::Entity> for Entity {
	fn to() -> RelationDef {
		Relation::User.def()
	}
}

impl ActiveModelBehavior for ActiveModel {}
