//! Comment meta entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "commentmeta")]
pub struct Model {
	#[sea_orm(primary_key)]
	pub meta_id: i64,
	pub comment_id: i64,
	pub meta_key: Option<String>,
	#[sea_orm(column_type = "Text", nullable)]
	pub meta_value: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
	#[sea_orm(
		belongs_to = "super::comment::Entity",
		from = "Column::CommentId",
		to = "super::comment::Column::CommentId"
	)]
	Comment,
}

impl Related<super::comment::Entity> for Entity {
	fn to() -> RelationDef {
		Relation::Comment.def()
	}
}

impl ActiveModelBehavior for ActiveModel {}
