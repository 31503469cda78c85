//! Comment entity

use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "comments")]
pub struct Model {
	#[sea_orm(primary_key, column_name = "comment_ID")]
	pub comment_id: i64,
	#[sea_orm(column_name = "comment_post_ID")]
	pub comment_post_id: i64,
	pub comment_author: String,
	#[sea_orm(column_type = "Text")]
	pub comment_content: String,
	pub comment_approved: String, // "1", "0", "spam" or "trash"
	pub user_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
	#[sea_orm(has_many = "super::comment_meta::Entity")]
	Meta,
}

impl Related<super::comment_meta::Entity> for Entity {
	fn to() -> RelationDef {
		Relation::Meta.def()
	}
}

impl ActiveModelBehavior for ActiveModel {
	fn new() -> Self {
		Self {
			comment_post_id: Set(0),
			comment_approved: Set("1".to_owned()),
			user_id: Set(0),
			..ActiveModelTrait::default()
		}
	}
}
