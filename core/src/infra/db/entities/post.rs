//! Post entity

use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "posts")]
pub struct Model {
	#[sea_orm(primary_key, column_name = "ID")]
	pub id: i64,
	pub post_author: i64,
	pub post_title: String,
	pub post_name: String, // Slug
	pub post_type: String,
	pub post_status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
	#[sea_orm(has_many = "super::post_meta::Entity")]
	Meta,
}

impl Related<super::post_meta::Entity> for Entity {
	fn to() -> RelationDef {
		Relation::Meta.def()
	}
}

impl ActiveModelBehavior for ActiveModel {
	fn new() -> Self {
		Self {
			post_author: Set(0),
			post_type: Set("post".to_owned()),
			post_status: Set("publish".to_owned()),
			..ActiveModelTrait::default()
		}
	}
}
