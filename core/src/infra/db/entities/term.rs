//! Taxonomy term entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "terms")]
pub struct Model {
	#[sea_orm(primary_key)]
	pub term_id: i64,
	pub name: String,
	pub slug: String,
	pub term_group: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
	#[sea_orm(has_many = "super::term_meta::Entity")]
	Meta,
}

impl Related<super::term_meta::Entity> for Entity {
	fn to() -> RelationDef {
		Relation::Meta.def()
	}
}

impl ActiveModelBehavior for ActiveModel {}
