//! Traits tying owner entities to their meta entities

use sea_orm::EntityTrait;

use super::{MetaField, MetaValue, OwnerKind};

/// An entity whose rows can carry meta
pub trait OwnerEntity: EntityTrait {
	const KIND: OwnerKind;

	/// Side table holding this owner's meta rows
	type Meta: MetaEntity;

	fn owner_id(model: &Self::Model) -> i64;
}

/// A meta side table (`meta_key`/`meta_value` plus an owner foreign key)
pub trait MetaEntity: EntityTrait {
	/// Unsaved row for `owner_id`
	fn new_row(owner_id: i64, key: &str, value: MetaValue) -> Self::ActiveModel;

	fn assign_value(row: &mut Self::ActiveModel, value: MetaValue);

	fn to_field(model: &Self::Model) -> MetaField;
}

pub type MetaModel<O> = <<O as OwnerEntity>::Meta as EntityTrait>::Model;
pub type MetaActiveModel<O> = <<O as OwnerEntity>::Meta as EntityTrait>::ActiveModel;
