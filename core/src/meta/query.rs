//! Owner queries narrowed by meta scopes

use sea_orm::sea_query::IntoCondition;
use sea_orm::{ConnectionTrait, PaginatorTrait, QueryFilter, Select};

use super::scope::{self, MetaFilter, MetaOperator};
use super::{MetaRelation, MetaService, MetaValue, OwnerEntity, WithMeta};
use crate::shared::errors::Result;

/// A `Select` over an owner entity plus the relation its meta scopes join on
#[derive(Clone, Debug)]
pub struct MetaQuery<O: OwnerEntity> {
	select: Select<O>,
	relation: MetaRelation,
}

impl<O: OwnerEntity> MetaQuery<O> {
	pub fn new(select: Select<O>, relation: MetaRelation) -> Self {
		Self { select, relation }
	}

	pub fn relation(&self) -> &MetaRelation {
		&self.relation
	}

	/// Owners with a `key` row equal to `value`; a NULL value only checks the
	/// key exists
	pub fn has_meta(self, key: &str, value: impl Into<MetaValue>) -> Self {
		self.has_meta_op(key, value, MetaOperator::Eq)
	}

	/// Like [`MetaQuery::has_meta`] with an explicit comparison
	pub fn has_meta_op(self, key: &str, value: impl Into<MetaValue>, op: MetaOperator) -> Self {
		let filter = MetaFilter::new(key, value);
		let expr = scope::has_meta(&self.relation, &filter, op);
		self.filter(expr)
	}

	/// Owners having any row under `key`
	pub fn has_meta_key(self, key: &str) -> Self {
		self.has_meta_where([MetaFilter::Key(key.to_owned())], MetaOperator::Eq)
	}

	/// Owners satisfying every filter; each may match a different row
	pub fn has_meta_where<I>(self, filters: I, op: MetaOperator) -> Self
	where
		I: IntoIterator,
		I::Item: Into<MetaFilter>,
	{
		let condition = scope::has_meta_all(&self.relation, filters, op);
		self.filter(condition)
	}

	/// Owners with a `key` row whose value is one of `values`; empty `values`
	/// match nothing
	pub fn has_meta_in<I, V>(self, key: &str, values: I) -> Self
	where
		I: IntoIterator<Item = V>,
		V: Into<MetaValue>,
	{
		let expr = scope::has_meta_in(&self.relation, key, values);
		self.filter(expr)
	}

	/// Owners with a `key` row whose value matches the `LIKE` pattern
	pub fn has_meta_like(self, key: &str, pattern: &str) -> Self {
		let expr = scope::has_meta_like(&self.relation, key, pattern);
		self.filter(expr)
	}

	/// Any other condition on the owner query
	pub fn filter(mut self, condition: impl IntoCondition) -> Self {
		self.select = self.select.filter(condition);
		self
	}

	pub fn into_select(self) -> Select<O> {
		self.select
	}

	pub async fn all<C: ConnectionTrait>(self, conn: &C) -> Result<Vec<O::Model>> {
		Ok(self.select.all(conn).await?)
	}

	pub async fn count<C: ConnectionTrait>(self, conn: &C) -> Result<u64>
	where
		O::Model: Sync,
	{
		Ok(self.select.count(conn).await?)
	}

	/// Run the query and eager load the meta of every matching owner
	pub async fn with_meta(self, service: &MetaService) -> Result<Vec<WithMeta<O>>> {
		let owners = self.select.all(service.host().conn()).await?;
		service.attach_many::<O>(owners).await
	}
}
