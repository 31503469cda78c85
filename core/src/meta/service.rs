//! Meta access service
//!
//! [`MetaService`] hands out [`WithMeta`] handles: an owner row paired with a
//! snapshot of its meta rows. Every write goes through the record store and
//! is followed by a full reload of the snapshot, so reads made through the
//! same handle observe the write. Two handles for the same owner do not see
//! each other's writes until they reload.

use sea_orm::sea_query::SimpleExpr;
use sea_orm::{
	ActiveModelBehavior, ActiveModelTrait, EntityTrait, IntoActiveModel, QueryFilter, Select,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};

use super::owner::{MetaActiveModel, MetaModel};
use super::scope::meta_column;
use super::{
	MetaCollection, MetaEntity, MetaField, MetaQuery, MetaRelation, MetaResolver, MetaValue,
	OwnerEntity,
};
use crate::config::MetaConfig;
use crate::infra::db::{HostConnection, TablePrefix};
use crate::shared::errors::{MetaError, Result};

fn belongs_to(relation: &MetaRelation, owner_id: i64) -> SimpleExpr {
	meta_column(relation, &relation.foreign_key).eq(owner_id)
}

/// Entry point for meta reads, writes and scoped owner queries
#[derive(Clone, Debug)]
pub struct MetaService {
	host: Arc<HostConnection>,
	resolver: Arc<MetaResolver>,
}

impl MetaService {
	pub fn new(host: Arc<HostConnection>, resolver: MetaResolver) -> Self {
		Self {
			host,
			resolver: Arc::new(resolver),
		}
	}

	/// Build the host adapter and resolver from config
	pub fn from_config(conn: sea_orm::DatabaseConnection, config: &MetaConfig) -> Result<Self> {
		let resolver = MetaResolver::from_config(config)?;
		let host = HostConnection::new(conn, TablePrefix::from_config(config));

		Ok(Self::new(Arc::new(host), resolver))
	}

	pub fn host(&self) -> &Arc<HostConnection> {
		&self.host
	}

	pub fn resolver(&self) -> &MetaResolver {
		&self.resolver
	}

	/// Relation descriptor for `O`, failing if `O` was not configured
	pub fn relation<O: OwnerEntity>(&self) -> Result<MetaRelation> {
		self.resolver.resolve(O::KIND).cloned()
	}

	/// Owner query that can be narrowed with meta scopes
	pub fn query<O: OwnerEntity>(&self) -> Result<MetaQuery<O>> {
		Ok(MetaQuery::new(O::find(), self.relation::<O>()?))
	}

	/// Pair an owner row with a freshly loaded meta snapshot
	pub async fn attach<O: OwnerEntity>(&self, owner: O::Model) -> Result<WithMeta<O>> {
		let mut handle = WithMeta {
			owner,
			relation: self.relation::<O>()?,
			meta: MetaCollection::default(),
			host: self.host.clone(),
		};
		handle.reload().await?;

		Ok(handle)
	}

	/// Attach many owners with a single meta query
	pub async fn attach_many<O: OwnerEntity>(
		&self,
		owners: Vec<O::Model>,
	) -> Result<Vec<WithMeta<O>>> {
		let relation = self.relation::<O>()?;
		if owners.is_empty() {
			return Ok(Vec::new());
		}

		let ids = owners.iter().map(O::owner_id).collect::<Vec<_>>();
		let rows = O::Meta::find()
			.filter(meta_column(&relation, &relation.foreign_key).is_in(ids))
			.all(self.host.conn())
			.await?;

		let mut grouped: HashMap<i64, Vec<MetaField>> = HashMap::new();
		for row in &rows {
			let field = O::Meta::to_field(row);
			grouped.entry(field.owner_id).or_default().push(field);
		}

		debug!(
			owner = %O::KIND,
			owners = owners.len(),
			rows = rows.len(),
			"Eager loaded meta"
		);

		Ok(owners
			.into_iter()
			.map(|owner| {
				let fields = grouped.remove(&O::owner_id(&owner)).unwrap_or_default();
				WithMeta {
					owner,
					relation: relation.clone(),
					meta: MetaCollection::new(fields),
					host: self.host.clone(),
				}
			})
			.collect())
	}
}

/// An owner row together with its cached meta collection
#[derive(Debug)]
pub struct WithMeta<O: OwnerEntity> {
	owner: O::Model,
	relation: MetaRelation,
	meta: MetaCollection,
	host: Arc<HostConnection>,
}

impl<O: OwnerEntity> WithMeta<O> {
	pub fn owner(&self) -> &O::Model {
		&self.owner
	}

	pub fn into_owner(self) -> O::Model {
		self.owner
	}

	pub fn id(&self) -> i64 {
		O::owner_id(&self.owner)
	}

	/// How this owner joins to its meta rows
	pub fn meta(&self) -> &MetaRelation {
		&self.relation
	}

	/// Alias of [`WithMeta::meta`]
	pub fn fields(&self) -> &MetaRelation {
		self.meta()
	}

	/// Query over this owner's meta rows, not yet executed
	pub fn meta_query(&self) -> Select<O::Meta> {
		O::Meta::find().filter(belongs_to(&self.relation, self.id()))
	}

	/// The cached snapshot, as of the last load
	pub fn cached(&self) -> &MetaCollection {
		&self.meta
	}

	/// Cached value of the first row stored under `key`.
	///
	/// Never touches the record store; writes made elsewhere are only visible
	/// after [`WithMeta::reload`].
	pub fn get_meta(&self, key: &str) -> Option<&str> {
		self.meta.value(key)
	}

	/// Replace the snapshot with the record store's current rows
	pub async fn reload(&mut self) -> Result<()> {
		let rows = self.meta_query().all(self.host.conn()).await?;
		self.meta = MetaCollection::new(rows.iter().map(O::Meta::to_field).collect());

		trace!(owner = %O::KIND, owner_id = self.id(), rows = self.meta.len(), "Reloaded meta");
		Ok(())
	}
}

impl<O> WithMeta<O>
where
	O: OwnerEntity,
	MetaModel<O>: IntoActiveModel<MetaActiveModel<O>>,
	MetaActiveModel<O>: ActiveModelBehavior + Send,
{
	/// Update the first row stored under `key`, or insert one
	async fn upsert(&self, key: &str, value: MetaValue) -> Result<MetaField> {
		let conn = self.host.conn();
		let existing = self
			.meta_query()
			.filter(meta_column(&self.relation, "meta_key").eq(key))
			.one(conn)
			.await?;

		let model = match existing {
			Some(model) => {
				let mut row = model.into_active_model();
				O::Meta::assign_value(&mut row, value);
				row.update(conn).await?
			}
			None => {
				let model = O::Meta::new_row(self.id(), key, value).insert(conn).await?;
				self.host.record_insert(O::Meta::to_field(&model).id);
				model
			}
		};

		Ok(O::Meta::to_field(&model))
	}

	/// Always insert a new row, even if `key` already exists
	async fn insert_row(&self, key: &str, value: MetaValue) -> Result<MetaField> {
		let model = O::Meta::new_row(self.id(), key, value)
			.insert(self.host.conn())
			.await?;
		let field = O::Meta::to_field(&model);
		self.host.record_insert(field.id);

		Ok(field)
	}

	/// Reload after a partially applied batch so the cache matches the rows
	/// that did persist. The batch error is returned either way.
	async fn abort_batch(&mut self, err: MetaError) -> MetaError {
		if let Err(reload_err) = self.reload().await {
			debug!(
				owner = %O::KIND,
				owner_id = self.id(),
				error = %reload_err,
				"Reload after failed batch failed"
			);
		}
		err
	}

	/// Set `key` to `value`, updating the existing row in place when there is
	/// one. Repeated saves never add rows for the same key.
	pub async fn save_meta(
		&mut self,
		key: &str,
		value: impl Into<MetaValue>,
	) -> Result<MetaField> {
		let field = self.upsert(key, value.into()).await?;
		debug!(owner = %O::KIND, owner_id = self.id(), key, meta_id = field.id, "Saved meta");

		self.reload().await?;
		Ok(field)
	}

	/// Alias of [`WithMeta::save_meta`]
	pub async fn save_field(
		&mut self,
		key: &str,
		value: impl Into<MetaValue>,
	) -> Result<MetaField> {
		self.save_meta(key, value).await
	}

	/// Save every entry, then reload once.
	///
	/// Entries are not applied atomically; on failure the rows saved so far
	/// stay persisted and the cache is reloaded to show them.
	pub async fn save_many<I, K, V>(&mut self, entries: I) -> Result<Vec<MetaField>>
	where
		I: IntoIterator<Item = (K, V)>,
		K: AsRef<str>,
		V: Into<MetaValue>,
	{
		let mut saved = Vec::new();
		for (key, value) in entries {
			match self.upsert(key.as_ref(), value.into()).await {
				Ok(field) => saved.push(field),
				Err(err) => return Err(self.abort_batch(err).await),
			}
		}
		debug!(owner = %O::KIND, owner_id = self.id(), count = saved.len(), "Saved meta batch");

		self.reload().await?;
		Ok(saved)
	}

	/// Insert a new row for `key`, allowing duplicates
	pub async fn create_meta(
		&mut self,
		key: &str,
		value: impl Into<MetaValue>,
	) -> Result<MetaField> {
		let field = self.insert_row(key, value.into()).await?;
		debug!(owner = %O::KIND, owner_id = self.id(), key, meta_id = field.id, "Created meta");

		self.reload().await?;
		Ok(field)
	}

	/// Alias of [`WithMeta::create_meta`]
	pub async fn create_field(
		&mut self,
		key: &str,
		value: impl Into<MetaValue>,
	) -> Result<MetaField> {
		self.create_meta(key, value).await
	}

	/// Insert a row for every entry, then reload once.
	///
	/// Created rows are returned in input order. As with
	/// [`WithMeta::save_many`], a failure leaves earlier rows in place and the
	/// cache reloaded.
	pub async fn create_many<I, K, V>(&mut self, entries: I) -> Result<Vec<MetaField>>
	where
		I: IntoIterator<Item = (K, V)>,
		K: AsRef<str>,
		V: Into<MetaValue>,
	{
		let mut created = Vec::new();
		for (key, value) in entries {
			match self.insert_row(key.as_ref(), value.into()).await {
				Ok(field) => created.push(field),
				Err(err) => return Err(self.abort_batch(err).await),
			}
		}
		debug!(owner = %O::KIND, owner_id = self.id(), count = created.len(), "Created meta batch");

		self.reload().await?;
		Ok(created)
	}
}
