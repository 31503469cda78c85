//! WordPress style meta attachment
//!
//! Comments, posts, terms and users carry open ended key/value meta kept in
//! side tables. This crate resolves which side table belongs to an owner,
//! filters owners by their meta and keeps an owner's cached meta in step with
//! the record store after writes.

pub mod config;
pub mod infra;
pub mod meta;
pub mod shared;

pub use config::MetaConfig;
pub use infra::db::{entities, Database, HostConnection, TablePrefix};
pub use meta::{
	MetaCollection, MetaField, MetaFilter, MetaOperator, MetaQuery, MetaRelation, MetaResolver,
	MetaService, MetaValue, OwnerEntity, OwnerKind, WithMeta,
};
pub use shared::errors::{MetaError, Result};
