//! Meta attachment
//!
//! Key/value attributes stored in a side table per owner kind. The
//! [`resolver`] maps owner kinds to their meta tables, [`scope`] builds the
//! owner filters and [`service`] runs the read/write protocol that keeps each
//! owner's cached collection in step with the record store.

mod field;
mod owner;
mod query;
pub mod resolver;
pub mod scope;
pub mod service;

pub use field::{MetaCollection, MetaField, MetaValue};
pub use owner::{MetaEntity, OwnerEntity};
pub use query::MetaQuery;
pub use resolver::{MetaRelation, MetaResolver, OwnerKind};
pub use scope::{MetaFilter, MetaOperator};
pub use service::{MetaService, WithMeta};
