//! Owner kind to meta table resolution
//!
//! Maps each owner kind to the table holding its meta rows and the foreign
//! key column joining the two. Pure lookups, no I/O.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::{EnumIter, IntoEnumIterator, IntoStaticStr};

use crate::config::MetaConfig;
use crate::shared::errors::{MetaError, Result};

/// The closed set of entities that can carry meta
#[derive(
	Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter, IntoStaticStr, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OwnerKind {
	Comment,
	Post,
	Term,
	User,
}

impl OwnerKind {
	/// Type name the foreign key is derived from
	pub fn base_name(self) -> &'static str {
		self.into()
	}

	pub fn owner_table(self) -> &'static str {
		match self {
			Self::Comment => "comments",
			Self::Post => "posts",
			Self::Term => "terms",
			Self::User => "users",
		}
	}

	pub fn owner_key(self) -> &'static str {
		match self {
			Self::Comment => "comment_ID",
			Self::Post | Self::User => "ID",
			Self::Term => "term_id",
		}
	}

	pub fn meta_table(self) -> &'static str {
		match self {
			Self::Comment => "commentmeta",
			Self::Post => "postmeta",
			Self::Term => "termmeta",
			Self::User => "usermeta",
		}
	}

	pub fn meta_primary_key(self) -> &'static str {
		match self {
			Self::User => "umeta_id",
			_ => "meta_id",
		}
	}

	/// `post` -> `post_id`
	pub fn foreign_key(self) -> String {
		format!("{}_id", self.base_name().to_lowercase())
	}
}

impl fmt::Display for OwnerKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.base_name())
	}
}

impl FromStr for OwnerKind {
	type Err = MetaError;

	fn from_str(s: &str) -> Result<Self> {
		Self::iter()
			.find(|kind| kind.base_name().eq_ignore_ascii_case(s.trim()))
			.ok_or_else(|| MetaError::unsupported_owner(s))
	}
}

/// Describes how an owner joins to its meta rows
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MetaRelation {
	pub owner: OwnerKind,
	pub owner_table: String,
	pub owner_key: String,
	pub meta_table: String,
	pub meta_primary_key: String,
	pub foreign_key: String,
}

impl MetaRelation {
	pub fn for_kind(owner: OwnerKind) -> Self {
		Self {
			owner,
			owner_table: owner.owner_table().to_owned(),
			owner_key: owner.owner_key().to_owned(),
			meta_table: owner.meta_table().to_owned(),
			meta_primary_key: owner.meta_primary_key().to_owned(),
			foreign_key: owner.foreign_key(),
		}
	}
}

/// Ordered table of the owner kinds meta can be attached to.
///
/// Built once and handed to the service; the first entry matching a kind wins.
#[derive(Clone, Debug)]
pub struct MetaResolver {
	entries: Vec<(OwnerKind, MetaRelation)>,
}

impl MetaResolver {
	/// Every built-in owner kind, in declaration order
	pub fn builtin() -> Self {
		Self::with_owners(OwnerKind::iter())
	}

	pub fn with_owners(kinds: impl IntoIterator<Item = OwnerKind>) -> Self {
		Self {
			entries: kinds
				.into_iter()
				.map(|kind| (kind, MetaRelation::for_kind(kind)))
				.collect(),
		}
	}

	/// Build the table from the configured owner type names
	pub fn from_config(config: &MetaConfig) -> Result<Self> {
		let kinds = config
			.owner_types
			.iter()
			.map(|name| name.parse::<OwnerKind>())
			.collect::<Result<Vec<_>>>()?;

		Ok(Self::with_owners(kinds))
	}

	pub fn resolve(&self, kind: OwnerKind) -> Result<&MetaRelation> {
		self.entries
			.iter()
			.find(|(candidate, _)| *candidate == kind)
			.map(|(_, relation)| relation)
			.ok_or_else(|| MetaError::unsupported_owner(kind.base_name()))
	}

	/// Resolve from a type name, e.g. one read from a request or config file
	pub fn resolve_name(&self, name: &str) -> Result<&MetaRelation> {
		self.resolve(name.parse()?)
	}

	pub fn owners(&self) -> impl Iterator<Item = OwnerKind> + '_ {
		self.entries.iter().map(|(kind, _)| *kind)
	}
}

impl Default for MetaResolver {
	fn default() -> Self {
		Self::builtin()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn resolves_every_builtin_owner() {
		let resolver = MetaResolver::builtin();
		let pairs = OwnerKind::iter()
			.map(|kind| {
				let relation = resolver.resolve(kind).unwrap();
				(relation.meta_table.as_str(), relation.foreign_key.as_str())
			})
			.collect::<Vec<_>>();

		assert_eq!(
			pairs,
			vec![
				("commentmeta", "comment_id"),
				("postmeta", "post_id"),
				("termmeta", "term_id"),
				("usermeta", "user_id"),
			]
		);
	}

	#[test]
	fn parses_type_names_case_insensitively() {
		assert_eq!("post".parse::<OwnerKind>().unwrap(), OwnerKind::Post);
		assert_eq!("User".parse::<OwnerKind>().unwrap(), OwnerKind::User);
		assert_eq!(" TERM ".parse::<OwnerKind>().unwrap(), OwnerKind::Term);
	}

	#[test]
	fn unknown_type_names_are_configuration_errors() {
		let err = MetaResolver::builtin().resolve_name("Page").unwrap_err();
		assert!(matches!(err, MetaError::Configuration { ref owner, .. } if owner == "Page"));
		assert!(err.to_string().contains("Comment, Post, Term or User"));
	}

	#[test]
	fn kinds_left_out_of_the_table_fail_to_resolve() {
		let resolver = MetaResolver::with_owners([OwnerKind::Post]);
		assert!(resolver.resolve(OwnerKind::Post).is_ok());
		assert!(matches!(
			resolver.resolve(OwnerKind::Comment),
			Err(MetaError::Configuration { .. })
		));
	}

	#[test]
	fn first_entry_wins() {
		let resolver =
			MetaResolver::with_owners([OwnerKind::User, OwnerKind::Post, OwnerKind::User]);
		assert_eq!(resolver.owners().collect::<Vec<_>>().len(), 3);
		assert_eq!(resolver.resolve(OwnerKind::User).unwrap().meta_primary_key, "umeta_id");
	}

	#[test]
	fn builds_from_config() {
		let config = MetaConfig {
			owner_types: vec!["post".into(), "user".into()],
			..MetaConfig::default()
		};
		let resolver = MetaResolver::from_config(&config).unwrap();
		assert_eq!(resolver.owners().collect::<Vec<_>>(), vec![OwnerKind::Post, OwnerKind::User]);

		let config = MetaConfig {
			owner_types: vec!["post".into(), "attachment".into()],
			..MetaConfig::default()
		};
		assert!(MetaResolver::from_config(&config).unwrap_err().is_configuration());
	}
}
