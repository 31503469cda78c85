//! Host connection adapter
//!
//! Wraps the record store connection with the two host-level facts the meta
//! layer needs: the id generated by the most recent insert, and the table
//! prefix to use for a given table in a multi-tenant schema.

use sea_orm::DatabaseConnection;
use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::config::MetaConfig;

/// Tables shared by every tenant of a multi-tenant install
pub const DEFAULT_GLOBAL_TABLES: &[&str] = &[
	"blogs",
	"blogmeta",
	"blog_versions",
	"registration_log",
	"signups",
	"site",
	"sitemeta",
	"users",
	"usermeta",
];

/// Resolves the prefix for a table name
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TablePrefix {
	prefix: String,
	base_prefix: String,
	global_tables: HashSet<String>,
}

impl TablePrefix {
	pub fn new(
		prefix: impl Into<String>,
		base_prefix: impl Into<String>,
		global_tables: impl IntoIterator<Item = impl Into<String>>,
	) -> Self {
		Self {
			prefix: prefix.into(),
			base_prefix: base_prefix.into(),
			global_tables: global_tables.into_iter().map(Into::into).collect(),
		}
	}

	pub fn from_config(config: &MetaConfig) -> Self {
		Self::new(
			config.table_prefix.clone(),
			config.base_prefix.clone(),
			config.global_tables.iter().cloned(),
		)
	}

	/// Tenant prefix, or the base prefix when `table` is global.
	///
	/// Without a table name the tenant prefix is returned.
	pub fn prefix(&self, table: Option<&str>) -> &str {
		match table {
			Some(table) if self.global_tables.contains(table) => &self.base_prefix,
			_ => &self.prefix,
		}
	}

	/// Physical name of a logical table
	pub fn table(&self, name: &str) -> String {
		format!("{}{}", self.prefix(Some(name)), name)
	}

	pub fn is_global(&self, table: &str) -> bool {
		self.global_tables.contains(table)
	}
}

impl Default for TablePrefix {
	fn default() -> Self {
		Self::new("wp_", "wp_", DEFAULT_GLOBAL_TABLES.iter().copied())
	}
}

/// Record store connection plus host metadata
#[derive(Debug)]
pub struct HostConnection {
	conn: DatabaseConnection,
	prefix: TablePrefix,
	last_insert_id: AtomicI64,
}

impl HostConnection {
	pub fn new(conn: DatabaseConnection, prefix: TablePrefix) -> Self {
		Self {
			conn,
			prefix,
			last_insert_id: AtomicI64::new(0),
		}
	}

	pub fn conn(&self) -> &DatabaseConnection {
		&self.conn
	}

	/// Id generated by the most recent insert made through this connection
	pub fn last_insert_id(&self) -> Option<i64> {
		match self.last_insert_id.load(Ordering::Acquire) {
			0 => None,
			id => Some(id),
		}
	}

	pub(crate) fn record_insert(&self, id: i64) {
		self.last_insert_id.store(id, Ordering::Release);
	}

	pub fn prefix(&self, table: Option<&str>) -> &str {
		self.prefix.prefix(table)
	}

	pub fn table(&self, name: &str) -> String {
		self.prefix.table(name)
	}

	pub fn table_prefix(&self) -> &TablePrefix {
		&self.prefix
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn multisite() -> TablePrefix {
		TablePrefix::new("wp_3_", "wp_", DEFAULT_GLOBAL_TABLES.iter().copied())
	}

	#[test]
	fn tenant_tables_use_the_tenant_prefix() {
		let prefix = multisite();
		assert_eq!(prefix.prefix(Some("posts")), "wp_3_");
		assert_eq!(prefix.table("postmeta"), "wp_3_postmeta");
	}

	#[test]
	fn global_tables_use_the_base_prefix() {
		let prefix = multisite();
		assert_eq!(prefix.prefix(Some("users")), "wp_");
		assert_eq!(prefix.table("usermeta"), "wp_usermeta");
		assert!(prefix.is_global("sitemeta"));
	}

	#[test]
	fn no_table_name_yields_the_tenant_prefix() {
		assert_eq!(multisite().prefix(None), "wp_3_");
		assert_eq!(TablePrefix::default().prefix(None), "wp_");
	}
}
