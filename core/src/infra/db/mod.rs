//! Database infrastructure using SeaORM

use sea_orm::{ConnectOptions, Database as SeaDatabase, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod connection;
pub mod entities;
pub mod migration;

pub use connection::{HostConnection, TablePrefix};

/// Database wrapper for the meta store
pub struct Database {
	/// SeaORM database connection
	conn: DatabaseConnection,
}

impl Database {
	/// Create a new database at the specified path
	pub async fn create(path: &Path) -> Result<Self, DbErr> {
		// Ensure parent directory exists
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent)
				.map_err(|e| DbErr::Custom(format!("Failed to create directory: {}", e)))?;
		}

		let conn = SeaDatabase::connect(Self::file_options(format!(
			"sqlite://{}?mode=rwc",
			path.display()
		)))
		.await?;

		info!("Created new database at {:?}", path);

		Ok(Self { conn })
	}

	/// Open an existing database
	pub async fn open(path: &Path) -> Result<Self, DbErr> {
		if !path.exists() {
			return Err(DbErr::Custom(format!(
				"Database does not exist: {}",
				path.display()
			)));
		}

		let conn =
			SeaDatabase::connect(Self::file_options(format!("sqlite://{}", path.display()))).await?;

		info!("Opened database at {:?}", path);

		Ok(Self { conn })
	}

	/// Connect to any URL the record store understands
	pub async fn connect(url: &str) -> Result<Self, DbErr> {
		if url.contains(":memory:") {
			return Self::in_memory().await;
		}

		let conn = SeaDatabase::connect(Self::file_options(url.to_owned())).await?;
		info!("Connected to database at {}", url);

		Ok(Self { conn })
	}

	/// Private in-memory database, mostly for tests
	pub async fn in_memory() -> Result<Self, DbErr> {
		// A second pooled connection would see a different empty database
		let mut opt = ConnectOptions::new("sqlite::memory:");
		opt.max_connections(1)
			.min_connections(1)
			.sqlx_logging(false);

		let conn = SeaDatabase::connect(opt).await?;

		Ok(Self { conn })
	}

	fn file_options(url: String) -> ConnectOptions {
		let mut opt = ConnectOptions::new(url);
		opt.max_connections(10)
			.min_connections(1)
			.connect_timeout(Duration::from_secs(8))
			.idle_timeout(Duration::from_secs(8))
			.sqlx_logging(false); // We'll use tracing instead
		opt
	}

	/// Run migrations
	pub async fn migrate(&self) -> Result<(), DbErr> {
		migration::Migrator::up(&self.conn, None).await?;
		info!("Database migrations completed successfully");
		Ok(())
	}

	/// Get the database connection
	pub fn conn(&self) -> &DatabaseConnection {
		&self.conn
	}

	pub fn into_conn(self) -> DatabaseConnection {
		self.conn
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use sea_orm::{ConnectionTrait, Statement};
	use tempfile::TempDir;

	async fn table_exists(db: &Database, name: &str) -> bool {
		let backend = db.conn().get_database_backend();
		db.conn()
			.query_one(Statement::from_sql_and_values(
				backend,
				"SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?",
				[name.into()],
			))
			.await
			.unwrap()
			.is_some()
	}

	#[tokio::test]
	async fn creates_and_reopens_a_database_file() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("nested").join("meta.db");

		let db = Database::create(&path).await.unwrap();
		db.migrate().await.unwrap();
		drop(db);

		let db = Database::open(&path).await.unwrap();
		let tables = [
			"posts",
			"postmeta",
			"comments",
			"commentmeta",
			"terms",
			"termmeta",
			"users",
			"usermeta",
		];
		for table in tables {
			assert!(table_exists(&db, table).await, "missing {table}");
		}
	}

	#[tokio::test]
	async fn open_requires_an_existing_file() {
		let dir = TempDir::new().unwrap();
		let err = Database::open(&dir.path().join("missing.db")).await.err().unwrap();
		assert!(matches!(err, DbErr::Custom(_)));
	}

	#[tokio::test]
	async fn migrations_can_run_twice() {
		let db = Database::connect("sqlite::memory:").await.unwrap();
		db.migrate().await.unwrap();
		db.migrate().await.unwrap();
		assert!(table_exists(&db, "usermeta").await);
	}
}
