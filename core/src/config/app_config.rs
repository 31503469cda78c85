//! Meta store configuration

use super::migration::Migrate;
use crate::infra::db::connection::DEFAULT_GLOBAL_TABLES;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "wpmeta.json";

/// Main meta store configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaConfig {
	/// Config schema version
	pub version: u32,

	/// Directory the config file lives in
	#[serde(skip)]
	pub config_dir: Option<PathBuf>,

	/// Record store connection URL
	pub database_url: String,

	/// Prefix for tables private to the current tenant
	pub table_prefix: String,

	/// Prefix for tables shared by every tenant
	pub base_prefix: String,

	/// Tables that use `base_prefix`
	pub global_tables: Vec<String>,

	/// Owner types meta can be attached to, in resolution order
	pub owner_types: Vec<String>,

	/// Logging level
	pub log_level: String,
}

impl MetaConfig {
	/// Load configuration from a specific config directory
	pub fn load_from(config_dir: &Path) -> Result<Self> {
		let config_path = config_dir.join(CONFIG_FILE_NAME);

		if config_path.exists() {
			info!("Loading config from {:?}", config_path);
			let json = fs::read_to_string(&config_path)?;
			let mut config: MetaConfig = serde_json::from_str(&json)?;
			config.config_dir = Some(config_dir.to_path_buf());

			// Apply migrations if needed
			if config.needs_migration() {
				info!(
					"Migrating config from v{} to v{}",
					config.version,
					Self::target_version()
				);
				config.migrate()?;
				config.save()?;
			}

			Ok(config)
		} else {
			warn!("No config found, creating default at {:?}", config_path);
			let config = Self::default_with_dir(config_dir.to_path_buf());
			config.save()?;
			Ok(config)
		}
	}

	/// Create default configuration living in `config_dir`
	pub fn default_with_dir(config_dir: PathBuf) -> Self {
		Self {
			config_dir: Some(config_dir),
			..Self::default()
		}
	}

	/// Save configuration to disk
	pub fn save(&self) -> Result<()> {
		let config_dir = self
			.config_dir
			.as_ref()
			.ok_or_else(|| anyhow!("Config has no directory to save to"))?;

		fs::create_dir_all(config_dir)?;

		let config_path = config_dir.join(CONFIG_FILE_NAME);
		let json = serde_json::to_string_pretty(self)?;
		fs::write(&config_path, json)?;
		info!("Saved config to {:?}", config_path);
		Ok(())
	}
}

impl Default for MetaConfig {
	fn default() -> Self {
		Self {
			version: Self::target_version(),
			config_dir: None,
			database_url: "sqlite::memory:".to_string(),
			table_prefix: "wp_".to_string(),
			base_prefix: "wp_".to_string(),
			global_tables: DEFAULT_GLOBAL_TABLES.iter().map(|t| t.to_string()).collect(),
			owner_types: ["comment", "post", "term", "user"]
				.iter()
				.map(|t| t.to_string())
				.collect(),
			log_level: "info".to_string(),
		}
	}
}

impl Migrate for MetaConfig {
	fn current_version(&self) -> u32 {
		self.version
	}

	fn target_version() -> u32 {
		2 // Current schema version
	}

	fn migrate(&mut self) -> Result<()> {
		loop {
			match self.version {
				0 => {
					self.version = 1;
				}
				1 => {
					// v1 had no notion of multi-tenant prefixes
					if self.base_prefix.is_empty() {
						self.base_prefix = self.table_prefix.clone();
					}
					self.version = 2;
				}
				2 => return Ok(()), // Already at target version
				v => return Err(anyhow!("Unknown config version: {}", v)),
			}
		}
	}
}
