//! Configuration management

mod app_config;
pub mod migration;

pub use app_config::{MetaConfig, CONFIG_FILE_NAME};
pub use migration::Migrate;
