//! Error types for meta operations

use thiserror::Error;

/// Human readable list of the owner types that can carry meta
pub const SUPPORTED_OWNERS: &str = "Comment, Post, Term or User";

/// Meta subsystem errors
#[derive(Error, Debug)]
pub enum MetaError {
	/// Owner type is not part of the supported set, or was left out of the
	/// resolver's configuration
	#[error("{owner} must be one of the built-in owner types: {supported}")]
	Configuration {
		owner: String,
		supported: &'static str,
	},

	/// Comparison operator could not be parsed
	#[error("Unknown meta operator: {0}")]
	InvalidOperator(String),

	/// Record store failure, passed through untouched
	#[error(transparent)]
	Database(#[from] sea_orm::DbErr),

	/// Value could not be encoded for storage
	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

impl MetaError {
	pub fn unsupported_owner(owner: impl Into<String>) -> Self {
		Self::Configuration {
			owner: owner.into(),
			supported: SUPPORTED_OWNERS,
		}
	}

	/// Whether this is a usage error rather than a data error
	pub fn is_configuration(&self) -> bool {
		matches!(self, Self::Configuration { .. } | Self::InvalidOperator(_))
	}
}

/// Result type for meta operations
pub type Result<T> = std::result::Result<T, MetaError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn configuration_error_names_owner_and_supported_set() {
		let err = MetaError::unsupported_owner("Page");
		assert_eq!(
			err.to_string(),
			"Page must be one of the built-in owner types: Comment, Post, Term or User"
		);
		assert!(err.is_configuration());
	}

	#[test]
	fn database_errors_are_transparent() {
		let err = MetaError::from(sea_orm::DbErr::Custom("disk full".into()));
		assert_eq!(err.to_string(), sea_orm::DbErr::Custom("disk full".into()).to_string());
		assert!(!err.is_configuration());
	}
}
