//! Tracing setup

use tracing::Subscriber;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::MetaConfig;

/// `RUST_LOG` when set, otherwise the configured level for this crate
pub fn filter(config: &MetaConfig) -> EnvFilter {
	EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback_filter(config))
}

fn fallback_filter(config: &MetaConfig) -> EnvFilter {
	EnvFilter::new(format!("warn,wpmeta_core={}", config.log_level))
}

/// Stderr subscriber behind `filter`
pub fn subscriber(filter: EnvFilter) -> impl Subscriber + Send + Sync + 'static {
	tracing_subscriber::registry()
		.with(filter)
		.with(fmt::layer().with_writer(std::io::stderr).with_target(true))
}

/// Install the global subscriber. Does nothing if one is already set.
pub fn init(config: &MetaConfig) {
	let _ = subscriber(filter(config)).try_init();
}
