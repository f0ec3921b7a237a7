//! Tracing setup for tests.
//!
//! Output is controlled by `TSZ_LOG` (falling back to `RUST_LOG`) and
//! `TSZ_LOG_FORMAT` (`text` or `json`):
//!
//! ```bash
//! TSZ_LOG=tsz_nodebuilder=trace cargo test -p tsz-nodebuilder
//! TSZ_LOG=debug TSZ_LOG_FORMAT=json cargo test
//! ```

use std::sync::Once;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn from_env() -> Self {
        match std::env::var("TSZ_LOG_FORMAT")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var("TSZ_LOG") {
        EnvFilter::builder().parse_lossy(val)
    } else {
        EnvFilter::from_default_env()
    }
}

static INIT: Once = Once::new();

/// Install a test-captured subscriber once per process. Does nothing unless
/// `TSZ_LOG` or `RUST_LOG` is set.
pub fn init_tracing() {
    if std::env::var("TSZ_LOG").is_err() && std::env::var("RUST_LOG").is_err() {
        return;
    }
    INIT.call_once(|| {
        let filter = build_filter();
        // Another harness may already own the global subscriber.
        let _ = match LogFormat::from_env() {
            LogFormat::Json => Registry::default()
                .with(filter)
                .with(fmt::layer().json().with_test_writer())
                .try_init(),
            LogFormat::Text => Registry::default()
                .with(filter)
                .with(fmt::layer().with_test_writer())
                .try_init(),
        };
    });
}
