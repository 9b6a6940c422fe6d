//! # bridge-logging
//!
//! Structured logging with `tracing` for the Bridge client.
//!
//! Library crates emit spans and events; the binary calls [`init`] once at
//! startup to install a formatting subscriber. The filter comes from
//! `RUST_LOG` when set, otherwise from the supplied default directive.

#![deny(unsafe_code)]

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `default_filter` is used when `RUST_LOG` is not set (e.g. `"info"` or
/// `"bridge_client=debug,info"`). Calling this more than once is a no-op;
/// the first subscriber wins.
pub fn init(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
