//! Package-level constants.

/// Current version of the Bridge client (sourced from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name.
pub const NAME: &str = "bridge";

/// Well-known WebSocket path on the gateway.
pub const GATEWAY_WS_PATH: &str = "/ws";

/// Interval between keepalive pings while a connection is open.
pub const KEEPALIVE_INTERVAL_MS: u64 = 30_000;

/// Base delay for the first reconnect attempt.
pub const RECONNECT_BASE_DELAY_MS: u64 = 1_000;

/// Cap on the reconnect delay, regardless of attempt count.
pub const RECONNECT_MAX_DELAY_MS: u64 = 30_000;
