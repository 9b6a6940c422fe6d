//! Client configuration.

use serde::{Deserialize, Serialize};

use bridge_core::constants::{
    KEEPALIVE_INTERVAL_MS, RECONNECT_BASE_DELAY_MS, RECONNECT_MAX_DELAY_MS,
};

/// Configuration for the gateway client.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base origin URL the dashboard was served from
    /// (e.g. `"http://127.0.0.1:4300"`).
    pub base_url: String,
    /// Auth token attached as a `token` query parameter, if any.
    pub token: Option<String>,
    /// Keepalive ping interval in milliseconds.
    pub keepalive_interval_ms: u64,
    /// Base reconnect delay in milliseconds.
    pub reconnect_base_delay_ms: u64,
    /// Reconnect delay cap in milliseconds.
    pub reconnect_max_delay_ms: u64,
    /// Depth of the outbound action queue.
    pub outbound_queue_depth: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:4300".into(),
            token: None,
            keepalive_interval_ms: KEEPALIVE_INTERVAL_MS,
            reconnect_base_delay_ms: RECONNECT_BASE_DELAY_MS,
            reconnect_max_delay_ms: RECONNECT_MAX_DELAY_MS,
            outbound_queue_depth: 32,
        }
    }
}

impl ClientConfig {
    /// Apply environment variable overrides from the process environment.
    ///
    /// - `BRIDGE_GATEWAY_URL` — base origin URL
    /// - `BRIDGE_GATEWAY_TOKEN` — auth token
    /// - `BRIDGE_KEEPALIVE_INTERVAL` — ping interval in ms (1000–600000)
    ///
    /// Invalid values are silently ignored (fall back to the configured
    /// value).
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    /// Apply overrides from an arbitrary lookup (testable seam).
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = read_string(&lookup, "BRIDGE_GATEWAY_URL") {
            self.base_url = v;
        }
        if let Some(v) = read_string(&lookup, "BRIDGE_GATEWAY_TOKEN") {
            self.token = Some(v);
        }
        if let Some(v) = read_u64(&lookup, "BRIDGE_KEEPALIVE_INTERVAL", 1000, 600_000) {
            self.keepalive_interval_ms = v;
        }
    }
}

fn read_string<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).filter(|v| !v.trim().is_empty())
}

fn read_u64<F>(lookup: &F, name: &str, min: u64, max: u64) -> Option<u64>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)?
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|v| (min..=max).contains(v))
}
