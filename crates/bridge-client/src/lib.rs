//! # bridge-client
//!
//! Realtime transport client for the Bridge dashboard: maintains one
//! persistent WebSocket to the gateway, fans inbound events out to any
//! number of independent subscribers, keeps the connection alive, and
//! recovers from disconnects with capped exponential backoff.
//!
//! The consumer-facing surface is [`GatewayClient`]: `send`, `subscribe`,
//! `subscribe_filtered`, `is_connected`, `shutdown`. Everything else
//! (socket callbacks, timers, reconnect scheduling) is driven internally.

#![deny(unsafe_code)]

pub mod config;
pub mod connection;
pub mod errors;
pub mod keepalive;
pub mod subscribers;

pub use config::ClientConfig;
pub use connection::GatewayClient;
pub use errors::{ClientError, Result};
pub use subscribers::{SubscriberRegistry, Subscription};
