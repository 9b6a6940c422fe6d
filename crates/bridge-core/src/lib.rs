//! # bridge-core
//!
//! Foundation pieces shared by the Bridge dashboard client crates:
//!
//! - **Constants**: well-known gateway path, keepalive and backoff defaults
//! - **Backoff**: capped exponential reconnect delay calculation

#![deny(unsafe_code)]

pub mod backoff;
pub mod constants;

pub use backoff::ReconnectBackoff;
