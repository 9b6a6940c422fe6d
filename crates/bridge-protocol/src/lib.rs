//! # bridge-protocol
//!
//! Wire protocol for the realtime channel between the Bridge dashboard and
//! the gateway. Frames are JSON-encoded text messages discriminated by a
//! `type` field:
//!
//! - [`InboundEvent`]: events the gateway pushes to the dashboard
//! - [`OutboundAction`]: actions the dashboard sends to the gateway
//! - [`gateway_ws_url`]: endpoint construction (scheme mapping, `/ws` path,
//!   optional `token` query parameter)

#![deny(unsafe_code)]

pub mod inbound;
pub mod outbound;
pub mod url;

pub use inbound::InboundEvent;
pub use outbound::{OutboundAction, ThinkingLevel};
pub use url::{UrlError, gateway_ws_url};
