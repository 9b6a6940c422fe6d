//! Inbound event frames pushed by the gateway.

use serde::{Deserialize, Serialize};

/// An event received over the realtime channel.
///
/// The set of discriminators is open on the gateway side: anything this
/// client does not recognize decodes to [`InboundEvent::Unknown`] instead of
/// failing, so a newer gateway never crashes the dispatcher.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEvent {
    /// The gateway acknowledged the connection.
    Connected,
    /// The gateway announced a disconnect.
    Disconnected,
    /// Status snapshot, shape owned by the gateway.
    Status {
        /// Opaque status payload.
        data: serde_json::Value,
    },
    /// Typing indicator toggle for the active session.
    Typing {
        /// Whether the assistant is currently typing.
        status: bool,
    },
    /// Assistant response chunk.
    Response {
        /// Chunk content.
        content: String,
        /// Session the chunk belongs to.
        session_id: String,
    },
    /// Error notice from the gateway.
    Error {
        /// Human-readable error description.
        error: String,
    },
    /// Keepalive acknowledgement.
    Pong,
    /// Dashboard rebuild in progress.
    #[serde(rename = "dashboard:building")]
    DashboardBuilding {
        /// Build progress as reported by the gateway.
        progress: f64,
    },
    /// Dashboard rebuild finished.
    #[serde(rename = "dashboard:ready")]
    DashboardReady {
        /// Version identifier of the fresh build.
        version: String,
    },
    /// The gateway asks the dashboard to reload itself.
    #[serde(rename = "dashboard:refresh")]
    DashboardRefresh,
    /// Any discriminator this client does not know about.
    #[serde(other)]
    Unknown,
}

impl InboundEvent {
    /// Wire discriminator of this event.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
            Self::Status { .. } => "status",
            Self::Typing { .. } => "typing",
            Self::Response { .. } => "response",
            Self::Error { .. } => "error",
            Self::Pong => "pong",
            Self::DashboardBuilding { .. } => "dashboard:building",
            Self::DashboardReady { .. } => "dashboard:ready",
            Self::DashboardRefresh => "dashboard:refresh",
            Self::Unknown => "unknown",
        }
    }
}

/// Decode one inbound text frame.
pub fn parse_event(frame: &str) -> Result<InboundEvent, serde_json::Error> {
    serde_json::from_str(frame)
}
