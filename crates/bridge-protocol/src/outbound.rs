//! Outbound action frames sent by the dashboard.

use serde::{Deserialize, Serialize};

/// Reasoning-effort selector for a chat submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThinkingLevel {
    /// Minimal reasoning effort.
    Low,
    /// Default reasoning effort.
    Medium,
    /// Maximum reasoning effort.
    High,
}

/// An action the dashboard sends over the realtime channel.
///
/// Encoding is pure and stateless; whether an action may be sent at all is
/// decided by the connection manager, not here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundAction {
    /// Submit a chat message.
    Chat {
        /// Message text.
        message: String,
        /// Target session, if the dashboard has one selected.
        #[serde(skip_serializing_if = "Option::is_none")]
        session_id: Option<String>,
        /// Model override for this submission.
        #[serde(skip_serializing_if = "Option::is_none")]
        model: Option<String>,
        /// Reasoning-effort override for this submission.
        #[serde(skip_serializing_if = "Option::is_none")]
        thinking_level: Option<ThinkingLevel>,
    },
    /// Keepalive ping.
    Ping,
    /// Request a status snapshot.
    Status,
    /// Abort the in-flight run of a session.
    Abort {
        /// Session whose run should be aborted.
        #[serde(skip_serializing_if = "Option::is_none")]
        session_id: Option<String>,
    },
}

impl OutboundAction {
    /// Wire discriminator of this action.
    #[must_use]
    pub fn action_type(&self) -> &'static str {
        match self {
            Self::Chat { .. } => "chat",
            Self::Ping => "ping",
            Self::Status => "status",
            Self::Abort { .. } => "abort",
        }
    }

    /// Encode this action as one wire text frame.
    pub fn to_frame(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
