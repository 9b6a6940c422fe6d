//! Client error types.

use thiserror::Error;

/// Errors that can occur when starting the client.
///
/// Note the narrow scope: once running, the client never surfaces transport
/// failures as errors. Disconnects feed the reconnect loop and reach
/// consumers only as `disconnected` events.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configured gateway base URL is unusable.
    #[error(transparent)]
    Url(#[from] bridge_protocol::UrlError),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_error_display_passes_through() {
        let err: ClientError = bridge_protocol::UrlError::MissingHost.into();
        assert_eq!(err.to_string(), "gateway base URL has no host");
    }
}
