//! Gateway endpoint construction.
//!
//! The dashboard is served from the same origin as the gateway, so the
//! realtime endpoint is derived from the base URL the dashboard was loaded
//! from: secure origins upgrade to `wss`, plain origins to `ws`, always on
//! the well-known `/ws` path. An auth token, when present, rides along as a
//! `token` query parameter; the gateway decides whether a tokenless connect
//! is acceptable.

use thiserror::Error;
use url::Url;

use bridge_core::constants::GATEWAY_WS_PATH;

/// Errors from endpoint construction.
#[derive(Debug, Error)]
pub enum UrlError {
    /// The base URL could not be parsed.
    #[error("invalid gateway base URL: {0}")]
    Parse(#[from] url::ParseError),
    /// The base URL has a scheme with no WebSocket equivalent.
    #[error("unsupported gateway URL scheme: {0}")]
    UnsupportedScheme(String),
    /// The base URL carries no host.
    #[error("gateway base URL has no host")]
    MissingHost,
}

/// Build the realtime endpoint URL from a base origin URL.
pub fn gateway_ws_url(base: &str, token: Option<&str>) -> Result<Url, UrlError> {
    let base = Url::parse(base)?;
    let scheme = match base.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => return Err(UrlError::UnsupportedScheme(other.to_string())),
    };
    let host = base.host_str().ok_or(UrlError::MissingHost)?;

    let mut endpoint = match base.port() {
        Some(port) => format!("{scheme}://{host}:{port}"),
        None => format!("{scheme}://{host}"),
    };
    endpoint.push_str(GATEWAY_WS_PATH);

    let mut url = Url::parse(&endpoint)?;
    if let Some(token) = token {
        let _ = url.query_pairs_mut().append_pair("token", token);
    }
    Ok(url)
}
