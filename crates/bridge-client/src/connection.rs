//! Connection lifecycle management.
//!
//! Owns the single WebSocket to the gateway: connect, authenticate via the
//! `token` query parameter, fan inbound frames out to subscribers, keep the
//! socket alive, and reconnect with capped exponential backoff after any
//! failure. Transport errors never surface to callers; they feed the
//! reconnect loop and reach consumers only as `disconnected` events. The
//! loop retries forever — only [`GatewayClient::shutdown`] stops it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use bridge_core::ReconnectBackoff;
use bridge_protocol::{InboundEvent, OutboundAction, gateway_ws_url, inbound};

use crate::config::ClientConfig;
use crate::errors::Result;
use crate::keepalive::run_keepalive;
use crate::subscribers::{SubscriberRegistry, Subscription};

/// Client for the realtime channel to the gateway.
///
/// Create one per application mount with [`GatewayClient::connect`]; tear it
/// down with [`GatewayClient::shutdown`]. The subscriber registry is scoped
/// to the client, not to any particular socket, so registrations survive
/// reconnects.
pub struct GatewayClient {
    subscribers: Arc<SubscriberRegistry>,
    connected: Arc<AtomicBool>,
    outbound: Arc<Mutex<Option<mpsc::Sender<OutboundAction>>>>,
    shutdown: CancellationToken,
    supervisor: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClient")
            .field("connected", &self.connected.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl GatewayClient {
    /// Validate the endpoint and start the connection supervisor.
    ///
    /// Returns an error only for an unusable base URL; everything after
    /// that (refused connections, drops, handshake failures) is handled by
    /// the reconnect loop. Must be called from within a Tokio runtime.
    pub fn connect(config: ClientConfig) -> Result<Self> {
        let url = gateway_ws_url(&config.base_url, config.token.as_deref())?;

        let shared = Shared {
            subscribers: Arc::new(SubscriberRegistry::new()),
            connected: Arc::new(AtomicBool::new(false)),
            outbound: Arc::new(Mutex::new(None)),
        };
        let shutdown = CancellationToken::new();

        let client = Self {
            subscribers: Arc::clone(&shared.subscribers),
            connected: Arc::clone(&shared.connected),
            outbound: Arc::clone(&shared.outbound),
            shutdown: shutdown.clone(),
            supervisor: Mutex::new(None),
        };
        let handle = tokio::spawn(run_connection(shared, url, config, shutdown));
        *client.supervisor.lock() = Some(handle);
        Ok(client)
    }

    /// Whether the connection is currently open.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    /// Send an action over the open connection.
    ///
    /// While not open this is a no-op with a logged warning — never an
    /// error. Actions are not queued across disconnects; callers re-issue
    /// state-dependent actions after reconnect if they need to.
    pub fn send(&self, action: OutboundAction) {
        let action_type = action.action_type();
        let sender = self.outbound.lock().clone();
        match sender {
            Some(tx) if self.is_connected() => {
                if tx.try_send(action).is_err() {
                    warn!(action = action_type, "outbound queue unavailable, dropping action");
                }
            }
            _ => {
                warn!(action = action_type, "not connected, dropping outbound action");
            }
        }
    }

    /// Register a callback for every inbound event.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&InboundEvent) + Send + Sync + 'static,
    {
        self.subscribers.subscribe(callback)
    }

    /// Register a callback for events with a specific `type` discriminator.
    pub fn subscribe_filtered<F>(&self, event_type: impl Into<String>, callback: F) -> Subscription
    where
        F: Fn(&InboundEvent) + Send + Sync + 'static,
    {
        self.subscribers.subscribe_filtered(event_type, callback)
    }

    /// Tear the client down: cancel any pending reconnect, close the open
    /// socket, and wait for the supervisor to finish. Idempotent.
    pub async fn shutdown(&self) {
        self.shutdown.cancel();
        let handle = self.supervisor.lock().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!(error = %e, "connection supervisor ended abnormally");
            }
        }
    }
}

/// State shared between the client handle and the supervisor task.
struct Shared {
    subscribers: Arc<SubscriberRegistry>,
    connected: Arc<AtomicBool>,
    outbound: Arc<Mutex<Option<mpsc::Sender<OutboundAction>>>>,
}

/// Supervisor loop: connect, run the socket to completion, back off, repeat.
async fn run_connection(
    shared: Shared,
    url: Url,
    config: ClientConfig,
    shutdown: CancellationToken,
) {
    let mut backoff = ReconnectBackoff::new(
        config.reconnect_base_delay_ms,
        config.reconnect_max_delay_ms,
    );

    loop {
        if shutdown.is_cancelled() {
            break;
        }
        debug!(attempt = backoff.attempt(), "connecting to gateway");

        let connect = tokio::select! {
            result = connect_async(url.as_str()) => result,
            () = shutdown.cancelled() => break,
        };

        match connect {
            Ok((stream, _response)) => {
                info!("gateway connection open");
                backoff.reset();
                run_open_socket(&shared, stream, &config, &shutdown).await;
            }
            Err(e) => {
                warn!(error = %e, "gateway connect failed");
            }
        }

        if shutdown.is_cancelled() {
            break;
        }
        let delay = backoff.next_delay();
        debug!(?delay, "scheduling reconnect");
        tokio::select! {
            () = tokio::time::sleep(delay) => {}
            () = shutdown.cancelled() => break,
        }
    }
    debug!("connection supervisor stopped");
}

/// Drive one open socket until it closes, for whatever reason.
///
/// Entry: flag up, `connected` broadcast, keepalive armed. Exit: keepalive
/// and writer disarmed via the socket-scoped token, flag down,
/// `disconnected` broadcast. The caller decides whether to reconnect.
async fn run_open_socket(
    shared: &Shared,
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    config: &ClientConfig,
    shutdown: &CancellationToken,
) {
    let (mut write, mut read) = stream.split();
    let (tx, mut rx) = mpsc::channel::<OutboundAction>(config.outbound_queue_depth);

    *shared.outbound.lock() = Some(tx.clone());
    shared.connected.store(true, Ordering::Relaxed);
    shared.subscribers.broadcast(&InboundEvent::Connected);

    // Keepalive and writer live exactly as long as this socket.
    let socket_cancel = shutdown.child_token();
    let keepalive = tokio::spawn(run_keepalive(
        tx,
        Duration::from_millis(config.keepalive_interval_ms),
        socket_cancel.clone(),
    ));

    let writer_cancel = socket_cancel.clone();
    let writer = tokio::spawn(async move {
        loop {
            tokio::select! {
                action = rx.recv() => {
                    let Some(action) = action else { break };
                    let frame = match action.to_frame() {
                        Ok(frame) => frame,
                        Err(e) => {
                            warn!(action = action.action_type(), error = %e, "failed to encode outbound action");
                            continue;
                        }
                    };
                    if let Err(e) = write.send(Message::Text(frame.into())).await {
                        warn!(error = %e, "gateway write failed");
                        break;
                    }
                }
                () = writer_cancel.cancelled() => break,
            }
        }
    });

    loop {
        tokio::select! {
            message = read.next() => {
                match message {
                    Some(Ok(Message::Text(text))) => match inbound::parse_event(text.as_str()) {
                        Ok(event) => {
                            debug!(event_type = event.event_type(), "dispatching inbound event");
                            shared.subscribers.broadcast(&event);
                        }
                        Err(e) => {
                            warn!(error = %e, "undecodable inbound frame dropped");
                        }
                    },
                    Some(Ok(Message::Close(_))) => {
                        info!("gateway closed connection");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!(error = %e, "gateway read failed");
                        break;
                    }
                    None => {
                        info!("gateway stream ended");
                        break;
                    }
                }
            }
            () = shutdown.cancelled() => break,
        }
    }

    socket_cancel.cancel();
    *shared.outbound.lock() = None;
    shared.connected.store(false, Ordering::Relaxed);
    shared.subscribers.broadcast(&InboundEvent::Disconnected);
    let _ = keepalive.await;
    let _ = writer.await;
}
