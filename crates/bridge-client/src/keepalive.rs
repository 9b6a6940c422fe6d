//! Keepalive ping transmission.
//!
//! One keepalive loop runs per open socket, armed on the open transition
//! and disarmed through the socket-scoped cancellation token the moment
//! that socket closes. The token binding is what rules out duplicate
//! timers and leaked timers across reconnects.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use bridge_protocol::OutboundAction;

/// Outcome of the keepalive loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeepaliveResult {
    /// The socket this loop was armed for has closed.
    Cancelled,
    /// The outbound queue is gone; the write task has exited.
    ChannelClosed,
}

/// Queue a ping at a fixed interval until `cancel` fires.
///
/// The first ping goes out one full interval after arming, not immediately;
/// the connection was just proven live by the open handshake.
pub async fn run_keepalive(
    outbound: mpsc::Sender<OutboundAction>,
    interval: Duration,
    cancel: CancellationToken,
) -> KeepaliveResult {
    let mut ticker = time::interval_at(time::Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                debug!("sending keepalive ping");
                if outbound.send(OutboundAction::Ping).await.is_err() {
                    return KeepaliveResult::ChannelClosed;
                }
            }
            () = cancel.cancelled() => {
                return KeepaliveResult::Cancelled;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn no_ping_before_first_interval() {
        let (tx, mut rx) = mpsc::channel(8);
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_keepalive(tx, Duration::from_secs(30), cancel.clone()));

        time::sleep(Duration::from_secs(29)).await;
        assert!(rx.try_recv().is_err());

        cancel.cancel();
        assert_eq!(handle.await.unwrap(), KeepaliveResult::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn pings_arrive_once_per_interval() {
        let (tx, mut rx) = mpsc::channel(8);
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_keepalive(tx, Duration::from_secs(30), cancel.clone()));

        time::sleep(Duration::from_secs(31)).await;
        assert_eq!(rx.try_recv().unwrap(), OutboundAction::Ping);
        assert!(rx.try_recv().is_err());

        time::sleep(Duration::from_secs(30)).await;
        assert_eq!(rx.try_recv().unwrap(), OutboundAction::Ping);
        assert!(rx.try_recv().is_err());

        cancel.cancel();
        assert_eq!(handle.await.unwrap(), KeepaliveResult::Cancelled);
    }

    #[tokio::test]
    async fn cancel_before_first_tick() {
        let (tx, mut rx) = mpsc::channel(8);
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_keepalive(tx, Duration::from_secs(30), cancel.clone()));

        cancel.cancel();
        assert_eq!(handle.await.unwrap(), KeepaliveResult::Cancelled);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn closed_channel_stops_the_loop() {
        let (tx, rx) = mpsc::channel(8);
        drop(rx);
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_keepalive(tx, Duration::from_secs(30), cancel));

        time::sleep(Duration::from_secs(31)).await;
        assert_eq!(handle.await.unwrap(), KeepaliveResult::ChannelClosed);
    }

    #[tokio::test(start_paused = true)]
    async fn no_pings_after_cancel() {
        let (tx, mut rx) = mpsc::channel(8);
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_keepalive(tx, Duration::from_secs(30), cancel.clone()));

        time::sleep(Duration::from_secs(31)).await;
        assert_eq!(rx.try_recv().unwrap(), OutboundAction::Ping);

        cancel.cancel();
        assert_eq!(handle.await.unwrap(), KeepaliveResult::Cancelled);

        time::sleep(Duration::from_secs(120)).await;
        assert!(rx.try_recv().is_err());
    }
}
