//! Periodic websocket pings on the state channel.

use crate::types::KeepAliveParams;
use futures_util::stream::SplitSink;
use futures_util::SinkExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, timeout, Instant, MissedTickBehavior};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Write half of the state channel, shared by the keepalive and `close`.
pub(crate) type SharedSink =
    Arc<Mutex<SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>>>;

/// Ping schedule derived from the redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeepAlive {
    pub interval: Duration,
    /// Bound on a single send, `None` for unbounded
    pub send_timeout: Option<Duration>,
}

impl KeepAlive {
    /// `None` unless the server asked for a positive interval.
    pub fn from_params(params: Option<&KeepAliveParams>) -> Option<Self> {
        let params = params?;
        let secs = u64::try_from(params.keep_alive_time_seconds).ok().filter(|s| *s > 0)?;
        let send_timeout = u64::try_from(params.keep_alive_timeout_seconds)
            .ok()
            .filter(|s| *s > 0)
            .map(Duration::from_secs);

        Some(Self {
            interval: Duration::from_secs(secs),
            send_timeout,
        })
    }
}

/// Start pinging until `cancel` fires or a ping fails.
///
/// A failed ping only stops the schedule; detecting a dead channel is the
/// read loop's job.
pub(crate) fn spawn(sink: SharedSink, schedule: KeepAlive, cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + schedule.interval, schedule.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let send = async {
                let mut sink = sink.lock().await;
                sink.send(Message::Ping(Vec::new())).await
            };

            let result = match schedule.send_timeout {
                Some(limit) => match timeout(limit, send).await {
                    Ok(result) => result.map_err(|e| e.to_string()),
                    Err(_) => Err(format!("ping timed out after {limit:?}")),
                },
                None => send.await.map_err(|e| e.to_string()),
            };

            match result {
                Ok(()) => debug!("Keepalive ping sent"),
                Err(error) => {
                    warn!(%error, "Keepalive ping failed, stopping keepalive");
                    break;
                }
            }
        }
        debug!("Keepalive stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(time: i64, timeout: i64) -> KeepAliveParams {
        KeepAliveParams {
            keep_alive_time_seconds: time,
            keep_alive_timeout_seconds: timeout,
        }
    }

    #[test]
    fn disabled_without_positive_interval() {
        assert!(KeepAlive::from_params(None).is_none());
        assert!(KeepAlive::from_params(Some(&params(0, 5))).is_none());
        assert!(KeepAlive::from_params(Some(&params(-3, 5))).is_none());
    }

    #[test]
    fn timeout_is_optional() {
        let schedule = KeepAlive::from_params(Some(&params(30, 0))).unwrap();
        assert_eq!(schedule.interval, Duration::from_secs(30));
        assert!(schedule.send_timeout.is_none());

        let schedule = KeepAlive::from_params(Some(&params(30, 10))).unwrap();
        assert_eq!(schedule.send_timeout, Some(Duration::from_secs(10)));
    }
}
