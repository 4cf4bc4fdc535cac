//! The sync client.

use crate::cache::SnapshotCache;
use crate::config::{DeviceIdentity, YnisonConfig};
use crate::error::{Result, YnisonError};
use crate::events::{CloseReason, ConnectionState, Lifecycle, SyncEvent};
use crate::frame::{Frame, UndecodableFrame};
use crate::keepalive::{self, KeepAlive, SharedSink};
use crate::negotiator;
use crate::protocol::{self, BootstrapMessage};
use crate::resolver;
use crate::types::{PlayerSnapshot, RedirectInfo};
use futures_util::stream::SplitStream;
use futures_util::{SinkExt, StreamExt};
use std::fmt;
use std::io;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::{broadcast, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use ymusic_core::{Track, TrackResolver};

type StateStream = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// Realtime player-state client for one logical connection.
///
/// ```no_run
/// # use std::sync::Arc;
/// # use ymusic_ynison::{DeviceIdentity, SyncEvent, YnisonClient};
/// # async fn run(resolver: Arc<dyn ymusic_core::TrackResolver>) -> ymusic_ynison::Result<()> {
/// let client = YnisonClient::new("token", DeviceIdentity::generate("my-app"), resolver);
/// let mut events = client.subscribe();
/// client.connect().await?;
///
/// while let Ok(event) = events.recv().await {
///     match event {
///         SyncEvent::Snapshot(_) => {
///             if let Some(track) = client.current_track().await? {
///                 println!("Now playing: {}", track.title);
///             }
///         }
///         SyncEvent::Closed(reason) => {
///             println!("{reason}");
///             break;
///         }
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct YnisonClient {
    token: String,
    identity: DeviceIdentity,
    config: YnisonConfig,
    resolver: Arc<dyn TrackResolver>,
    cache: SnapshotCache,
    lifecycle: Arc<Lifecycle>,
    connection: Mutex<Option<Connection>>,
}

/// Tasks and write half of an open state channel.
struct Connection {
    sink: SharedSink,
    cancel: CancellationToken,
    reader: Option<JoinHandle<()>>,
    keepalive: Option<JoinHandle<()>>,
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.cancel.cancel();
        if let Some(reader) = &self.reader {
            reader.abort();
        }
        if let Some(keepalive) = &self.keepalive {
            keepalive.abort();
        }
    }
}

impl YnisonClient {
    /// Client for the production service
    pub fn new(
        token: impl Into<String>,
        identity: DeviceIdentity,
        resolver: Arc<dyn TrackResolver>,
    ) -> Self {
        Self::with_config(token, identity, resolver, YnisonConfig::default())
    }

    pub fn with_config(
        token: impl Into<String>,
        identity: DeviceIdentity,
        resolver: Arc<dyn TrackResolver>,
        config: YnisonConfig,
    ) -> Self {
        let lifecycle = Arc::new(Lifecycle::new(config.event_capacity));
        Self {
            token: token.into(),
            identity,
            config,
            resolver,
            cache: SnapshotCache::new(),
            lifecycle,
            connection: Mutex::new(None),
        }
    }

    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    /// Negotiate, open the state channel and start the background tasks.
    ///
    /// Only valid on a fresh client. On failure the client ends in
    /// [`ConnectionState::ErrorClosed`] and no `Closed` event is published.
    ///
    /// # Errors
    /// - [`YnisonError::InvalidState`] if the client was already used
    /// - [`YnisonError::Negotiation`] if the redirector handshake failed
    /// - [`YnisonError::Channel`] if the state channel could not be opened
    ///   or the bootstrap message could not be sent
    pub async fn connect(&self) -> Result<()> {
        let mut slot = self.connection.lock().await;

        if !self
            .lifecycle
            .advance(ConnectionState::Idle, ConnectionState::Negotiating)
        {
            return Err(YnisonError::InvalidState(format!(
                "connect requires an idle client, state is {}",
                self.lifecycle.state()
            )));
        }

        match self.open().await {
            Ok(connection) => {
                *slot = Some(connection);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Ynison connect failed");
                self.lifecycle.fail();
                Err(e)
            }
        }
    }

    async fn open(&self) -> Result<Connection> {
        let redirect = negotiator::negotiate(&self.config, &self.token, &self.identity).await?;

        self.lifecycle
            .advance(ConnectionState::Negotiating, ConnectionState::Bootstrapping);

        let stream = self.open_state_channel(&redirect).await?;
        let (mut sink, stream) = stream.split();

        let bootstrap = BootstrapMessage::now(&self.identity).to_json()?;
        sink.send(Message::Text(bootstrap)).await?;
        debug!("Bootstrap sent");

        let sink: SharedSink = Arc::new(Mutex::new(sink));
        let cancel = CancellationToken::new();

        self.lifecycle
            .advance(ConnectionState::Bootstrapping, ConnectionState::Active);
        info!(
            host = %redirect.host,
            session_id = %redirect.session_id,
            device_id = %self.identity.device_id,
            "Ynison connected"
        );

        let reader = tokio::spawn(read_loop(
            stream,
            self.cache.clone(),
            Arc::clone(&self.lifecycle),
            cancel.clone(),
            Arc::clone(&sink),
        ));

        let keepalive = KeepAlive::from_params(redirect.keep_alive_params.as_ref()).map(|schedule| {
            debug!(interval = ?schedule.interval, "Starting keepalive");
            keepalive::spawn(Arc::clone(&sink), schedule, cancel.clone())
        });

        Ok(Connection {
            sink,
            cancel,
            reader: Some(reader),
            keepalive,
        })
    }

    async fn open_state_channel(
        &self,
        redirect: &RedirectInfo,
    ) -> Result<WebSocketStream<MaybeTlsStream<TcpStream>>> {
        let url = protocol::state_url(&self.config.redirector_url, &redirect.host)?;
        let request = protocol::build_request(
            &url,
            &self.token,
            &self.config,
            &self.identity,
            Some(&redirect.redirect_ticket),
        )?;

        debug!(%url, "Opening state channel");
        let (stream, _) = timeout(self.config.handshake_timeout, connect_async(request))
            .await
            .map_err(|_| {
                tungstenite::Error::Io(io::Error::new(
                    io::ErrorKind::TimedOut,
                    "state channel handshake timed out",
                ))
            })??;

        Ok(stream)
    }

    /// Copy of the latest snapshot, `None` before the first one
    pub async fn snapshot(&self) -> Option<PlayerSnapshot> {
        self.cache.get().await
    }

    /// Track metadata for the item currently playing.
    ///
    /// # Errors
    /// Returns [`YnisonError::Resolve`] if the track lookup failed
    pub async fn current_track(&self) -> Result<Option<Track>> {
        let snapshot = self.cache.get().await;
        resolver::resolve_current(snapshot.as_ref(), self.resolver.as_ref()).await
    }

    /// New receiver for snapshot and close events.
    ///
    /// Subscribe before `connect` to see every event.
    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.lifecycle.subscribe()
    }

    pub fn state(&self) -> ConnectionState {
        self.lifecycle.state()
    }

    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.lifecycle.watch()
    }

    /// Stop the keepalive, close the state channel and wait for the read
    /// loop to finish.
    ///
    /// Safe to call any number of times and after the connection failed.
    /// Publishes `Closed(Requested)` only when it ends an active connection.
    pub async fn close(&self) {
        let mut slot = self.connection.lock().await;

        self.lifecycle.terminate(
            ConnectionState::Active,
            ConnectionState::Closed,
            CloseReason::Requested,
        );

        let Some(mut connection) = slot.take() else {
            return;
        };

        connection.cancel.cancel();

        {
            let mut sink = connection.sink.lock().await;
            let frame = CloseFrame {
                code: CloseCode::Normal,
                reason: "".into(),
            };
            if let Err(e) = sink.send(Message::Close(Some(frame))).await {
                debug!(error = %e, "Close frame not sent");
            }
            if let Err(e) = sink.close().await {
                debug!(error = %e, "State channel close failed");
            }
        }

        if let Some(mut reader) = connection.reader.take() {
            if timeout(self.config.close_timeout, &mut reader).await.is_err() {
                warn!(timeout = ?self.config.close_timeout, "Read loop did not finish, aborting");
                reader.abort();
            }
        }
    }
}

impl fmt::Debug for YnisonClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YnisonClient")
            .field("identity", &self.identity)
            .field("config", &self.config)
            .field("state", &self.lifecycle.state())
            .field("token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

/// Consume inbound frames until the channel ends or the server reports an
/// error.
async fn read_loop(
    mut stream: StateStream,
    cache: SnapshotCache,
    lifecycle: Arc<Lifecycle>,
    cancel: CancellationToken,
    sink: SharedSink,
) {
    let reason = loop {
        let payload = match stream.next().await {
            Some(Ok(Message::Text(text))) => text.into_bytes(),
            Some(Ok(Message::Binary(data))) => data,
            Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_))) => continue,
            Some(Ok(Message::Close(frame))) => {
                let detail = frame.map_or_else(|| "no close frame".to_string(), |f| f.to_string());
                break CloseReason::Channel(format!("closed by server: {detail}"));
            }
            Some(Err(e)) => break CloseReason::Channel(e.to_string()),
            None => break CloseReason::Channel("stream ended".to_string()),
        };

        match Frame::decode(&payload) {
            Ok(Frame::ServerError(error)) => {
                warn!(%error, "Ynison server error");
                break CloseReason::Server(error);
            }
            Ok(Frame::Snapshot(snapshot)) => {
                debug!(timestamp_ms = snapshot.timestamp_ms, "Snapshot received");
                cache.replace(snapshot.clone()).await;
                lifecycle.publish(SyncEvent::Snapshot(snapshot));
            }
            Ok(Frame::Unrecognized) => {
                debug!(bytes = payload.len(), "Ignoring frame without player state");
            }
            Err(UndecodableFrame(error)) => {
                warn!(%error, bytes = payload.len(), "Dropping undecodable frame");
            }
        }
    };

    cancel.cancel();
    lifecycle.terminate(ConnectionState::Active, ConnectionState::ErrorClosed, reason);

    if let Err(e) = sink.lock().await.close().await {
        debug!(error = %e, "State channel already closed");
    }
}
