//! Ynison: realtime player-state sync for Yandex Music
//!
//! The client negotiates a session with the redirector, opens the state
//! channel on the host it was assigned, announces itself with a bootstrap
//! message and then keeps a cached copy of the latest player snapshot while
//! pinging the server on the advertised schedule.
//!
//! # Architecture
//!
//! - **Negotiator**: one-shot control channel returning [`RedirectInfo`]
//! - **Read loop**: classifies inbound frames, replaces the snapshot cache
//!   and publishes [`SyncEvent`]s
//! - **Keepalive**: websocket pings, only when the server asked for them
//! - **Resolution**: maps the current queue item to track metadata through a
//!   [`ymusic_core::TrackResolver`]
//!
//! Connections are never retried internally. A client serves exactly one
//! connection; build a new one to reconnect.

#![forbid(unsafe_code)]

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod frame;
pub mod keepalive;
pub mod negotiator;
pub mod protocol;
pub mod resolver;
pub mod types;

pub use cache::SnapshotCache;
pub use client::YnisonClient;
pub use config::{DeviceIdentity, DeviceType, YnisonConfig, DEFAULT_REDIRECTOR_URL};
pub use error::{NegotiationStage, Result, YnisonError};
pub use events::{CloseReason, ConnectionState, SyncEvent};
pub use frame::Frame;
pub use keepalive::KeepAlive;
pub use resolver::current_playable;
pub use types::{
    DeviceFull, KeepAliveParams, PlayableItem, PlayerQueue, PlayerSnapshot, PlayerState,
    PlayerStatus, RedirectInfo, ServerError, VersionMarker,
};
