//! Connection lifecycle and event fan-out.

use crate::types::{PlayerSnapshot, ServerError};
use std::fmt;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info};

/// Lifecycle of one connection.
///
/// `Idle → Negotiating → Bootstrapping → Active → Closed`, with any failure
/// ending in `ErrorClosed`. Both terminal states are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Idle,
    Negotiating,
    Bootstrapping,
    Active,
    Closed,
    ErrorClosed,
}

impl ConnectionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Closed | Self::ErrorClosed)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Negotiating => "negotiating",
            Self::Bootstrapping => "bootstrapping",
            Self::Active => "active",
            Self::Closed => "closed",
            Self::ErrorClosed => "error-closed",
        })
    }
}

/// Why the connection ended.
#[derive(Debug, Clone, PartialEq)]
pub enum CloseReason {
    /// `close` was called
    Requested,
    /// Server sent an error frame
    Server(ServerError),
    /// The channel failed or the remote side closed it
    Channel(String),
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Requested => f.write_str("closed by client"),
            Self::Server(err) => write!(f, "server error: {err}"),
            Self::Channel(msg) => write!(f, "channel closed: {msg}"),
        }
    }
}

/// Event delivered to subscribers, in publication order.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    /// A new snapshot was cached
    Snapshot(PlayerSnapshot),
    /// The connection ended. Published exactly once per connection.
    Closed(CloseReason),
}

/// State machine plus event channel.
///
/// Every transition goes through a compare-and-set on the watch channel, so
/// whichever task wins the move into a terminal state is the one that
/// publishes `Closed`.
#[derive(Debug)]
pub(crate) struct Lifecycle {
    state: watch::Sender<ConnectionState>,
    events: broadcast::Sender<SyncEvent>,
}

impl Lifecycle {
    pub fn new(event_capacity: usize) -> Self {
        let (state, _) = watch::channel(ConnectionState::Idle);
        let (events, _) = broadcast::channel(event_capacity.max(1));
        Self { state, events }
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    pub fn watch(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.events.subscribe()
    }

    /// Move `from → to`. Returns false if the state was not `from`.
    pub fn advance(&self, from: ConnectionState, to: ConnectionState) -> bool {
        let moved = self.state.send_if_modified(|current| {
            if *current == from {
                *current = to;
                true
            } else {
                false
            }
        });
        if moved {
            debug!(%from, %to, "Connection state changed");
        }
        moved
    }

    /// Enter a terminal state from `from`, publishing `Closed(reason)` if
    /// this call made the transition.
    pub fn terminate(&self, from: ConnectionState, to: ConnectionState, reason: CloseReason) -> bool {
        if !self.advance(from, to) {
            return false;
        }
        info!(%reason, "Ynison connection closed");
        self.publish(SyncEvent::Closed(reason));
        true
    }

    /// Fail a connection that never became active. No event is published.
    pub fn fail(&self) {
        self.state.send_if_modified(|current| {
            if current.is_terminal() {
                false
            } else {
                *current = ConnectionState::ErrorClosed;
                true
            }
        });
    }

    pub fn publish(&self, event: SyncEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_only_from_expected_state() {
        let lifecycle = Lifecycle::new(4);
        assert!(!lifecycle.advance(ConnectionState::Active, ConnectionState::Closed));
        assert!(lifecycle.advance(ConnectionState::Idle, ConnectionState::Negotiating));
        assert_eq!(lifecycle.state(), ConnectionState::Negotiating);
    }

    #[test]
    fn closed_is_published_once() {
        let lifecycle = Lifecycle::new(4);
        let mut events = lifecycle.subscribe();
        lifecycle.advance(ConnectionState::Idle, ConnectionState::Active);

        assert!(lifecycle.terminate(
            ConnectionState::Active,
            ConnectionState::ErrorClosed,
            CloseReason::Channel("reset".into())
        ));
        assert!(!lifecycle.terminate(
            ConnectionState::Active,
            ConnectionState::Closed,
            CloseReason::Requested
        ));

        assert_eq!(
            events.try_recv().unwrap(),
            SyncEvent::Closed(CloseReason::Channel("reset".into()))
        );
        assert!(events.try_recv().is_err());
        assert_eq!(lifecycle.state(), ConnectionState::ErrorClosed);
    }

    #[test]
    fn fail_keeps_terminal_state() {
        let lifecycle = Lifecycle::new(4);
        lifecycle.advance(ConnectionState::Idle, ConnectionState::Negotiating);
        lifecycle.fail();
        assert_eq!(lifecycle.state(), ConnectionState::ErrorClosed);

        let closed = Lifecycle::new(4);
        closed.advance(ConnectionState::Idle, ConnectionState::Closed);
        closed.fail();
        assert_eq!(closed.state(), ConnectionState::Closed);
    }
}
