//! End-to-end tests against a local redirector and state server

mod common;

use async_trait::async_trait;
use common::{error_frame, snapshot_frame, FakeServer, Script, REDIRECT_PATH, STATE_PATH, TICKET};
use mockall::mock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::timeout;
use ymusic_core::{Track, TrackResolver};
use ymusic_ynison::{
    CloseReason, ConnectionState, DeviceIdentity, NegotiationStage, SyncEvent, YnisonClient,
    YnisonConfig, YnisonError,
};

mock! {
    Resolver {}

    #[async_trait]
    impl TrackResolver for Resolver {
        async fn resolve_track(&self, playable_id: &str) -> ymusic_core::Result<Option<Track>>;
    }
}

const TOKEN: &str = "test-token";

fn identity() -> DeviceIdentity {
    DeviceIdentity::new("device-1", "ymusic-tests")
        .app_version("0.0.1")
        .title("Integration")
}

fn idle_resolver() -> Arc<dyn TrackResolver> {
    let mut resolver = MockResolver::new();
    resolver.expect_resolve_track().times(0);
    Arc::new(resolver)
}

fn client(server: &FakeServer, resolver: Arc<dyn TrackResolver>) -> YnisonClient {
    YnisonClient::with_config(TOKEN, identity(), resolver, server.config())
}

async fn next_event(events: &mut broadcast::Receiver<SyncEvent>) -> SyncEvent {
    timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("event within 5s")
        .expect("event channel open")
}

async fn assert_quiet(events: &mut broadcast::Receiver<SyncEvent>) {
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(matches!(
        events.try_recv(),
        Err(broadcast::error::TryRecvError::Empty)
    ));
}

// ============================================================================
// Full session
// ============================================================================

mod session {
    use super::*;

    #[tokio::test]
    async fn connect_receive_resolve_close() {
        let server = FakeServer::start(Script {
            frames: vec![snapshot_frame(1, &["A", "B"])],
            ..Default::default()
        })
        .await;

        let mut resolver = MockResolver::new();
        resolver
            .expect_resolve_track()
            .withf(|id| id == "B")
            .times(1)
            .returning(|id| {
                Ok(Some(Track {
                    id: id.into(),
                    title: "Song B".to_string(),
                    ..Default::default()
                }))
            });

        let client = client(&server, Arc::new(resolver));
        let mut events = client.subscribe();
        assert_eq!(client.state(), ConnectionState::Idle);

        client.connect().await.unwrap();
        assert_eq!(client.state(), ConnectionState::Active);

        let SyncEvent::Snapshot(snapshot) = next_event(&mut events).await else {
            panic!("expected snapshot");
        };
        assert_eq!(snapshot.timestamp_ms, 1_700_000_000_000);
        assert_eq!(client.snapshot().await, Some(snapshot));

        let track = client.current_track().await.unwrap().unwrap();
        assert_eq!(track.title, "Song B");

        client.close().await;
        assert_eq!(client.state(), ConnectionState::Closed);
        assert_eq!(
            next_event(&mut events).await,
            SyncEvent::Closed(CloseReason::Requested)
        );

        client.close().await;
        assert_quiet(&mut events).await;

        assert!(
            server
                .wait_for(|r| r.closes.iter().any(|(path, code)| path == STATE_PATH && *code == Some(1000)))
                .await
        );
    }

    #[tokio::test]
    async fn handshakes_and_bootstrap() {
        let server = FakeServer::start(Script::default()).await;
        let client = client(&server, idle_resolver());
        client.connect().await.unwrap();
        assert!(server.wait_for(|r| r.bootstrap.is_some()).await);

        {
            let recorded = server.recorded();
            assert_eq!(recorded.handshakes.len(), 2);

            let redirect = &recorded.handshakes[0];
            assert_eq!(redirect.path, REDIRECT_PATH);
            assert_eq!(redirect.authorization.as_deref(), Some("OAuth test-token"));
            assert_eq!(redirect.origin.as_deref(), Some("https://music.yandex.ru"));
            let metadata = redirect.metadata();
            assert_eq!(metadata["Ynison-Device-Id"], "device-1");
            assert_eq!(metadata["Ynison-Device-Info"]["app_name"], "ymusic-tests");
            assert_eq!(metadata["Ynison-Device-Info"]["type"], 1);
            assert!(metadata.get("Ynison-Redirect-Ticket").is_none());

            let state = &recorded.handshakes[1];
            assert_eq!(state.path, STATE_PATH);
            assert_eq!(state.authorization.as_deref(), Some("OAuth test-token"));
            assert_eq!(state.metadata()["Ynison-Redirect-Ticket"], TICKET);

            let bootstrap = recorded.bootstrap.as_ref().unwrap();
            let full = &bootstrap["update_full_state"];
            for field in ["player_queue", "status"] {
                let version = &full["player_state"][field]["version"];
                assert_eq!(version["device_id"], "device-1");
                assert_eq!(version["version"], "0");
                assert!(version["timestamp_ms"].as_i64().unwrap() > 0);
            }
            assert_eq!(full["device"]["info"]["device_id"], "device-1");
            assert_eq!(full["device"]["info"]["type"], "WEB");
            assert_eq!(full["device"]["is_shadow"], true);
            assert_eq!(full["is_currently_active"], false);
            assert_eq!(
                bootstrap["activity_interception_type"],
                "DO_NOT_INTERCEPT_BY_DEFAULT"
            );
            assert!(bootstrap["player_action_timestamp_ms"].as_i64().unwrap() > 0);
        }

        assert!(
            server
                .wait_for(|r| r.closes.iter().any(|(path, code)| path == REDIRECT_PATH && *code == Some(1000)))
                .await
        );

        client.close().await;
    }

    #[tokio::test]
    async fn unusable_frames_are_dropped() {
        let server = FakeServer::start(Script {
            frames: vec![
                r#"{"devices":[]}"#.to_string(),
                "not json".to_string(),
                snapshot_frame(0, &["A"]),
            ],
            ..Default::default()
        })
        .await;

        let client = client(&server, idle_resolver());
        let mut events = client.subscribe();
        client.connect().await.unwrap();

        assert!(matches!(next_event(&mut events).await, SyncEvent::Snapshot(_)));
        assert_eq!(client.state(), ConnectionState::Active);
        client.close().await;
    }

    #[tokio::test]
    async fn current_track_without_snapshot_is_none() {
        let server = FakeServer::start(Script::default()).await;
        let client = client(&server, idle_resolver());
        client.connect().await.unwrap();

        assert!(client.snapshot().await.is_none());
        assert!(client.current_track().await.unwrap().is_none());
        client.close().await;
    }
}

// ============================================================================
// Keepalive
// ============================================================================

mod keepalive {
    use super::*;

    #[tokio::test]
    async fn zero_interval_sends_no_pings() {
        let server = FakeServer::start(Script {
            keepalive: Some((0, 5)),
            ..Default::default()
        })
        .await;
        let client = client(&server, idle_resolver());
        client.connect().await.unwrap();

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(server.recorded().pings, 0);
        client.close().await;
    }

    #[tokio::test]
    async fn positive_interval_sends_pings() {
        let server = FakeServer::start(Script {
            keepalive: Some((1, 1)),
            ..Default::default()
        })
        .await;
        let client = client(&server, idle_resolver());
        client.connect().await.unwrap();

        assert!(server.wait_for(|r| r.pings >= 1).await);

        client.close().await;
        let after_close = server.recorded().pings;
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(server.recorded().pings, after_close);
    }
}

// ============================================================================
// Termination
// ============================================================================

mod termination {
    use super::*;

    #[tokio::test]
    async fn server_error_ends_connection_once() {
        let server = FakeServer::start(Script {
            frames: vec![error_frame("rate limited"), snapshot_frame(0, &["A"])],
            ..Default::default()
        })
        .await;

        let client = client(&server, idle_resolver());
        let mut events = client.subscribe();
        client.connect().await.unwrap();

        let SyncEvent::Closed(CloseReason::Server(error)) = next_event(&mut events).await else {
            panic!("expected server error");
        };
        assert_eq!(error.message, "rate limited");
        assert_eq!(error.details.unwrap().ynison_backoff_millis, 3000);
        assert_eq!(client.state(), ConnectionState::ErrorClosed);

        assert_quiet(&mut events).await;
        assert!(client.snapshot().await.is_none());

        client.close().await;
        assert_eq!(client.state(), ConnectionState::ErrorClosed);
        assert_quiet(&mut events).await;
    }

    #[tokio::test]
    async fn remote_close_is_channel_failure() {
        let server = FakeServer::start(Script {
            close_after: true,
            ..Default::default()
        })
        .await;

        let client = client(&server, idle_resolver());
        let mut events = client.subscribe();
        client.connect().await.unwrap();

        let event = next_event(&mut events).await;
        assert!(
            matches!(event, SyncEvent::Closed(CloseReason::Channel(ref msg)) if msg.contains("maintenance")),
            "unexpected {event:?}"
        );
        assert_eq!(client.state(), ConnectionState::ErrorClosed);
        client.close().await;
    }

    #[tokio::test]
    async fn state_can_be_watched() {
        let server = FakeServer::start(Script::default()).await;
        let client = client(&server, idle_resolver());
        let mut state = client.watch_state();

        client.connect().await.unwrap();
        assert_eq!(*state.borrow_and_update(), ConnectionState::Active);

        client.close().await;
        state.changed().await.unwrap();
        assert_eq!(*state.borrow(), ConnectionState::Closed);
    }
}

// ============================================================================
// Connect failures
// ============================================================================

mod connect_failures {
    use super::*;

    #[tokio::test]
    async fn second_connect_is_rejected() {
        let server = FakeServer::start(Script::default()).await;
        let client = client(&server, idle_resolver());
        client.connect().await.unwrap();

        let err = client.connect().await.unwrap_err();
        assert!(matches!(err, YnisonError::InvalidState(_)));
        assert_eq!(client.state(), ConnectionState::Active);
        client.close().await;
    }

    #[tokio::test]
    async fn unreachable_redirector() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = YnisonConfig::new(format!("ws://{addr}/redirect"));
        let client = YnisonClient::with_config(TOKEN, identity(), idle_resolver(), config);
        let mut events = client.subscribe();

        match client.connect().await {
            Err(YnisonError::Negotiation { stage, .. }) => assert_eq!(stage, NegotiationStage::Dial),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(client.state(), ConnectionState::ErrorClosed);
        assert!(events.try_recv().is_err());

        assert!(matches!(
            client.connect().await,
            Err(YnisonError::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn malformed_redirect() {
        let server = FakeServer::start(Script {
            redirect_override: Some("this is not json".to_string()),
            ..Default::default()
        })
        .await;
        let client = client(&server, idle_resolver());

        match client.connect().await {
            Err(YnisonError::Negotiation { stage, .. }) => assert_eq!(stage, NegotiationStage::Decode),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(client.state(), ConnectionState::ErrorClosed);
        assert_eq!(server.recorded().handshakes.len(), 1);
    }

    #[tokio::test]
    async fn redirect_without_host() {
        let server = FakeServer::start(Script {
            redirect_override: Some(r#"{"redirect_ticket":"t"}"#.to_string()),
            ..Default::default()
        })
        .await;
        let client = client(&server, idle_resolver());

        assert!(matches!(
            client.connect().await,
            Err(YnisonError::Negotiation {
                stage: NegotiationStage::Decode,
                ..
            })
        ));
    }
}
