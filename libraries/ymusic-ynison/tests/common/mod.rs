//! Local redirector + state server for integration tests.

#![allow(dead_code)]

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{accept_hdr_async, WebSocketStream};
use ymusic_ynison::YnisonConfig;

pub const REDIRECT_PATH: &str = "/redirector.YnisonRedirectService/GetRedirectToYnison";
pub const STATE_PATH: &str = "/ynison_state.YnisonStateService/PutYnisonState";
pub const TICKET: &str = "ticket-1";

/// What the fake server does.
#[derive(Debug, Clone, Default)]
pub struct Script {
    /// `(keep_alive_time_seconds, keep_alive_timeout_seconds)`
    pub keepalive: Option<(i64, i64)>,
    /// Payloads pushed after the bootstrap arrives
    pub frames: Vec<String>,
    /// Raw redirect payload instead of the generated one
    pub redirect_override: Option<String>,
    /// Close the state channel after pushing `frames`
    pub close_after: bool,
}

/// Upgrade request as seen by the server.
#[derive(Debug, Clone)]
pub struct Handshake {
    pub path: String,
    pub authorization: Option<String>,
    pub origin: Option<String>,
    pub protocol: Option<String>,
}

impl Handshake {
    /// JSON metadata carried after the `Bearer, v2, ` subprotocols
    pub fn metadata(&self) -> Value {
        let protocol = self.protocol.as_deref().expect("protocol header");
        let json = protocol
            .strip_prefix("Bearer, v2, ")
            .expect("subprotocol prefix");
        serde_json::from_str(json).expect("metadata json")
    }
}

#[derive(Debug, Default)]
pub struct Recorded {
    pub handshakes: Vec<Handshake>,
    pub bootstrap: Option<Value>,
    pub pings: usize,
    /// Close codes received per path
    pub closes: Vec<(String, Option<u16>)>,
}

pub struct FakeServer {
    pub addr: SocketAddr,
    pub recorded: Arc<Mutex<Recorded>>,
    handle: JoinHandle<()>,
}

impl FakeServer {
    pub async fn start(script: Script) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let recorded = Arc::new(Mutex::new(Recorded::default()));

        let handle = {
            let recorded = Arc::clone(&recorded);
            tokio::spawn(async move {
                while let Ok((stream, _)) = listener.accept().await {
                    let recorded = Arc::clone(&recorded);
                    let script = script.clone();
                    tokio::spawn(serve(stream, addr, script, recorded));
                }
            })
        };

        Self {
            addr,
            recorded,
            handle,
        }
    }

    pub fn redirector_url(&self) -> String {
        format!("ws://{}{REDIRECT_PATH}", self.addr)
    }

    pub fn config(&self) -> YnisonConfig {
        YnisonConfig::new(self.redirector_url())
            .handshake_timeout(Duration::from_secs(5))
            .close_timeout(Duration::from_secs(2))
    }

    pub fn recorded(&self) -> std::sync::MutexGuard<'_, Recorded> {
        self.recorded.lock().expect("recorded lock")
    }

    /// Wait until `check` holds or two seconds pass.
    pub async fn wait_for(&self, check: impl Fn(&Recorded) -> bool) -> bool {
        for _ in 0..40 {
            if check(&self.recorded()) {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        false
    }
}

impl Drop for FakeServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn serve(stream: TcpStream, addr: SocketAddr, script: Script, recorded: Arc<Mutex<Recorded>>) {
    let mut seen: Option<Handshake> = None;
    let callback = |request: &Request, mut response: Response| -> Result<Response, ErrorResponse> {
        let header = |name: &str| {
            request
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        seen = Some(Handshake {
            path: request.uri().path().to_string(),
            authorization: header("authorization"),
            origin: header("origin"),
            protocol: header("sec-websocket-protocol"),
        });
        response
            .headers_mut()
            .insert("sec-websocket-protocol", HeaderValue::from_static("Bearer"));
        Ok(response)
    };

    let Ok(mut ws) = accept_hdr_async(stream, callback).await else {
        return;
    };
    let Some(handshake) = seen else {
        return;
    };
    let path = handshake.path.clone();
    recorded.lock().unwrap().handshakes.push(handshake);

    if path == REDIRECT_PATH {
        let redirect = script.redirect_override.clone().unwrap_or_else(|| {
            let mut redirect = json!({
                "host": addr.to_string(),
                "redirect_ticket": TICKET,
                "session_id": "session-1",
            });
            if let Some((time, timeout)) = script.keepalive {
                redirect["keep_alive_params"] = json!({
                    "keep_alive_time_seconds": time.to_string(),
                    "keep_alive_timeout_seconds": timeout,
                });
            }
            redirect.to_string()
        });
        if ws.send(Message::Text(redirect)).await.is_err() {
            return;
        }
    } else if path == STATE_PATH {
        match ws.next().await {
            Some(Ok(Message::Text(text))) => {
                recorded.lock().unwrap().bootstrap = serde_json::from_str(&text).ok();
            }
            _ => return,
        }
        for frame in &script.frames {
            if ws.send(Message::Text(frame.clone())).await.is_err() {
                return;
            }
        }
        if script.close_after {
            let frame = CloseFrame {
                code: CloseCode::Away,
                reason: "maintenance".into(),
            };
            let _ = ws.send(Message::Close(Some(frame))).await;
        }
    }

    drain(&mut ws, &path, &recorded).await;
}

/// Keep reading so pings and close frames get recorded.
async fn drain(ws: &mut WebSocketStream<TcpStream>, path: &str, recorded: &Arc<Mutex<Recorded>>) {
    while let Some(Ok(message)) = ws.next().await {
        match message {
            Message::Ping(_) => recorded.lock().unwrap().pings += 1,
            Message::Close(frame) => {
                let code = frame.map(|f| u16::from(f.code));
                recorded.lock().unwrap().closes.push((path.to_string(), code));
            }
            _ => {}
        }
    }
}

/// Snapshot frame whose queue holds `ids` and points at `index`.
pub fn snapshot_frame(index: i64, ids: &[&str]) -> String {
    let list: Vec<Value> = ids
        .iter()
        .map(|id| json!({"playable_id": id, "playable_type": "TRACK", "from": "test"}))
        .collect();
    json!({
        "player_state": {
            "player_queue": {
                "current_playable_index": index.to_string(),
                "entity_id": "playlist-1",
                "entity_type": "PLAYLIST",
                "playable_list": list,
            },
            "status": {"paused": false, "progress_ms": "1000", "duration_ms": "200000", "playback_speed": 1.0}
        },
        "devices": [],
        "timestamp_ms": "1700000000000"
    })
    .to_string()
}

pub fn error_frame(message: &str) -> String {
    json!({
        "error": {
            "message": message,
            "grpc_code": 8,
            "http_code": 429,
            "http_status": "Too Many Requests",
            "details": {"ynison_error_code": "TOO_MANY_REQUESTS", "ynison_backoff_millis": "3000"}
        }
    })
    .to_string()
}
