//! Redirector handshake.
//!
//! Opens the short-lived control channel, reads the one redirect message and
//! closes the channel again. Nothing is retried here; the caller decides
//! whether to run a whole new `connect`.

use crate::config::{DeviceIdentity, YnisonConfig};
use crate::error::{NegotiationStage, Result, YnisonError};
use crate::protocol;
use crate::types::RedirectInfo;
use futures_util::{SinkExt, StreamExt};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};

type ControlStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Ask the redirector which host serves the state channel.
pub async fn negotiate(
    config: &YnisonConfig,
    token: &str,
    identity: &DeviceIdentity,
) -> Result<RedirectInfo> {
    let request = protocol::build_request(&config.redirector_url, token, config, identity, None)
        .map_err(|e| YnisonError::negotiation(NegotiationStage::Request, e))?;

    debug!(url = %config.redirector_url, "Dialing redirector");
    let (mut stream, _) = timeout(config.handshake_timeout, connect_async(request))
        .await
        .map_err(|_| YnisonError::negotiation(NegotiationStage::Dial, "handshake timed out"))?
        .map_err(|e| YnisonError::negotiation(NegotiationStage::Dial, e))?;

    let payload = timeout(config.handshake_timeout, read_one(&mut stream))
        .await
        .map_err(|_| YnisonError::negotiation(NegotiationStage::Read, "no redirect received"))?;

    // The control channel is never reused, so its close result is irrelevant
    // once the payload is in hand.
    let frame = CloseFrame {
        code: CloseCode::Normal,
        reason: "".into(),
    };
    if let Err(e) = stream.close(Some(frame)).await {
        debug!(error = %e, "Control channel close failed");
    }

    let payload = payload?;
    let redirect = parse_redirect(&payload)?;
    debug!(
        host = %redirect.host,
        session_id = %redirect.session_id,
        keepalive = ?redirect.keep_alive_params,
        "Redirect received"
    );
    Ok(redirect)
}

/// Read the first data message, skipping control frames.
async fn read_one(stream: &mut ControlStream) -> Result<Vec<u8>> {
    loop {
        match stream.next().await {
            Some(Ok(Message::Text(text))) => return Ok(text.into_bytes()),
            Some(Ok(Message::Binary(data))) => return Ok(data),
            Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_))) => {}
            Some(Ok(Message::Close(frame))) => {
                let reason = frame.map_or_else(|| "no reason".to_string(), |f| f.to_string());
                warn!(%reason, "Redirector closed before sending a redirect");
                return Err(YnisonError::negotiation(
                    NegotiationStage::Read,
                    format!("closed by redirector: {reason}"),
                ));
            }
            Some(Err(e)) => return Err(YnisonError::negotiation(NegotiationStage::Read, e)),
            None => {
                return Err(YnisonError::negotiation(
                    NegotiationStage::Read,
                    "control channel ended",
                ))
            }
        }
    }
}

/// Parse the redirect payload. A redirect without a host is unusable.
pub fn parse_redirect(payload: &[u8]) -> Result<RedirectInfo> {
    let redirect: RedirectInfo = serde_json::from_slice(payload)
        .map_err(|e| YnisonError::negotiation(NegotiationStage::Decode, e))?;

    if redirect.host.trim().is_empty() {
        return Err(YnisonError::negotiation(
            NegotiationStage::Decode,
            "redirect has no host",
        ));
    }

    Ok(redirect)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_redirect_with_string_integers() {
        let redirect = parse_redirect(
            br#"{"host":"ynison-1.example","redirect_ticket":"T","session_id":"42",
                 "keep_alive_params":{"keep_alive_time_seconds":"30","keep_alive_timeout_seconds":10}}"#,
        )
        .unwrap();

        assert_eq!(redirect.host, "ynison-1.example");
        assert_eq!(redirect.redirect_ticket, "T");
        let keepalive = redirect.keep_alive_params.unwrap();
        assert_eq!(keepalive.keep_alive_time_seconds, 30);
        assert_eq!(keepalive.keep_alive_timeout_seconds, 10);
    }

    #[test]
    fn keepalive_is_optional() {
        let redirect = parse_redirect(br#"{"host":"h","redirect_ticket":"T"}"#).unwrap();
        assert!(redirect.keep_alive_params.is_none());
    }

    #[test]
    fn rejects_garbage_and_missing_host() {
        for payload in [&b"not json"[..], br#"{"redirect_ticket":"T"}"#] {
            match parse_redirect(payload) {
                Err(YnisonError::Negotiation { stage, .. }) => {
                    assert_eq!(stage, NegotiationStage::Decode);
                }
                other => panic!("unexpected: {other:?}"),
            }
        }
    }
}
