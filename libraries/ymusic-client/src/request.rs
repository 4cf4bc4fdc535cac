//! Request plumbing shared by all sub-clients.
//!
//! Every endpoint answers with a `{"result": ...}` envelope on success and,
//! most of the time, an `{"error": {"name", "message"}}` body on failure.

use crate::client::MusicClient;
use crate::error::{ClientError, Result};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use ymusic_core::types::{ApiErrorEnvelope, Response};

impl MusicClient {
    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.header("X-Yandex-Music-Device", self.device_id());
        match self.session.read().await.token.as_deref() {
            Some(token) => builder.header("Authorization", format!("OAuth {token}")),
            None => builder,
        }
    }

    /// GET `path` and unwrap the `result` envelope.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        what: &str,
    ) -> Result<T> {
        let url = self.endpoint(path);
        debug!(url = %url, what, "GET");

        let builder = self.authorize(self.http.get(&url).query(query)).await;
        self.execute(builder, what).await
    }

    /// POST `form` to `path` and unwrap the `result` envelope.
    pub(crate) async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &[(&str, String)],
        what: &str,
    ) -> Result<T> {
        let url = self.endpoint(path);
        debug!(url = %url, what, "POST");

        let builder = self.authorize(self.http.post(&url).form(form)).await;
        self.execute(builder, what).await
    }

    /// GET an absolute URL whose body is not enveloped.
    pub(crate) async fn get_raw<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<T> {
        debug!(url = %url, what, "GET raw");

        let builder = self.authorize(self.http.get(url).query(&[("format", "json")])).await;
        let response = send(builder).await?;
        let status = response.status();

        if status.is_success() {
            response.json().await.map_err(|e| {
                ClientError::ParseError(format!("Failed to parse {} response: {}", what, e))
            })
        } else {
            Err(error_for_status(status, response.text().await.unwrap_or_default()))
        }
    }

    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder, what: &str) -> Result<T> {
        let response = send(builder).await?;
        let status = response.status();

        if status.is_success() {
            let envelope: Response<T> = response.json().await.map_err(|e| {
                ClientError::ParseError(format!("Failed to parse {} response: {}", what, e))
            })?;
            Ok(envelope.result)
        } else {
            let body = response.text().await.unwrap_or_default();
            let err = error_for_status(status, body);
            warn!(status = %status, what, error = %err, "Request failed");
            Err(err)
        }
    }
}

async fn send(builder: RequestBuilder) -> Result<reqwest::Response> {
    builder.send().await.map_err(|e| {
        if e.is_connect() || e.is_timeout() {
            ClientError::ServerUnreachable(e.to_string())
        } else {
            ClientError::Request(e)
        }
    })
}

/// Map a non-2xx answer to a [`ClientError`].
pub(crate) fn error_for_status(status: StatusCode, body: String) -> ClientError {
    let api_error = serde_json::from_str::<ApiErrorEnvelope>(&body)
        .ok()
        .and_then(|envelope| envelope.error);
    let message = api_error
        .as_ref()
        .map(|e| e.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.clone());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ClientError::AuthRequired,
        StatusCode::NOT_FOUND => ClientError::NotFound(message),
        StatusCode::CONFLICT => ClientError::RevisionConflict(message),
        _ => match api_error {
            Some(err) => ClientError::ApiError {
                name: err.name,
                message: err.message,
            },
            None => ClientError::ServerError {
                status: status.as_u16(),
                message: body,
            },
        },
    }
}

/// Comma-join ids for `*-ids` form fields.
pub(crate) fn join_ids<S: AsRef<str>>(ids: &[S]) -> String {
    ids.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(",")
}
