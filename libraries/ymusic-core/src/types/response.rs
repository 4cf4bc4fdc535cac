//! Response envelope shared by every endpoint

use crate::serde_util::lenient_i64;
use serde::{Deserialize, Serialize};

/// Wrapper around every successful API payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response<T> {
    /// Request tracing info
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invocation_info: Option<InvocationInfo>,
    /// The payload
    pub result: T,
    /// Paging info, when the endpoint pages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pager: Option<Pager>,
}

/// Request tracing info attached by the server
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvocationInfo {
    /// Request id
    #[serde(rename = "req-id", default)]
    pub req_id: String,
    /// Hostname that served the request
    #[serde(default)]
    pub hostname: String,
}

/// Paging info
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pager {
    #[serde(default)]
    pub page: i64,
    #[serde(default)]
    pub per_page: i64,
    #[serde(default)]
    pub total: i64,
}

/// Result of library mutations (like/dislike)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    /// New library revision
    #[serde(default, deserialize_with = "lenient_i64")]
    pub revision: i64,
}

/// Error body sent with non-2xx responses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Machine-readable error name, e.g. `validate`
    #[serde(default)]
    pub name: String,
    /// Human-readable message
    #[serde(default)]
    pub message: String,
}

/// `{"error": {...}}` envelope
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorEnvelope {
    #[serde(default)]
    pub invocation_info: Option<InvocationInfo>,
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}
