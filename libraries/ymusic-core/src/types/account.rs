//! Account status

use crate::serde_util::string_or_number;
use serde::{Deserialize, Serialize};

/// `account/status`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountStatus {
    #[serde(default)]
    pub account: Account,
    #[serde(default)]
    pub permissions: Option<Permissions>,
    #[serde(default)]
    pub plus: Option<Plus>,
    #[serde(default)]
    pub default_email: Option<String>,
}

/// Account block of [`AccountStatus`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Empty when the token is anonymous
    #[serde(default, deserialize_with = "string_or_number")]
    pub uid: String,
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub region: Option<i64>,
    #[serde(default)]
    pub service_available: bool,
}

/// Granted permissions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Permissions {
    #[serde(default)]
    pub until: Option<String>,
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default)]
    pub default: Vec<String>,
}

/// Plus subscription state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plus {
    #[serde(default)]
    pub has_plus: bool,
    #[serde(default)]
    pub is_tutorial_completed: bool,
}

impl AccountStatus {
    /// True when the token identifies a real user
    pub fn is_authorized(&self) -> bool {
        !self.account.uid.is_empty()
    }
}
