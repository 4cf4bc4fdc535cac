//! Account operations.

use crate::client::MusicClient;
use crate::error::{ClientError, Result};
use tracing::{debug, warn};
use ymusic_core::AccountStatus;

/// Account client.
pub struct AccountClient<'a> {
    client: &'a MusicClient,
}

impl<'a> AccountClient<'a> {
    pub(crate) fn new(client: &'a MusicClient) -> Self {
        Self { client }
    }

    /// Fetch the account status.
    ///
    /// When the token identifies a user, the uid and login are remembered for
    /// the uid-scoped endpoints (library, playlists).
    pub async fn status(&self) -> Result<AccountStatus> {
        let status: AccountStatus = self
            .client
            .get_json("account/status", &[], "account status")
            .await?;

        if status.is_authorized() {
            self.client
                .remember_account(status.account.uid.clone(), status.account.login.clone())
                .await;
        } else {
            debug!("Account status returned no uid");
        }

        Ok(status)
    }

    /// Install `token` and check that it identifies a user.
    ///
    /// The previous token is kept if validation fails.
    pub async fn authorize(&self, token: impl Into<String>) -> Result<AccountStatus> {
        let previous = self.client.token().await;
        self.client.set_token(Some(token.into())).await;

        let outcome = match self.status().await {
            Ok(status) if status.is_authorized() => Ok(status),
            Ok(_) => Err(ClientError::AuthFailed("token is anonymous".into())),
            Err(ClientError::AuthRequired) => Err(ClientError::AuthFailed("token rejected".into())),
            Err(e) => Err(e),
        };

        if let Err(e) = &outcome {
            warn!(error = %e, "Token validation failed, restoring previous token");
            self.client.set_token(previous).await;
        }

        outcome
    }
}
