use chlmon_core::error::{ChlmonError, Result};
use chlmon_core::models::Session;
use chlmon_core::ports::{ApiRequest, SessionStore, Transport};
use std::sync::Arc;

use crate::dto::{IdentityBody, IdentityResponse};

/// Exchanges a Google identity credential for an application session token
pub struct IdentityExchange<T> {
    transport: T,
    sessions: Arc<dyn SessionStore>,
}

impl<T: Transport> IdentityExchange<T> {
    pub fn new(transport: T, sessions: Arc<dyn SessionStore>) -> Self {
        Self { transport, sessions }
    }

    /// Post the credential to `/auth/google` and store the issued session.
    ///
    /// On any failure nothing is stored and the previous session, if any,
    /// is left untouched.
    pub async fn sign_in(&self, credential: &str) -> Result<Session> {
        let body = serde_json::to_value(IdentityBody { id_token: credential })?;
        let request = ApiRequest::post("/auth/google", body).anonymous();

        let response: IdentityResponse = self
            .transport
            .post(&request)
            .await
            .and_then(|value| Ok(serde_json::from_value(value)?))
            .map_err(|e| {
                tracing::error!(error = %e, "Identity exchange failed");
                ChlmonError::IdentityExchange(e.to_string())
            })?;

        let session = Session::new(response.app_token, response.user.email);
        self.sessions.save(&session)?;
        tracing::info!(email = %session.email, "Signed in");
        Ok(session)
    }

    pub fn current(&self) -> Result<Option<Session>> {
        self.sessions.load()
    }

    /// Drop the locally stored session. The backend is not contacted.
    pub fn forget(&self) -> Result<()> {
        self.sessions.clear()
    }
}
