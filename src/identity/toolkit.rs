//! REST identity provider speaking the Identity Toolkit `accounts:signUp` API.
//!
//! Sign-out is local: the toolkit session lives in this process only.
//! The API key travels in the `x-goog-api-key` header, never in the URL.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{info, warn};

use super::{AuthCallback, AuthSession, AuthSubscription, AuthUser, IdentityProvider};
use crate::error::IdentityError;

/// Public Identity Toolkit endpoint.
pub const DEFAULT_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Error code the toolkit returns for an already-registered email.
const EMAIL_EXISTS: &str = "EMAIL_EXISTS";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignUpResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

pub struct IdentityToolkit {
    base_url: String,
    api_key: SecretString,
    client: reqwest::Client,
    session: AuthSession,
}

impl IdentityToolkit {
    pub fn new(base_url: impl Into<String>, api_key: SecretString) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            client: reqwest::Client::new(),
            session: AuthSession::default(),
        }
    }

    fn sign_up_url(&self) -> String {
        format!("{}/accounts:signUp", self.base_url)
    }
}

/// Map a toolkit error message (`EMAIL_EXISTS`, `WEAK_PASSWORD : ...`) to an [`IdentityError`].
fn map_error_message(message: &str) -> IdentityError {
    let code = message.split(':').next().unwrap_or_default().trim();
    if code == EMAIL_EXISTS {
        IdentityError::EmailAlreadyInUse
    } else if message.is_empty() {
        IdentityError::InvalidResponse("error response without message".into())
    } else {
        IdentityError::Rejected(message.to_string())
    }
}

#[async_trait]
impl IdentityProvider for IdentityToolkit {
    fn name(&self) -> &str {
        "identity-toolkit"
    }

    async fn create_account(&self, email: &str, password: &str) -> Result<String, IdentityError> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });

        let resp = self
            .client
            .post(self.sign_up_url())
            .header(API_KEY_HEADER, self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| IdentityError::RequestFailed(e.without_url().to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| IdentityError::RequestFailed(e.without_url().to_string()))?;

        if !status.is_success() {
            let err = match serde_json::from_str::<ErrorEnvelope>(&text) {
                Ok(envelope) => map_error_message(&envelope.error.message),
                Err(_) => IdentityError::InvalidResponse(format!("HTTP {status}: {text}")),
            };
            warn!(status = %status, error = %err, "Identity toolkit sign-up failed");
            return Err(err);
        }

        let parsed: SignUpResponse = serde_json::from_str(&text)
            .map_err(|e| IdentityError::InvalidResponse(e.to_string()))?;

        info!(uid = %parsed.local_id, "Identity toolkit account created");
        self.session.set(Some(AuthUser {
            uid: parsed.local_id.clone(),
            email: parsed.email.unwrap_or_else(|| email.to_string()),
        }));
        Ok(parsed.local_id)
    }

    fn subscribe(&self, callback: AuthCallback) -> AuthSubscription {
        self.session.subscribe(callback)
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        self.session.set(None);
        Ok(())
    }

    fn current_user(&self) -> Option<AuthUser> {
        self.session.current()
    }
}
