//! In-process identity provider for development and tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use super::{AuthCallback, AuthSession, AuthSubscription, AuthUser, IdentityProvider};
use crate::error::IdentityError;

/// Minimum password length accepted at sign-up.
const MIN_PASSWORD_LEN: usize = 6;

/// Keeps accounts in memory. Emails are compared case-insensitively.
#[derive(Debug, Default)]
pub struct LocalIdentity {
    accounts: Mutex<HashMap<String, String>>,
    session: AuthSession,
}

impl LocalIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `user` registered and signed in.
    pub fn signed_in(user: AuthUser) -> Self {
        let identity = Self::default();
        identity.register(&user.email, &user.uid);
        identity.session.set(Some(user));
        identity
    }

    /// Register an account without signing it in.
    pub fn register(&self, email: &str, uid: &str) {
        let mut accounts = self.accounts.lock().unwrap_or_else(|e| e.into_inner());
        accounts.insert(email.trim().to_lowercase(), uid.to_string());
    }

    pub fn account_count(&self) -> usize {
        self.accounts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentity {
    fn name(&self) -> &str {
        "local"
    }

    async fn create_account(&self, email: &str, password: &str) -> Result<String, IdentityError> {
        let key = email.trim().to_lowercase();
        if key.is_empty() || !key.contains('@') {
            return Err(IdentityError::Rejected("Invalid email address".into()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(IdentityError::Rejected(format!(
                "Password should be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let uid = {
            let mut accounts = self.accounts.lock().unwrap_or_else(|e| e.into_inner());
            if accounts.contains_key(&key) {
                return Err(IdentityError::EmailAlreadyInUse);
            }
            let uid = Uuid::new_v4().simple().to_string();
            accounts.insert(key, uid.clone());
            uid
        };

        info!(uid = %uid, "Local account created");
        self.session.set(Some(AuthUser {
            uid: uid.clone(),
            email: email.trim().to_string(),
        }));
        Ok(uid)
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
