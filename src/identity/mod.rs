//! Identity provider integration: account creation, auth-state
//! notifications and sign-out.
//!
//! Providers keep their signed-in user in an [`AuthSession`], a
//! `tokio::sync::watch` cell. Subscribers get the current value
//! synchronously on subscribe and every later change from a background task.

pub mod local;
pub mod toolkit;

pub use local::LocalIdentity;
pub use toolkit::IdentityToolkit;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::IdentityError;

/// The signed-in user as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthUser {
    pub uid: String,
    pub email: String,
}

/// Callback invoked with the current user (or `None` when signed out).
pub type AuthCallback = Box<dyn Fn(Option<AuthUser>) + Send + Sync + 'static>;

/// External identity service.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Provider name for logs.
    fn name(&self) -> &str;

    /// Register a new account and sign it in. Returns the new user-id.
    async fn create_account(&self, email: &str, password: &str) -> Result<String, IdentityError>;

    /// Observe auth-state changes until the returned handle is dropped.
    fn subscribe(&self, callback: AuthCallback) -> AuthSubscription;

    /// End the current session.
    async fn sign_out(&self) -> Result<(), IdentityError>;

    /// Currently signed-in user, if any.
    fn current_user(&self) -> Option<AuthUser>;
}

/// Signed-in state shared between a provider and its subscribers.
#[derive(Debug)]
pub struct AuthSession {
    tx: watch::Sender<Option<AuthUser>>,
}

impl Default for AuthSession {
    fn default() -> Self {
        Self::new(None)
    }
}

impl AuthSession {
    pub fn new(user: Option<AuthUser>) -> Self {
        let (tx, _rx) = watch::channel(user);
        Self { tx }
    }

    pub fn current(&self) -> Option<AuthUser> {
        self.tx.borrow().clone()
    }

    /// Replace the signed-in user; subscribers are woken even with no receiver alive.
    pub fn set(&self, user: Option<AuthUser>) {
        self.tx.send_replace(user);
    }

    /// Deliver the current value now, then every change until unsubscribed.
    pub fn subscribe(&self, callback: AuthCallback) -> AuthSubscription {
        let mut rx = self.tx.subscribe();
        let initial = rx.borrow_and_update().clone();
        callback(initial);

        let task = tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let user = rx.borrow_and_update().clone();
                callback(user);
            }
            debug!("Auth session closed, subscription ending");
        });

        AuthSubscription { task: Some(task) }
    }
}

/// Handle returned by [`IdentityProvider::subscribe`].
///
/// Dropping it stops delivery.
#[derive(Debug)]
pub struct AuthSubscription {
    task: Option<JoinHandle<()>>,
}

impl AuthSubscription {
    /// A subscription that delivers nothing.
    pub fn inert() -> Self {
        Self { task: None }
    }

    pub fn unsubscribe(mut self) {
        self.stop();
    }

    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for AuthSubscription {
    fn drop(&mut self) {
        self.stop();
    }
}
