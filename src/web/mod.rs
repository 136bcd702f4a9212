//! Web server: shared state and the combined router for `/`, `/admin` and `/data`.

pub mod html;

use std::sync::{Arc, PoisonError};

use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};

use crate::admin::{self, AdminConfigurator};
use crate::api::UserDataService;
use crate::identity::IdentityProvider;
use crate::notification::Notification;
use crate::onboarding::{self, OnboardingWizard, WizardDeps};
use crate::table;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub wizard_deps: WizardDeps,
    pub admin: Arc<AdminConfigurator>,
    /// The wizard currently mounted on `/`, if any.
    wizard: Arc<Mutex<Option<Arc<OnboardingWizard>>>>,
    /// One-shot notification carried across a redirect.
    flash: Arc<std::sync::Mutex<Option<Notification>>>,
}

impl AppState {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        users: Arc<dyn UserDataService>,
        admin: AdminConfigurator,
        notification_ttl: std::time::Duration,
    ) -> Self {
        let wizard_deps = WizardDeps {
            identity,
            users,
            form_config: admin.reader(),
            notification_ttl,
        };
        Self {
            wizard_deps,
            admin: Arc::new(admin),
            wizard: Arc::new(Mutex::new(None)),
            flash: Arc::new(std::sync::Mutex::new(None)),
        }
    }

    pub fn users(&self) -> &dyn UserDataService {
        self.wizard_deps.users.as_ref()
    }

    /// The mounted wizard, mounting one if the wizard page was left.
    pub async fn mounted_wizard(&self) -> Arc<OnboardingWizard> {
        let mut slot = self.wizard.lock().await;
        match slot.as_ref() {
            Some(wizard) => Arc::clone(wizard),
            None => {
                let wizard = Arc::new(OnboardingWizard::mount(self.wizard_deps.clone()));
                *slot = Some(Arc::clone(&wizard));
                wizard
            }
        }
    }

    /// Navigation away from `/`: discard the wizard and its subscription.
    pub async fn unmount_wizard(&self) {
        if let Some(wizard) = self.wizard.lock().await.take() {
            wizard.unmount();
        }
    }

    /// Unmount `wizard` after it completed. The slot is only cleared while it
    /// still holds that wizard; a newer one mounted meanwhile stays.
    pub async fn unmount_completed(&self, wizard: &Arc<OnboardingWizard>) {
        {
            let mut slot = self.wizard.lock().await;
            if slot.as_ref().is_some_and(|current| Arc::ptr_eq(current, wizard)) {
                slot.take();
            }
        }
        wizard.unmount();
    }

    pub async fn is_wizard_mounted(&self) -> bool {
        self.wizard.lock().await.is_some()
    }

    pub fn set_flash(&self, notification: Notification) {
        *self.flash.lock().unwrap_or_else(PoisonError::into_inner) = Some(notification);
    }

    pub fn take_flash(&self) -> Option<Notification> {
        self.flash
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .filter(Notification::is_open)
    }
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "onboarding-wizard"
    }))
}

/// Build the full application router.
pub fn app_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .merge(onboarding::routes::routes())
        .merge(admin::routes::routes())
        .merge(table::routes::routes())
        .with_state(state)
        .layer(cors)
}
