//! OnboardingWizard: coordinates the step machine with the identity
//! provider and the users API.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::{debug, info, warn};

use super::state::{FormDraft, WizardState, WizardStep};
use crate::api::UserDataService;
use crate::error::{DataError, IdentityError};
use crate::form::{ConfigStep, FormConfigReader, InputSpec, credential_inputs, inputs_for};
use crate::identity::{AuthSubscription, AuthUser, IdentityProvider};
use crate::notification::Notification;

/// Where the browser goes after a completed onboarding.
pub const DATA_ROUTE: &str = "/data";

pub const ALREADY_ONBOARDED: &str = "You have already been Onboarded";
pub const ONBOARDING_COMPLETE: &str = "You have successfully completed the onboarding process!";
const GENERIC_FAILURE: &str = "Something went wrong";

/// Collaborators a wizard is mounted with.
#[derive(Clone)]
pub struct WizardDeps {
    pub identity: Arc<dyn IdentityProvider>,
    pub users: Arc<dyn UserDataService>,
    pub form_config: FormConfigReader,
    pub notification_ttl: Duration,
}

/// Result of a wizard action.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// The wizard is now on this step.
    Moved(WizardStep),
    /// Nothing moved (action disabled or failed; see the notification).
    Stayed,
    /// A request is already in flight.
    Busy,
    /// Onboarding finished and was reset; the caller navigates to `redirect`.
    Completed {
        redirect: &'static str,
        notification: Notification,
    },
}

/// Resets `loading` however the handler exits.
struct LoadingGuard<'a> {
    state: &'a Mutex<WizardState>,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        lock(self.state).loading = false;
    }
}

fn lock(state: &Mutex<WizardState>) -> MutexGuard<'_, WizardState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One mounted wizard. Dropping it releases the auth-state subscription.
pub struct OnboardingWizard {
    deps: WizardDeps,
    state: Arc<Mutex<WizardState>>,
    subscription: Mutex<Option<AuthSubscription>>,
}

impl OnboardingWizard {
    /// Mount: subscribe to auth state. An existing session starts the wizard on Details.
    pub fn mount(deps: WizardDeps) -> Self {
        let state = Arc::new(Mutex::new(WizardState::default()));

        let sink = Arc::clone(&state);
        let subscription = deps.identity.subscribe(Box::new(move |user: Option<AuthUser>| {
            let mut state = lock(&sink);
            if state.apply_auth(user.as_ref()) {
                info!(step = %state.step, signed_in = user.is_some(), "Wizard followed auth state");
            }
        }));

        let step = lock(&state).step;
        info!(provider = deps.identity.name(), step = %step, "Onboarding wizard mounted");

        Self {
            deps,
            state,
            subscription: Mutex::new(Some(subscription)),
        }
    }

    /// Release the auth-state subscription.
    pub fn unmount(&self) {
        let sub = self
            .subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(sub) = sub {
            sub.unsubscribe();
            debug!("Onboarding wizard unmounted");
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(AuthSubscription::is_active)
    }

    pub fn state(&self) -> WizardState {
        lock(&self.state).clone()
    }

    pub fn step(&self) -> WizardStep {
        lock(&self.state).step
    }

    /// Copy submitted inputs into the draft. Unknown names are ignored.
    pub fn update_fields<I, K, V>(&self, fields: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut state = lock(&self.state);
        for (name, value) in fields {
            let name = name.as_ref();
            if !state.draft.set(name, value) {
                debug!(field = name, "Ignoring unknown wizard input");
            }
        }
    }

    /// Inputs to render for the current step.
    pub async fn current_inputs(&self) -> Vec<InputSpec> {
        match self.step() {
            WizardStep::SignUp => credential_inputs(),
            WizardStep::Details => inputs_for(&self.deps.form_config.fields(ConfigStep::Step2).await),
            WizardStep::Extra => inputs_for(&self.deps.form_config.fields(ConfigStep::Step3).await),
        }
    }

    pub fn close_notification(&self) {
        lock(&self.state).notification = None;
    }

    /// Forward action (Next / Submit).
    pub async fn next(&self) -> Transition {
        let (step, user_id, draft) = {
            let mut state = lock(&self.state);
            if state.loading {
                debug!(step = %state.step, "Forward action ignored while loading");
                return Transition::Busy;
            }
            state.loading = true;
            (state.step, state.user_id.clone(), state.draft.clone())
        };
        let _loading = LoadingGuard { state: &self.state };

        match step {
            WizardStep::SignUp => self.sign_up(&draft).await,
            WizardStep::Details => {
                lock(&self.state).step = WizardStep::Extra;
                info!(from = %step, to = %WizardStep::Extra, "Wizard advanced");
                Transition::Moved(WizardStep::Extra)
            }
            WizardStep::Extra => self.submit(user_id, &draft).await,
        }
    }

    /// Back action. Only Extra → Details is allowed.
    pub fn back(&self) -> Transition {
        let mut state = lock(&self.state);
        if state.loading {
            return Transition::Busy;
        }
        match state.step.back() {
            Some(previous) => {
                info!(from = %state.step, to = %previous, "Wizard went back");
                state.step = previous;
                Transition::Moved(previous)
            }
            None => {
                debug!(step = %state.step, "Back is disabled on this step");
                Transition::Stayed
            }
        }
    }

    async fn sign_up(&self, draft: &FormDraft) -> Transition {
        match self
            .deps
            .identity
            .create_account(&draft.email, &draft.password)
            .await
        {
            Ok(uid) => {
                let mut state = lock(&self.state);
                state.user_id = Some(uid.clone());
                state.step = WizardStep::Details;
                info!(uid = %uid, "Account created, wizard on details");
                Transition::Moved(WizardStep::Details)
            }
            Err(e) => {
                warn!(error = %e, "Account creation failed");
                self.notify(identity_notification(&e, self.deps.notification_ttl));
                Transition::Stayed
            }
        }
    }

    async fn submit(&self, user_id: Option<String>, draft: &FormDraft) -> Transition {
        let Some(user_id) = user_id.filter(|id| !id.is_empty()) else {
            warn!("Submit without a signed-up user, ignoring");
            return Transition::Stayed;
        };

        let record = draft.to_record(&user_id);
        if let Err(e) = self.deps.users.save_user_data(&record).await {
            warn!(user_id = %user_id, error = %e, "Saving onboarding data failed");
            self.notify(data_notification(&e, self.deps.notification_ttl));
            return Transition::Stayed;
        }

        let notification = Notification::success(ONBOARDING_COMPLETE, self.deps.notification_ttl);
        {
            let mut state = lock(&self.state);
            state.notification = Some(notification.clone());
            state.draft = FormDraft::default();
            state.user_id = None;
            state.step = WizardStep::SignUp;
        }
        info!(user_id = %user_id, "Onboarding completed");

        if let Err(e) = self.deps.identity.sign_out().await {
            warn!(error = %e, "Sign-out after onboarding failed");
        }

        Transition::Completed {
            redirect: DATA_ROUTE,
            notification,
        }
    }

    fn notify(&self, notification: Notification) {
        lock(&self.state).notification = Some(notification);
    }
}

/// "Already in use" becomes a warning; everything else an error.
pub fn identity_notification(err: &IdentityError, ttl: Duration) -> Notification {
    match err {
        IdentityError::EmailAlreadyInUse => Notification::warning(ALREADY_ONBOARDED, ttl),
        other => {
            let message = other.to_string();
            if message.trim().is_empty() {
                Notification::error(GENERIC_FAILURE, ttl)
            } else {
                Notification::error(message, ttl)
            }
        }
    }
}

pub fn data_notification(err: &DataError, ttl: Duration) -> Notification {
    Notification::error(err.to_string(), ttl)
}
