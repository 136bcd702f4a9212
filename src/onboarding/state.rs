//! Wizard state machine: which step the user is on and what they typed.

use serde::{Deserialize, Serialize};

use crate::api::OnboardingRecord;
use crate::identity::AuthUser;
use crate::notification::Notification;

/// The three wizard steps.
///
/// Progresses linearly: SignUp → Details → Extra. Submitting Extra returns
/// to SignUp. Back is only possible from Extra to Details: once an account
/// exists the sign-up step cannot be revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    SignUp,
    Details,
    Extra,
}

impl WizardStep {
    pub const ALL: [WizardStep; 3] = [WizardStep::SignUp, WizardStep::Details, WizardStep::Extra];

    /// 0-based index (`activeStep`).
    pub fn index(&self) -> usize {
        match self {
            Self::SignUp => 0,
            Self::Details => 1,
            Self::Extra => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Next step in the linear progression, if any.
    pub fn next(&self) -> Option<WizardStep> {
        match self {
            Self::SignUp => Some(Self::Details),
            Self::Details => Some(Self::Extra),
            Self::Extra => None,
        }
    }

    /// Target of a Back action. `None` where going back is blocked.
    pub fn back(&self) -> Option<WizardStep> {
        match self {
            Self::Extra => Some(Self::Details),
            Self::SignUp | Self::Details => None,
        }
    }

    pub fn is_last(&self) -> bool {
        self.next().is_none()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::SignUp => "Step 1: Sign Up",
            Self::Details => "Step 2: Information",
            Self::Extra => "Step 3: Additional Information",
        }
    }

    /// Caption of the forward button.
    pub fn forward_label(&self) -> &'static str {
        if self.is_last() { "Submit" } else { "Next" }
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::SignUp => "sign_up",
            Self::Details => "details",
            Self::Extra => "extra",
        };
        write!(f, "{s}")
    }
}

/// Everything typed into the wizard so far.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct FormDraft {
    pub email: String,
    pub password: String,
    pub about_me: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub birthdate: String,
}

impl std::fmt::Debug for FormDraft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormDraft")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("about_me", &self.about_me)
            .field("address", &self.address)
            .field("city", &self.city)
            .field("state", &self.state)
            .field("zip_code", &self.zip_code)
            .field("birthdate", &self.birthdate)
            .finish()
    }
}

impl FormDraft {
    fn slot_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "email" => Some(&mut self.email),
            "password" => Some(&mut self.password),
            "aboutMe" => Some(&mut self.about_me),
            "address" => Some(&mut self.address),
            "city" => Some(&mut self.city),
            "state" => Some(&mut self.state),
            "zipCode" => Some(&mut self.zip_code),
            "birthdate" => Some(&mut self.birthdate),
            _ => None,
        }
    }

    /// Value of an input by its form name (`zipCode`, ...).
    pub fn get(&self, name: &str) -> Option<&str> {
        let value = match name {
            "email" => &self.email,
            "password" => &self.password,
            "aboutMe" => &self.about_me,
            "address" => &self.address,
            "city" => &self.city,
            "state" => &self.state,
            "zipCode" => &self.zip_code,
            "birthdate" => &self.birthdate,
            _ => return None,
        };
        Some(value.as_str())
    }

    /// Set an input by its form name. Returns false for unknown names.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.slot_mut(name) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Record sent on submission. The password never leaves the wizard;
    /// blank optional fields are omitted.
    pub fn to_record(&self, user_id: &str) -> OnboardingRecord {
        fn opt(value: &str) -> Option<String> {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        OnboardingRecord {
            user_id: user_id.to_string(),
            email: self.email.trim().to_string(),
            about_me: opt(&self.about_me),
            address: opt(&self.address),
            city: opt(&self.city),
            state: opt(&self.state),
            zip_code: opt(&self.zip_code),
            birthdate: opt(&self.birthdate),
        }
    }
}

/// Live state of one mounted wizard.
#[derive(Debug, Clone, Default)]
pub struct WizardState {
    pub step: WizardStep,
    pub user_id: Option<String>,
    pub draft: FormDraft,
    /// A collaborator call is outstanding.
    pub loading: bool,
    pub notification: Option<Notification>,
}

impl WizardState {
    /// Back is disabled on the first two steps and while loading.
    pub fn can_go_back(&self) -> bool {
        !self.loading && self.step.back().is_some()
    }

    pub fn can_go_forward(&self) -> bool {
        !self.loading
    }

    /// Fold an auth-state notification into the wizard.
    ///
    /// Only a change of identity moves the wizard: a new user lands on
    /// Details, a sign-out of the tracked user returns to SignUp. Returns
    /// whether anything changed.
    pub fn apply_auth(&mut self, user: Option<&AuthUser>) -> bool {
        match (user, self.user_id.as_deref()) {
            (Some(u), Some(current)) if u.uid == current => false,
            (Some(u), _) => {
                self.user_id = Some(u.uid.clone());
                self.step = WizardStep::Details;
                true
            }
            (None, Some(_)) => {
                self.user_id = None;
                self.step = WizardStep::SignUp;
                true
            }
            (None, None) => false,
        }
    }

    /// Visible notification, skipping one that has auto-hidden.
    pub fn open_notification(&self) -> Option<&Notification> {
        self.notification.as_ref().filter(|n| n.is_open())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(uid: &str) -> AuthUser {
        AuthUser {
            uid: uid.into(),
            email: "a@b.com".into(),
        }
    }

    #[test]
    fn next_walks_all_steps() {
        let mut current = WizardStep::SignUp;
        for expected in [WizardStep::Details, WizardStep::Extra] {
            current = current.next().unwrap();
            assert_eq!(current, expected);
        }
        assert!(current.next().is_none());
        assert!(current.is_last());
    }

    #[test]
    fn back_only_from_extra() {
        assert_eq!(WizardStep::SignUp.back(), None);
        assert_eq!(WizardStep::Details.back(), None);
        assert_eq!(WizardStep::Extra.back(), Some(WizardStep::Details));
    }

    #[test]
    fn index_roundtrip() {
        for step in WizardStep::ALL {
            assert_eq!(WizardStep::from_index(step.index()), Some(step));
        }
        assert_eq!(WizardStep::from_index(3), None);
    }

    #[test]
    fn labels_and_forward_caption() {
        assert_eq!(WizardStep::SignUp.label(), "Step 1: Sign Up");
        assert_eq!(WizardStep::SignUp.forward_label(), "Next");
        assert_eq!(WizardStep::Details.forward_label(), "Next");
        assert_eq!(WizardStep::Extra.forward_label(), "Submit");
    }

    #[test]
    fn display_matches_serde() {
        for step in WizardStep::ALL {
            let json = serde_json::to_string(&step).unwrap();
            assert_eq!(format!("\"{step}\""), json);
        }
    }

    #[test]
    fn draft_set_and_get_by_form_name() {
        let mut draft = FormDraft::default();
        assert!(draft.set("zipCode", "94107"));
        assert!(draft.set("aboutMe", "hi"));
        assert!(!draft.set("userId", "nope"));
        assert_eq!(draft.get("zipCode"), Some("94107"));
        assert_eq!(draft.about_me, "hi");
        assert_eq!(draft.get("userId"), None);
    }

    #[test]
    fn draft_debug_hides_password() {
        let mut draft = FormDraft::default();
        draft.set("password", "secret1");
        let debug = format!("{draft:?}");
        assert!(!debug.contains("secret1"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn record_skips_password_and_blank_fields() {
        let mut draft = FormDraft::default();
        draft.set("email", " a@b.com ");
        draft.set("password", "secret1");
        draft.set("aboutMe", "hi");
        draft.set("city", "   ");

        let record = draft.to_record("u1");
        assert_eq!(record.user_id, "u1");
        assert_eq!(record.email, "a@b.com");
        assert_eq!(record.about_me.as_deref(), Some("hi"));
        assert_eq!(record.city, None);
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("secret1"));
    }

    #[test]
    fn back_disabled_while_loading() {
        let mut state = WizardState {
            step: WizardStep::Extra,
            ..Default::default()
        };
        assert!(state.can_go_back());
        state.loading = true;
        assert!(!state.can_go_back());
        assert!(!state.can_go_forward());
    }

    #[test]
    fn auth_sign_in_skips_to_details() {
        let mut state = WizardState::default();
        assert!(state.apply_auth(Some(&user("u1"))));
        assert_eq!(state.step, WizardStep::Details);
        assert_eq!(state.user_id.as_deref(), Some("u1"));
    }

    #[test]
    fn auth_repeat_of_same_user_is_ignored() {
        let mut state = WizardState {
            step: WizardStep::Extra,
            user_id: Some("u1".into()),
            ..Default::default()
        };
        assert!(!state.apply_auth(Some(&user("u1"))));
        assert_eq!(state.step, WizardStep::Extra);
    }

    #[test]
    fn auth_sign_out_returns_to_sign_up() {
        let mut state = WizardState {
            step: WizardStep::Extra,
            user_id: Some("u1".into()),
            ..Default::default()
        };
        assert!(state.apply_auth(None));
        assert_eq!(state.step, WizardStep::SignUp);
        assert_eq!(state.user_id, None);
        assert!(!state.apply_auth(None));
    }
}
