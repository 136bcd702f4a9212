//! Onboarding wizard: three-step sign-up flow.
//!
//! Step 1 creates the account with the identity provider, step 2 and step 3
//! collect the fields the admin assigned to them, and submitting step 3
//! stores the record through the users API and starts over.

pub mod routes;
pub mod state;
pub mod wizard;

pub use state::{FormDraft, WizardState, WizardStep};
pub use wizard::{DATA_ROUTE, OnboardingWizard, Transition, WizardDeps};
