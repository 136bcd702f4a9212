//! Wizard page (`/`) and its form actions, plus a JSON status endpoint.

use std::collections::HashMap;
use std::fmt::Write;

use axum::extract::{Form, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tracing::debug;

use super::state::{FormDraft, WizardState, WizardStep};
use super::wizard::Transition;
use crate::form::{InputKind, InputSpec};
use crate::notification::Notification;
use crate::web::{AppState, html};

const CLOSE_ACTION: &str = "/notification/close";

/// Wizard status for API clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WizardStatus {
    step: WizardStep,
    active_step: usize,
    user_id: Option<String>,
    loading: bool,
    can_go_back: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    notification: Option<Notification>,
}

/// GET /
async fn show_wizard(State(state): State<AppState>) -> Html<String> {
    let wizard = state.mounted_wizard().await;
    let inputs = wizard.current_inputs().await;
    Html(render_wizard(&wizard.state(), &inputs))
}

/// POST /: Next or Submit.
async fn submit_step(
    State(state): State<AppState>,
    Form(input): Form<HashMap<String, String>>,
) -> Response {
    let wizard = state.mounted_wizard().await;
    wizard.update_fields(input);

    match wizard.next().await {
        Transition::Completed {
            redirect,
            notification,
        } => {
            state.unmount_completed(&wizard).await;
            state.set_flash(notification);
            Redirect::to(redirect).into_response()
        }
        other => {
            debug!(outcome = ?other, "Forward action handled");
            Redirect::to("/").into_response()
        }
    }
}

/// POST /back: keeps whatever was typed on the current step.
async fn go_back(
    State(state): State<AppState>,
    Form(input): Form<HashMap<String, String>>,
) -> Redirect {
    let wizard = state.mounted_wizard().await;
    wizard.update_fields(input);
    wizard.back();
    Redirect::to("/")
}

/// POST /notification/close
async fn close_notification(State(state): State<AppState>) -> Redirect {
    state.mounted_wizard().await.close_notification();
    Redirect::to("/")
}

/// GET /api/onboarding/status
async fn get_status(State(state): State<AppState>) -> impl IntoResponse {
    let wizard = state.mounted_wizard().await.state();
    Json(WizardStatus {
        step: wizard.step,
        active_step: wizard.step.index(),
        user_id: wizard.user_id.clone(),
        loading: wizard.loading,
        can_go_back: wizard.can_go_back(),
        notification: wizard.open_notification().cloned(),
    })
}

fn render_stepper(active: WizardStep) -> String {
    let mut out = String::from(r#"<ol class="stepper">"#);
    for step in WizardStep::ALL {
        let class = if step == active {
            "active"
        } else if step.index() < active.index() {
            "done"
        } else {
            ""
        };
        let _ = write!(out, r#"<li class="{class}">{}</li>"#, html::escape(step.label()));
    }
    out.push_str("</ol>");
    out
}

fn render_input(spec: &InputSpec, draft: &FormDraft) -> String {
    // Passwords are never echoed back into the page.
    let value = match spec.kind {
        InputKind::Password => "",
        _ => draft.get(spec.name).unwrap_or_default(),
    };
    let mut attrs = format!(r#"name="{}" id="{}""#, spec.name, spec.name);
    if spec.required {
        attrs.push_str(" required");
    }
    if let Some(min) = spec.min_length {
        let _ = write!(attrs, r#" minlength="{min}""#);
    }

    let control = match spec.kind {
        InputKind::Multiline { rows } => format!(
            r#"<textarea {attrs} rows="{rows}">{}</textarea>"#,
            html::escape(value)
        ),
        kind => format!(
            r#"<input type="{}" {attrs} value="{}">"#,
            kind.html_type().unwrap_or("text"),
            html::escape(value)
        ),
    };

    format!(
        r#"<label class="field" for="{}">{}{}</label>"#,
        spec.name,
        html::escape(spec.label),
        control
    )
}

/// Render the wizard page for a state and the inputs of its current step.
pub fn render_wizard(state: &WizardState, inputs: &[InputSpec]) -> String {
    let mut body = render_stepper(state.step);
    body.push_str(r#"<form method="post" action="/">"#);
    for spec in inputs {
        body.push_str(&render_input(spec, &state.draft));
    }

    let back_disabled = if state.can_go_back() { "" } else { " disabled" };
    let forward_disabled = if state.can_go_forward() { "" } else { " disabled" };
    let _ = write!(
        body,
        r#"<div class="actions"><button type="submit" formaction="/back" formnovalidate{back_disabled}>Back</button><button type="submit"{forward_disabled}>{}</button></div></form>"#,
        state.step.forward_label()
    );

    let notification = state
        .open_notification()
        .map(|n| html::notification(n, CLOSE_ACTION));
    html::page("User Onboarding", notification, &body)
}

/// Routes for the wizard page.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(show_wizard).post(submit_step))
        .route("/back", post(go_back))
        .route(CLOSE_ACTION, post(close_notification))
        .route("/api/onboarding/status", get(get_status))
}
