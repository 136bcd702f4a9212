//! Admin page (`/admin`): step configuration checkboxes and Save.

use std::fmt::Write;

use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{debug, warn};

use super::configurator::AdminView;
use crate::error::FormConfigError;
use crate::form::{ConfigStep, FieldId};
use crate::web::{AppState, html};

const CLOSE_ACTION: &str = "/admin/notification/close";

#[derive(Debug, Deserialize)]
struct ToggleForm {
    field: String,
    step: String,
    /// Present only when the box is checked.
    checked: Option<String>,
}

/// GET /admin
async fn show_admin(State(state): State<AppState>) -> Html<String> {
    state.unmount_wizard().await;
    Html(render_admin(&state.admin.view().await))
}

fn parse_toggle(form: &ToggleForm) -> Result<(FieldId, ConfigStep), FormConfigError> {
    let field = form.field.parse::<FieldId>()?;
    let step = form
        .step
        .parse::<u8>()
        .ok()
        .and_then(ConfigStep::from_number)
        .ok_or_else(|| FormConfigError::UnknownStep(form.step.clone()))?;
    Ok((field, step))
}

/// POST /admin/toggle
async fn toggle(State(state): State<AppState>, Form(form): Form<ToggleForm>) -> Response {
    let (field, step) = match parse_toggle(&form) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(error = %e, "Bad toggle request");
            return (StatusCode::BAD_REQUEST, Html(html::escape(&e.to_string()))).into_response();
        }
    };
    // A refused toggle leaves the page as it was; the checkbox is disabled anyway.
    if let Err(e) = state.admin.toggle(field, step, form.checked.is_some()).await {
        debug!(error = %e, "Toggle refused, configuration unchanged");
    }
    Redirect::to("/admin").into_response()
}

/// POST /admin/save
async fn save(State(state): State<AppState>) -> Redirect {
    if let Err(e) = state.admin.save().await {
        warn!(error = %e, "Save refused");
    }
    Redirect::to("/admin")
}

/// POST /admin/notification/close
async fn close_notification(State(state): State<AppState>) -> Redirect {
    state.admin.close_notification();
    Redirect::to("/admin")
}

/// GET /api/form-config
async fn get_form_config(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.admin.view().await.config)
}

fn render_step(view: &AdminView, step: ConfigStep) -> String {
    let config = &view.config;
    let mut out = String::from(r#"<section class="step-config">"#);
    let _ = write!(out, "<h3>{}</h3>", html::escape(&step.title()));
    for field in FieldId::ALL {
        let checked = if config.fields(step).contains(&field) { " checked" } else { "" };
        let disabled = if config.is_selectable(field, step) { "" } else { " disabled" };
        let _ = write!(
            out,
            concat!(
                r#"<form method="post" action="/admin/toggle" style="display:inline">"#,
                r#"<input type="hidden" name="field" value="{field}">"#,
                r#"<input type="hidden" name="step" value="{step}">"#,
                r#"<label><input type="checkbox" name="checked" value="on" onchange="this.form.submit()"{checked}{disabled}> {label}</label>"#,
                "</form>"
            ),
            field = field.as_str(),
            step = step.number(),
            checked = checked,
            disabled = disabled,
            label = html::escape(&field.admin_label()),
        );
    }
    if !config.is_step_valid(step) {
        let warning = FormConfigError::EmptyStep {
            step: step.number(),
        };
        out.push_str(&html::warning_alert(&warning.to_string()));
    }
    out.push_str("</section>");
    out
}

/// Render the admin page for a configurator view.
pub fn render_admin(view: &AdminView) -> String {
    let mut body = String::from("<h2>Admin Section: Configure Form</h2>");
    for step in ConfigStep::ALL {
        body.push_str(&render_step(view, step));
    }
    let disabled = if view.save_enabled() { "" } else { " disabled" };
    let _ = write!(
        body,
        r#"<form method="post" action="/admin/save"><button type="submit"{disabled}>Save</button></form>"#
    );

    let notification = view
        .notification
        .as_ref()
        .map(|n| html::notification(n, CLOSE_ACTION));
    html::page("Admin", notification, &body)
}

/// Routes for the admin page.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin", get(show_admin))
        .route("/admin/toggle", post(toggle))
        .route("/admin/save", post(save))
        .route(CLOSE_ACTION, post(close_notification))
        .route("/api/form-config", get(get_form_config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormConfig;

    fn view(config: FormConfig) -> AdminView {
        AdminView {
            config,
            notification: None,
        }
    }

    #[test]
    fn default_config_disables_opposite_checkboxes() {
        let html = render_admin(&view(FormConfig::default()));
        // aboutMe checked in step 2, disabled in step 3
        assert!(html.contains(
            r#"name="field" value="aboutMe"><input type="hidden" name="step" value="2"><label><input type="checkbox" name="checked" value="on" onchange="this.form.submit()" checked> AboutMe"#
        ));
        assert!(html.contains(
            r#"name="field" value="aboutMe"><input type="hidden" name="step" value="3"><label><input type="checkbox" name="checked" value="on" onchange="this.form.submit()" disabled> AboutMe"#
        ));
        assert!(!html.contains("You must select at least one component"));
        assert!(html.contains(r#"<button type="submit">Save</button>"#));
    }

    #[test]
    fn empty_step_shows_warning_and_disables_save() {
        let mut config = FormConfig::default();
        config.unassign(FieldId::Birthdate, ConfigStep::Step3);
        let html = render_admin(&view(config));
        assert!(html.contains("You must select at least one component for Step 3 Configuration."));
        assert!(html.contains(r#"<button type="submit" disabled>Save</button>"#));
    }

    #[test]
    fn parse_toggle_rejects_unknown_values() {
        let bad_field = ToggleForm {
            field: "email".into(),
            step: "2".into(),
            checked: None,
        };
        assert_eq!(
            parse_toggle(&bad_field).unwrap_err(),
            FormConfigError::UnknownField("email".into())
        );

        let bad_step = ToggleForm {
            field: "aboutMe".into(),
            step: "1".into(),
            checked: None,
        };
        assert_eq!(
            parse_toggle(&bad_step).unwrap_err(),
            FormConfigError::UnknownStep("1".into())
        );

        let ok = ToggleForm {
            field: "birthdate".into(),
            step: "3".into(),
            checked: Some("on".into()),
        };
        assert_eq!(
            parse_toggle(&ok).unwrap(),
            (FieldId::Birthdate, ConfigStep::Step3)
        );
    }
}
