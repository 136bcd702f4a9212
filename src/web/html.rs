//! HTML building blocks shared by every page.

use std::fmt::Write;

use chrono::Utc;

use crate::notification::{Notification, Severity};

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 0; background: #fafafa; }
header { background: #1976d2; color: #fff; display: flex; align-items: center; padding: 0 24px; height: 64px; margin-bottom: 16px; }
header h1 { flex-grow: 1; font-size: 1.25rem; font-weight: 500; }
header a { color: #fff; text-decoration: none; text-transform: uppercase; margin-left: 16px; }
main { max-width: 1536px; margin: 0 auto; padding: 0 24px; }
.notification { position: fixed; top: 24px; left: 50%; transform: translateX(-50%); padding: 6px 16px; border-radius: 4px; color: #fff; display: flex; gap: 12px; align-items: center; }
.notification.success { background: #2e7d32; }
.notification.error { background: #d32f2f; }
.notification.warning { background: #ed6c02; }
.notification.info { background: #0288d1; }
.notification button { background: none; border: none; color: inherit; cursor: pointer; }
.alert.warning { background: #fff4e5; color: #663c00; padding: 6px 16px; margin-top: 16px; border-radius: 4px; }
.stepper { display: flex; justify-content: space-around; list-style: none; padding: 0; margin: 40px 0; }
.stepper li { color: #888; }
.stepper li.active, .stepper li.done { color: #000; font-weight: 500; }
.field { display: block; margin-bottom: 16px; }
.field input, .field textarea { width: 100%; padding: 8px; box-sizing: border-box; }
.actions { display: flex; justify-content: space-between; margin-top: 24px; }
table { border-collapse: collapse; width: 100%; background: #fff; }
th, td { border-bottom: 1px solid #e0e0e0; padding: 16px; text-align: left; }
"#;

/// Escape text for use in element content and quoted attributes.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn severity_class(severity: Severity) -> &'static str {
    match severity {
        Severity::Success => "success",
        Severity::Error => "error",
        Severity::Info => "info",
        Severity::Warning => "warning",
    }
}

/// Top-of-page notification with a close button posting to `close_action`.
///
/// Hides itself client-side once its auto-hide delay has passed.
pub fn notification(n: &Notification, close_action: &str) -> String {
    let remaining = n.remaining_ms_at(Utc::now());
    format!(
        concat!(
            r#"<form class="notification {class}" role="alert" method="post" action="{action}" data-auto-hide="{remaining}">"#,
            r#"<span>{message}</span><button type="submit" aria-label="Close">&times;</button></form>"#,
            r#"<script>setTimeout(function(){{var n=document.querySelector(".notification");if(n)n.remove();}},{remaining});</script>"#,
        ),
        class = severity_class(n.severity),
        action = escape(close_action),
        remaining = remaining,
        message = escape(&n.message),
    )
}

/// Full page: head, navigation header, optional notification, body.
pub fn page(title: &str, notification_html: Option<String>, body: &str) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        r#"<!DOCTYPE html><html lang="en"><head><meta charset="utf-8"><title>{title}</title><style>{STYLE}</style></head><body>"#,
        title = escape(title),
    );
    out.push_str(
        r#"<header><h1>User Onboarding App</h1><nav><a href="/">Home</a><a href="/admin">Admin</a><a href="/data">Data</a></nav></header>"#,
    );
    if let Some(n) = notification_html {
        out.push_str(&n);
    }
    out.push_str("<main>");
    out.push_str(body);
    out.push_str("</main></body></html>");
    out
}

/// A warning box that stays on the page (not auto-hidden).
pub fn warning_alert(message: &str) -> String {
    format!(
        r#"<div class="alert warning" role="alert">{}</div>"#,
        escape(message)
    )
}
