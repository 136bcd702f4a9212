//! Data page (`/data`): all onboarding records in a fixed table.

use std::fmt::Write;

use axum::Router;
use axum::extract::State;
use axum::response::{Html, Redirect};
use axum::routing::get;

use super::viewer::{COLUMNS, DataTableViewer, cells};
use crate::web::{AppState, html};

/// GET /data: mounts a fresh viewer, so every visit fetches once.
async fn show_data(State(state): State<AppState>) -> Html<String> {
    state.unmount_wizard().await;
    let flash = state.take_flash();
    let viewer = DataTableViewer::mount(state.users()).await;
    let notification = flash.map(|n| html::notification(&n, "/data"));
    Html(html::page("Data", notification, &render_table(&viewer)))
}

/// POST /data: closes the flash notification. It was consumed on render.
async fn close_flash() -> Redirect {
    Redirect::to("/data")
}

/// Render the table body for the loaded rows.
pub fn render_table(viewer: &DataTableViewer) -> String {
    let mut out = String::from("<table><thead><tr>");
    for column in COLUMNS {
        match column.width {
            Some(width) => {
                let _ = write!(out, r#"<th style="width:{width}px">{}</th>"#, column.header);
            }
            None => {
                let _ = write!(out, "<th>{}</th>", column.header);
            }
        }
    }
    out.push_str("</tr></thead><tbody>");
    for record in viewer.rows() {
        out.push_str("<tr>");
        for cell in cells(record) {
            let _ = write!(out, "<td>{}</td>", html::escape(cell));
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody></table>");
    out
}

/// Routes for the data page.
pub fn routes() -> Router<AppState> {
    Router::new().route("/data", get(show_data).post(close_flash))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_table_still_has_seven_headers() {
        let html = render_table(&DataTableViewer::default());
        assert_eq!(html.matches("<th").count(), 7);
        assert!(html.contains("<tbody></tbody>"));
        assert!(html.contains(r#"<th style="width:150px">Address</th>"#));
    }
}
