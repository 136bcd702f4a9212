//! `reqwest` client for the users REST API.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{OnboardingRecord, UserDataService};
use crate::error::DataError;

const SAVE_FALLBACK: &str = "Error saving user data";
const LIST_FALLBACK: &str = "Error fetching user data";

/// Error body shape returned by the API: `{ "error": "..." }`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

pub struct UsersApi {
    base_url: String,
    client: reqwest::Client,
}

impl UsersApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Build the error for a non-2xx answer: server message if present, else `fallback`.
fn api_error(status: StatusCode, body: &str, fallback: &str) -> DataError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string());
    DataError::Api {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl UserDataService for UsersApi {
    async fn save_user_data(
        &self,
        record: &OnboardingRecord,
    ) -> Result<serde_json::Value, DataError> {
        let resp = self
            .client
            .post(self.url("/users/saveUserData"))
            .json(record)
            .send()
            .await
            .map_err(|e| DataError::Network(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| DataError::Network(e.to_string()))?;

        if !status.is_success() {
            let err = api_error(status, &body, SAVE_FALLBACK);
            warn!(status = %status, error = %err, "saveUserData rejected");
            return Err(err);
        }

        debug!(user_id = %record.user_id, "saveUserData acknowledged");
        // The ack body is arbitrary; keep non-JSON answers as a string.
        Ok(serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body)))
    }

    async fn list_users(&self) -> Result<Vec<OnboardingRecord>, DataError> {
        let resp = self
            .client
            .get(self.url("/users"))
            .send()
            .await
            .map_err(|e| DataError::Network(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| DataError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(api_error(status, &body, LIST_FALLBACK));
        }

        decode_users(&body)
    }
}

/// Parse a `GET /users` body. Rows that do not match the record shape are
/// skipped so one bad entry does not hide the rest.
fn decode_users(body: &str) -> Result<Vec<OnboardingRecord>, DataError> {
    let rows: Vec<serde_json::Value> =
        serde_json::from_str(body).map_err(|e| DataError::Decode(e.to_string()))?;

    let total = rows.len();
    let records: Vec<OnboardingRecord> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_json::from_value(row) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(index, error = %e, "Skipping malformed user record");
                None
            }
        })
        .collect();

    if records.len() < total {
        debug!(kept = records.len(), total, "Some user records were skipped");
    }
    Ok(records)
}
