//! DataTableViewer: one-shot fetch of all onboarding records.

use tracing::{error, info};

use crate::api::{OnboardingRecord, UserDataService};

/// A table column: header text and optional fixed width in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub header: &'static str,
    pub width: Option<u16>,
}

pub const COLUMNS: [Column; 7] = [
    Column { header: "Email", width: None },
    Column { header: "About Me", width: None },
    Column { header: "Address", width: Some(150) },
    Column { header: "Zip Code", width: Some(130) },
    Column { header: "City", width: Some(130) },
    Column { header: "State", width: Some(130) },
    Column { header: "Birthdate", width: Some(130) },
];

/// Cell values of a record, in [`COLUMNS`] order. Missing values are blank.
pub fn cells(record: &OnboardingRecord) -> [&str; 7] {
    fn opt(v: &Option<String>) -> &str {
        v.as_deref().unwrap_or_default()
    }
    [
        record.email.as_str(),
        opt(&record.about_me),
        opt(&record.address),
        opt(&record.zip_code),
        opt(&record.city),
        opt(&record.state),
        opt(&record.birthdate),
    ]
}

/// Rows loaded when the table was mounted.
#[derive(Debug, Clone, Default)]
pub struct DataTableViewer {
    rows: Vec<OnboardingRecord>,
}

impl DataTableViewer {
    /// Mount: exactly one `list_users` call. A failure is logged and leaves
    /// the table empty.
    pub async fn mount(users: &dyn UserDataService) -> Self {
        match users.list_users().await {
            Ok(rows) => {
                info!(count = rows.len(), "Loaded onboarding records");
                Self { rows }
            }
            Err(e) => {
                error!(error = %e, "Error fetching users");
                Self::default()
            }
        }
    }

    pub fn rows(&self) -> &[OnboardingRecord] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
