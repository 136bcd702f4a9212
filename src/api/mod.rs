//! Users data service: the remote REST API that stores onboarding records.

pub mod users;

pub use users::UsersApi;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// One onboarding submission.
///
/// Optional fields are omitted from the JSON body when unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OnboardingRecord {
    pub user_id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about_me: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<String>,
}

/// Persistence and retrieval of onboarding records.
#[async_trait]
pub trait UserDataService: Send + Sync {
    /// `POST /users/saveUserData`. Returns the server acknowledgement body.
    async fn save_user_data(
        &self,
        record: &OnboardingRecord,
    ) -> Result<serde_json::Value, DataError>;

    /// `GET /users`, in server order.
    async fn list_users(&self) -> Result<Vec<OnboardingRecord>, DataError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omits_unset_optional_fields() {
        let record = OnboardingRecord {
            user_id: "u1".into(),
            email: "a@b.com".into(),
            birthdate: Some("2000-01-01".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "userId": "u1",
                "email": "a@b.com",
                "birthdate": "2000-01-01",
            })
        );
    }

    #[test]
    fn parses_listed_record_without_user_id() {
        let record: OnboardingRecord = serde_json::from_value(serde_json::json!({
            "email": "a@b.com",
            "zipCode": "94107",
            "city": "SF",
            "_id": "665f",
        }))
        .unwrap();
        assert_eq!(record.user_id, "");
        assert_eq!(record.zip_code.as_deref(), Some("94107"));
        assert_eq!(record.city.as_deref(), Some("SF"));
        assert_eq!(record.about_me, None);
    }
}
