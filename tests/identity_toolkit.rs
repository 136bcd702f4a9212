//! Identity Toolkit provider against a stub `accounts:signUp` server.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::time::timeout;

use onboarding_wizard::error::IdentityError;
use onboarding_wizard::identity::{AuthUser, IdentityProvider, IdentityToolkit};
use onboarding_wizard::onboarding::wizard::identity_notification;

const TEST_TIMEOUT: Duration = Duration::from_secs(5);
const API_KEY: &str = "test-key";

fn toolkit_error(status: StatusCode, message: &str) -> axum::response::Response {
    (
        status,
        Json(json!({"error": {"code": status.as_u16(), "message": message}})),
    )
        .into_response()
}

async fn sign_up(headers: HeaderMap, Json(body): Json<Value>) -> axum::response::Response {
    let key = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok());
    if key != Some(API_KEY) {
        return toolkit_error(
            StatusCode::BAD_REQUEST,
            "API key not valid. Please pass a valid API key.",
        );
    }
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    match email {
        "taken@b.com" => toolkit_error(StatusCode::BAD_REQUEST, "EMAIL_EXISTS"),
        "broken@b.com" => (StatusCode::BAD_GATEWAY, "upstream unavailable").into_response(),
        _ if password.len() < 6 => toolkit_error(
            StatusCode::BAD_REQUEST,
            "WEAK_PASSWORD : Password should be at least 6 characters",
        ),
        _ => Json(json!({
            "kind": "identitytoolkit#SignupNewUserResponse",
            "localId": "tk-uid-1",
            "email": email,
            "idToken": "token",
        }))
        .into_response(),
    }
}

async fn start_stub() -> String {
    let app = Router::new().route("/v1/accounts:signUp", post(sign_up));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://127.0.0.1:{port}/v1")
}

fn toolkit(base: &str, key: &str) -> IdentityToolkit {
    IdentityToolkit::new(base, SecretString::from(key.to_string()))
}

#[tokio::test]
async fn sign_up_returns_local_id_and_signs_in() {
    timeout(TEST_TIMEOUT, async {
        let base = start_stub().await;
        let provider = toolkit(&base, API_KEY);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _sub = provider.subscribe(Box::new(move |user: Option<AuthUser>| {
            sink.lock().unwrap().push(user.map(|u| u.uid));
        }));

        let uid = provider.create_account("new@b.com", "secret1").await.unwrap();
        assert_eq!(uid, "tk-uid-1");
        assert_eq!(
            provider.current_user(),
            Some(AuthUser {
                uid: "tk-uid-1".into(),
                email: "new@b.com".into(),
            })
        );

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(
            *seen.lock().unwrap(),
            vec![None, Some("tk-uid-1".to_string())]
        );

        provider.sign_out().await.unwrap();
        assert!(provider.current_user().is_none());
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn existing_email_is_already_in_use() {
    timeout(TEST_TIMEOUT, async {
        let base = start_stub().await;
        let err = toolkit(&base, API_KEY)
            .create_account("taken@b.com", "secret1")
            .await
            .unwrap_err();
        assert_eq!(err, IdentityError::EmailAlreadyInUse);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn provider_messages_are_passed_through() {
    timeout(TEST_TIMEOUT, async {
        let base = start_stub().await;

        let err = toolkit(&base, API_KEY)
            .create_account("new@b.com", "123")
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "WEAK_PASSWORD : Password should be at least 6 characters"
        );

        let err = toolkit(&base, "wrong-key")
            .create_account("new@b.com", "secret1")
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::Rejected(msg) if msg.starts_with("API key not valid")));
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn non_json_failure_is_invalid_response() {
    timeout(TEST_TIMEOUT, async {
        let base = start_stub().await;
        let provider = toolkit(&base, API_KEY);
        let err = provider
            .create_account("broken@b.com", "secret1")
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::InvalidResponse(msg) if msg.contains("502")));
        assert!(provider.current_user().is_none());
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn unreachable_provider_is_request_failure() {
    timeout(TEST_TIMEOUT, async {
        // Bind then drop to get a port nobody listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let secret = "TOPSECRETKEY";
        let err = toolkit(&format!("http://127.0.0.1:{port}/v1"), secret)
            .create_account("new@b.com", "secret1")
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::RequestFailed(_)));

        // Neither the log line nor the page notification may carry the key.
        assert!(!err.to_string().contains(secret), "leaked: {err}");
        let shown = identity_notification(&err, Duration::from_secs(5));
        assert!(!shown.message.contains(secret), "leaked: {}", shown.message);
    })
    .await
    .expect("test timed out");
}
