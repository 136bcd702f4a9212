//! Configuration types.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;
use crate::identity::toolkit::DEFAULT_TOOLKIT_URL;
use crate::notification::DEFAULT_AUTO_HIDE;

/// Which identity provider backs sign-up.
#[derive(Debug, Clone)]
pub enum IdentityBackend {
    /// In-process accounts, lost on restart.
    Local,
    /// Identity Toolkit REST API.
    Toolkit {
        base_url: String,
        api_key: SecretString,
    },
}

impl IdentityBackend {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Toolkit { .. } => "toolkit",
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port the web server listens on.
    pub port: u16,
    /// Base URL of the users REST API.
    pub api_url: String,
    pub identity: IdentityBackend,
    /// How long notifications stay visible.
    pub notification_ttl: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            api_url: "http://localhost:5000".to_string(),
            identity: IdentityBackend::Local,
            notification_ttl: DEFAULT_AUTO_HIDE,
        }
    }
}

impl AppConfig {
    /// Build from `ONBOARDING_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset keys take their default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match get("ONBOARDING_PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "ONBOARDING_PORT".into(),
                message: format!("'{raw}' is not a valid port"),
            })?,
            None => defaults.port,
        };

        let api_url = get("ONBOARDING_API_URL").unwrap_or(defaults.api_url);
        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                key: "ONBOARDING_API_URL".into(),
                message: format!("'{api_url}' must be an http(s) URL"),
            });
        }

        let notification_ttl = match get("ONBOARDING_NOTIFICATION_MS") {
            Some(raw) => raw
                .parse()
                .map(Duration::from_millis)
                .map_err(|_| ConfigError::InvalidValue {
                    key: "ONBOARDING_NOTIFICATION_MS".into(),
                    message: format!("'{raw}' is not a number of milliseconds"),
                })?,
            None => defaults.notification_ttl,
        };

        let identity = match get("ONBOARDING_IDENTITY").as_deref() {
            None | Some("local") => IdentityBackend::Local,
            Some("toolkit") => {
                let api_key = get("ONBOARDING_IDENTITY_API_KEY").ok_or_else(|| {
                    ConfigError::MissingRequired {
                        key: "ONBOARDING_IDENTITY_API_KEY".into(),
                        hint: "The toolkit identity backend needs a web API key.".into(),
                    }
                })?;
                IdentityBackend::Toolkit {
                    base_url: get("ONBOARDING_IDENTITY_URL")
                        .unwrap_or_else(|| DEFAULT_TOOLKIT_URL.to_string()),
                    api_key: SecretString::from(api_key),
                }
            }
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    key: "ONBOARDING_IDENTITY".into(),
                    message: format!("'{other}' is not one of: local, toolkit"),
                });
            }
        };

        Ok(Self {
            port,
            api_url,
            identity,
            notification_ttl,
        })
    }
}
