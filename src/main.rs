use std::sync::Arc;

use onboarding_wizard::admin::AdminConfigurator;
use onboarding_wizard::api::{UserDataService, UsersApi};
use onboarding_wizard::config::{AppConfig, IdentityBackend};
use onboarding_wizard::error::Result;
use onboarding_wizard::form::{FormConfig, FormConfigWriter};
use onboarding_wizard::identity::{IdentityProvider, IdentityToolkit, LocalIdentity};
use onboarding_wizard::web::{AppState, app_router};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });

    eprintln!("📝 Onboarding Wizard v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Users API: {}", config.api_url);
    eprintln!("   Identity: {}", config.identity.name());

    // ── Collaborators ────────────────────────────────────────────────────
    let identity: Arc<dyn IdentityProvider> = match &config.identity {
        IdentityBackend::Local => Arc::new(LocalIdentity::new()),
        IdentityBackend::Toolkit { base_url, api_key } => {
            Arc::new(IdentityToolkit::new(base_url.clone(), api_key.clone()))
        }
    };
    let users: Arc<dyn UserDataService> = Arc::new(UsersApi::new(config.api_url.clone()));

    // ── Form configuration ───────────────────────────────────────────────
    let admin = AdminConfigurator::new(
        FormConfigWriter::new(FormConfig::default()),
        config.notification_ttl,
    );

    let state = AppState::new(identity, users, admin, config.notification_ttl);
    let app = app_router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    eprintln!("   Wizard: http://0.0.0.0:{}/", config.port);
    eprintln!("   Admin:  http://0.0.0.0:{}/admin", config.port);
    eprintln!("   Data:   http://0.0.0.0:{}/data\n", config.port);
    tracing::info!(port = config.port, "Onboarding server started");

    axum::serve(listener, app).await?;

    Ok(())
}
