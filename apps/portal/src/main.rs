use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use portal::backend::client::BackendClient;
use portal::config::Config;
use portal::dashboard::ResumeWorkspace;
use portal::form::FormController;
use portal::identity::hosted::HostedIdentityClient;
use portal::routing::guard::RouteGuard;
use portal::routing::{Navigation, Router};
use portal::session::flags::FlagsFile;
use portal::session::SessionStore;
use portal::shell::Shell;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting candidate portal v{}", env!("CARGO_PKG_VERSION"));

    let provider = HostedIdentityClient::connect(
        &config.identity_region,
        config.identity_endpoint.as_deref(),
        config.identity_client_id.clone(),
        config.http_timeout,
    )
    .await;
    info!(
        "Identity client initialized ({})",
        config
            .identity_endpoint
            .as_deref()
            .unwrap_or(config.identity_region.as_str())
    );

    let backend = Arc::new(BackendClient::new(
        &config.profile_api_url,
        &config.resume_build_url,
        config.http_timeout,
    )?);
    info!("Backend client initialized ({})", config.profile_api_url);

    let store = SessionStore::new(Arc::new(provider));
    let _flags = FlagsFile::new(&config.session_flags_path).mirror(&store);

    let guard = RouteGuard::new(store.clone(), config.guard_recheck_timeout);
    let router = Router::new(guard);
    let shell = Shell::attach(store.clone(), router.clone());
    let mut form = FormController::new(store.clone(), backend.clone());
    let workspace = ResumeWorkspace::new(backend);

    store.restore().await;

    match router.navigate("/").await {
        Navigation::Entered(route) => info!("Opened {}", route.path()),
        Navigation::Redirected { requested, to } => {
            warn!("{} requires sign-in; showing {}", requested.path(), to.path())
        }
    }

    if let Some(email) = store.current().and_then(|identity| identity.email) {
        match form.load(&email).await {
            Ok(()) => info!("Loaded stored profile for {email}"),
            Err(e) => warn!("Could not load stored profile: {e}"),
        }
    }
    info!("Résumé workspace ready: {}", workspace.is_ready());

    let view = shell.view();
    info!(
        "Session: logged_in={} user={}",
        view.logged_in,
        view.display_name.as_deref().unwrap_or("-")
    );

    Ok(())
}
