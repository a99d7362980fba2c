mod api;
mod middleware;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use pickshelf_scraper::{PageClient, ScrapeConfig};
use pickshelf_store::StoreClient;

use crate::{
    api::{build_app, default_rate_limit_state, AppState},
    middleware::AuthState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(pickshelf_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let store = StoreClient::new(
        &config.store_url,
        &config.store_service_key,
        config.store_timeout_secs,
    )?;
    let scraper = PageClient::new(ScrapeConfig::from_app_config(&config))?;

    let auth = AuthState::from_env(matches!(
        config.env,
        pickshelf_core::Environment::Development
    ))?;
    let app = build_app(
        AppState {
            store: Arc::new(store),
            scraper: Arc::new(scraper),
            home_pick_count: config.home_pick_count,
            home_pick_pool_limit: config.home_pick_pool_limit,
        },
        auth,
        default_rate_limit_state(),
    );

    tracing::info!(addr = %config.bind_addr, env = %config.env, "starting server");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
