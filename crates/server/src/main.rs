use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use recruiter_core::{
    load_config, load_config_from_env, validate_config, AnthropicClient, LlmClient,
    PeopleDiscoveryClient, PeopleSearcher, TodoClient,
};
use recruiter_server::api::create_router;
use recruiter_server::state::AppState;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("RECRUITER_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration; the file is optional, env vars always apply
    let config = if config_path.exists() {
        info!("Loading configuration from {:?}", config_path);
        load_config(&config_path)
            .with_context(|| format!("Failed to load config from {:?}", config_path))?
    } else {
        info!(
            "No config file at {:?}, using defaults and environment",
            config_path
        );
        load_config_from_env().context("Failed to load config from environment")?
    };

    validate_config(&config).context("Configuration validation failed")?;
    info!("Configuration loaded successfully");

    // Search backend, optional until a key is configured
    let searcher: Option<Arc<dyn PeopleSearcher>> = match PeopleDiscoveryClient::new(
        &config.search_api,
    ) {
        Ok(client) => {
            info!("Using People Discovery API at {}", client.base_url());
            Some(Arc::new(client))
        }
        Err(e) => {
            warn!("Search API disabled: {}", e);
            None
        }
    };

    // LLM client for the agent endpoint
    let llm: Option<Arc<dyn LlmClient>> = match &config.llm {
        Some(llm_config) => match AnthropicClient::from_config(llm_config) {
            Ok(client) => {
                info!(
                    "Agent enabled ({} / {})",
                    client.provider(),
                    client.model()
                );
                Some(Arc::new(client))
            }
            Err(e) => {
                warn!("Agent disabled: {}", e);
                None
            }
        },
        None => {
            info!("No LLM configured, agent endpoint disabled");
            None
        }
    };

    let todo = TodoClient::from_config(&config.demo).context("Failed to create Todo client")?;
    info!("Demo Todo API at {}", todo.base_url());

    let state = Arc::new(AppState::new(config.clone(), searcher, llm, todo));
    let app = create_router(state);

    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
