use std::sync::Arc;
use std::time::Duration;

use flow_chat::chat::ChatLoop;
use flow_chat::config::AppConfig;
use flow_chat::flow::LangflowClient;
use flow_chat::session::{SessionStore, spawn_prune_task};
use flow_chat::web::{AppState, app_routes};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env, letting it win over inherited variables
    dotenvy::dotenv_override().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let client = LangflowClient::new(config.request_timeout)?;
    let chat = ChatLoop::new(Arc::new(client)).with_tweaks(config.tweaks.clone());

    // ── Sessions ─────────────────────────────────────────────────────────
    let sessions = SessionStore::new(
        config.greeting.clone(),
        config.session_idle_timeout,
        config.max_sessions,
    );
    spawn_prune_task(Arc::clone(&sessions), Duration::from_secs(60));

    let state = AppState::new(
        sessions,
        chat,
        config.login_defaults.clone(),
        config.welcome_path.clone(),
    );
    let app = app_routes(state);

    eprintln!("💬 Langflow Chat v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Listening: http://{}", config.listen_addr);
    eprintln!("   Welcome doc: {}", config.welcome_path.display());
    if config.tweaks.is_some() {
        eprintln!("   Tweaks: enabled");
    }

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "Server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Shutting down");
        })
        .await?;

    Ok(())
}
