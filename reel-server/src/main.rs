use anyhow::Context;
use reel_executor::{ExecutorConfig, ManimExecutionService};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod api;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "reel_server=info,reel_executor=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Reel render server...");

    let config = ExecutorConfig::from_env().context("Failed to load executor configuration")?;
    config
        .validate()
        .context("Invalid executor configuration")?;

    tracing::info!(
        "Rendering with '{} {}' under {} (timeout {:?})",
        config.program,
        config.program_args.join(" "),
        config.temp_root.display(),
        config.timeout
    );

    let service = Arc::new(ManimExecutionService::new(config));
    let app = api::create_router(api::AppState::new(service));

    // Get bind address
    let addr = std::env::var("REEL_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
