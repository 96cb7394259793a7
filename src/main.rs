use std::sync::Arc;
use std::time::Duration;

use talent_scout::channels::CliChannel;
use talent_scout::config::{AppConfig, SurfaceMode};
use talent_scout::error::ConfigError;
use talent_scout::intake::{IntakeManager, IntakeRouteState, intake_routes, spawn_pruner};
use talent_scout::llm::{LlmConfig, create_provider};
use tower_http::cors::CorsLayer;

#[tokio::main]
async fn main() -> talent_scout::error::Result<()> {
    // A missing .env is fine; real env vars still apply.
    let _ = dotenvy::dotenv();

    // Logs go to stderr so the REPL owns stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        if matches!(e, ConfigError::MissingEnvVar(_)) {
            eprintln!("  export NVIDIA_API_KEY=nvapi-...");
        }
        std::process::exit(1);
    });

    let llm = create_provider(&LlmConfig::from(&config))?;
    let manager = IntakeManager::new(llm, config.generation);

    match config.mode {
        SurfaceMode::Cli => {
            eprintln!("TalentScout v{} ({})", env!("CARGO_PKG_VERSION"), config.model);
            CliChannel::new().run_stdio(&manager).await?;
        }
        SurfaceMode::Serve => {
            let state = IntakeRouteState::new(Arc::new(manager))
                .with_idle_timeout(config.session_idle_timeout);
            spawn_pruner(state.clone(), Duration::from_secs(600));
            let app = intake_routes(state).layer(CorsLayer::permissive());

            let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
            tracing::info!(port = config.port, model = %config.model, "Intake API listening");
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
