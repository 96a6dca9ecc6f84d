use std::error::Error;

use dotenvy::dotenv;
use tracing_subscriber::EnvFilter;

use mergington_activities::config::AppConfig;
use mergington_activities::database::{seed, ActivityStore};
use mergington_activities::services::activities_service::SignupPolicy;
use mergington_activities::web::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    let directory = seed::load_directory(config.seed_file.as_deref())?;
    tracing::info!(
        activities = directory.len(),
        enforce_capacity = config.enforce_capacity,
        "activity directory ready"
    );

    let state = AppState {
        store: ActivityStore::new(directory),
        policy: SignupPolicy {
            enforce_capacity: config.enforce_capacity,
        },
    };
    let app = build_router(state, &config.static_dir);

    // Fall back to the next port when the configured one is taken.
    let addr = config.socket_addr(config.port)?;
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            let fallback = config.socket_addr(config.fallback_port()?)?;
            tracing::warn!(%addr, error = %e, %fallback, "bind failed, trying fallback port");
            tokio::net::TcpListener::bind(fallback).await?
        }
    };

    let bound_addr = listener.local_addr()?;
    tracing::info!("serving on http://{}/", bound_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
