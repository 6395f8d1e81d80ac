//! Mock payroll employee API.
//!
//! Serves an in-memory employee store over REST for developing the employee screen.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use payroll_employees::config::LogFormat;
use payroll_employees::{create_router, AppState, Config, InMemoryEmployeeRepository};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    tracing::info!("Starting payroll mock API");
    tracing::info!("Bind address: {}", config.bind_addr);

    let repo = if config.seed_sample {
        InMemoryEmployeeRepository::with_sample_data()
    } else {
        InMemoryEmployeeRepository::new()
    };
    tracing::info!("Employee store seeded with {} records", repo.len().await);

    let state = AppState {
        repo: Arc::new(repo),
        config: Arc::new(config.clone()),
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
