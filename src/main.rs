//! Leave engine HTTP server
//!
//! Loads the scenario configuration and serves the processing API.

use std::error::Error;
use std::sync::Arc;

use leave_engine::api::{AppState, create_router};
use leave_engine::calculation::ConditionRegistry;
use leave_engine::config::ScenarioStore;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "./config/scenarios.json";
const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    init_tracing()?;

    let config_path =
        std::env::var("LEAVE_ENGINE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let addr = std::env::var("LEAVE_ENGINE_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());

    let registry = Arc::new(ConditionRegistry::standard());
    let store = match ScenarioStore::open(&config_path, registry) {
        Ok(store) => store,
        Err(err) => {
            error!(path = %config_path, error = %err, "Failed to load scenario configuration");
            return Err(err.into());
        }
    };
    let snapshot = store.snapshot();
    info!(
        path = %config_path,
        schema_version = %snapshot.schema_version(),
        scenarios = snapshot.scenarios().len(),
        "Scenario configuration loaded"
    );

    let app = create_router(AppState::new(Arc::new(store)));
    let listener = TcpListener::bind(&addr).await?;
    info!(addr = %addr, "Leave engine listening");

    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing() -> Result<(), Box<dyn Error + Send + Sync>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init()
}
