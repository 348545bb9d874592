//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own.
//!
//! ## Intended use
//! Useful for development and debugging when you want a server without the workspace's
//! `patreg-run` wrapper. Both binaries serve the same router.

use api_rest::router;
use patreg_core::{store_config_from_env_value, CoreConfig, PatientService};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the patient registry REST API server
///
/// # Environment Variables
/// - `PATREG_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `PATIENT_STORE_URL`: Store backend (default: "memory://")
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the store URL is invalid or the store cannot be opened,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("patreg_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("PATREG_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let store = store_config_from_env_value(std::env::var("PATIENT_STORE_URL").ok())?;
    let cfg = CoreConfig::new(store);

    tracing::info!("-- Starting patient registry REST API on {}", addr);

    let patients = PatientService::from_config(&cfg).await?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(patients)).await?;

    Ok(())
}
