use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use patreg_core::{store_config_from_env_value, CoreConfig, PatientService};

/// Main entry point for the patient registry
///
/// Resolves configuration once, opens the configured store and serves the REST API until
/// interrupted.
///
/// # Environment Variables
/// - `PATREG_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `PATIENT_STORE_URL`: Store backend, `memory://`, `sqlite:...` or `file://...`
///   (default: "memory://")
/// - `RUST_LOG`: tracing filter
///
/// # Returns
/// * `Ok(())` - If the server starts and shuts down cleanly
/// * `Err(anyhow::Error)` - If startup or serving fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("patreg=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr: SocketAddr = std::env::var("PATREG_REST_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".into())
        .parse()?;
    let store = store_config_from_env_value(std::env::var("PATIENT_STORE_URL").ok())?;
    let cfg = CoreConfig::new(store);

    let patient_service = PatientService::from_config(&cfg).await?;

    tracing::info!("++ Starting patient registry REST on {}", rest_addr);
    tracing::info!("++ Patient store: {}", cfg.store());

    let listener = tokio::net::TcpListener::bind(rest_addr).await?;
    axum::serve(listener, api_rest::router(patient_service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("-- Patient registry stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
}
