use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use carenet_core::{CoreConfig, HospitalDirectory, DEFAULT_REST_ADDR};

/// Main entry point for the CareNet application
///
/// Loads the hospital directory and serves the REST API (nearby search, access decisions,
/// health, Swagger UI).
///
/// # Environment Variables
/// - `CARENET_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `HOSPITAL_DIRECTORY_FILE`: YAML hospital directory (default: "hospitals.yaml")
/// - `NEARBY_RADIUS_KM`: search radius for `/api/getNearby` (default: 25)
/// - `NEARBY_LIMIT`: maximum hospitals per search (default: 20)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - configuration values are invalid or the directory cannot be loaded,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("carenet_run=info".parse()?)
                .add_directive("carenet_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr =
        std::env::var("CARENET_REST_ADDR").unwrap_or_else(|_| DEFAULT_REST_ADDR.into());

    let cfg = CoreConfig::from_env()?;
    let directory = HospitalDirectory::load(cfg.directory_file())?;
    if directory.is_empty() {
        tracing::warn!(
            "hospital directory {} is empty; every nearby search will return no hospitals",
            cfg.directory_file().display()
        );
    }

    tracing::info!("++ Starting CareNet REST on {}", rest_addr);

    let app = api_rest::router(AppState::new(directory, &cfg));
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("-- CareNet REST stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
}
