use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use applicant_fit::config::Config;
use applicant_fit::pipeline::store;
use applicant_fit::routes::build_router;
use applicant_fit::state::AppState;
use applicant_fit::telemetry::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    init_tracing(&config.rust_log);

    info!("Starting applicant fit API v{}", env!("CARGO_PKG_VERSION"));

    // Refuse to serve without a fully loaded model
    let model = store::load(&config.model_path).with_context(|| {
        format!(
            "Cannot start without a model artifact at {} (run the `train` binary first)",
            config.model_path.display()
        )
    })?;

    let state = AppState {
        classifier: Arc::new(model),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
