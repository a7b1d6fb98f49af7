pub mod request_id;

pub use request_id::{request_id_middleware, X_REQUEST_ID};

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::controllers::{
    batch::BatchController,
    health::{self, HealthState},
    voices,
};
use crate::infrastructure::config::Config;

/// Build the application router with all routes configured
pub fn build_router(
    batch_controller: Arc<BatchController>,
    health_state: Arc<HealthState>,
    permissive_cors: bool,
) -> Router {
    let batch_routes = Router::new()
        .route("/api/batches", post(BatchController::create_batch))
        .route(
            "/api/batches/:batch_id",
            get(BatchController::get_batch).delete(BatchController::delete_batch),
        )
        .route(
            "/api/batches/:batch_id/artifacts/:name",
            get(BatchController::get_artifact),
        )
        .route(
            "/api/batches/:batch_id/archive",
            get(BatchController::download_archive),
        )
        .with_state(batch_controller);

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(health_state);

    let app = Router::new()
        .route("/api/voices", get(voices::list_voices))
        .merge(health_routes)
        .merge(batch_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_id_middleware)),
        );

    if permissive_cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

/// Bind and serve until the process is stopped
pub async fn start_http_server(
    config: Arc<Config>,
    app: Router,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
