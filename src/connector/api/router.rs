use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::container::Container;
use super::controller::{analyze_product, generate_leads, health_check, send_sequence};

/// Build the HTTP application: API routes, optional static frontend, CORS and
/// request tracing.
pub fn router(container: Arc<Container>) -> Router {
    let mut app = Router::new()
        .route("/api/health", get(health_check))
        .route("/api/analyze-product", post(analyze_product))
        .route("/api/generate-leads", post(generate_leads))
        .route("/api/send-sequence", post(send_sequence));

    if let Some(dir) = container.static_dir() {
        app = app
            .route_service("/", ServeFile::new(dir.join("index.html")))
            .nest_service("/static", ServeDir::new(dir));
    }

    let cors = cors_layer(container.allowed_origins());

    app.with_state(container)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods([
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
    ]);

    // Credentials cannot be combined with a wildcard origin.
    if origins.iter().any(|origin| origin == "*") {
        return layer
            .allow_origin(AllowOrigin::any())
            .allow_headers(AllowHeaders::any());
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid CORS origin '{}': {}", origin, e);
                None
            }
        })
        .collect();

    layer
        .allow_origin(AllowOrigin::list(parsed))
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(container: Arc<Container>, addr: SocketAddr) -> Result<()> {
    let app = router(container);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
