//! REST API server module
//!
//! Exposes the task lifecycle over HTTP: create a task, feed it links,
//! poll its status and download the finished archive.

use crate::{Bundler, Config, Result};
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod error_response;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::AppState;

/// Path of the OpenAPI document served for Swagger UI
pub const SWAGGER_DOC_PATH: &str = "/api-docs/openapi.json";

/// Create the API router with all route definitions
///
/// # Routes
///
/// ## Tasks
/// - `POST /tasks` - Create a task
/// - `POST /tasks/:id/links` - Add links (processes the task once the quota is reached)
/// - `GET /tasks/:id` - Get task status
/// - `GET /tasks/:id/download` - Download the archive and remove the task
///
/// ## System
/// - `GET /health` - Health check
/// - `GET /openapi.json` - OpenAPI specification
/// - `GET /swagger-ui` - Interactive Swagger UI documentation (if enabled),
///   reading its own copy of the document from [`SWAGGER_DOC_PATH`]
pub fn create_router(bundler: Arc<Bundler>, config: Arc<Config>) -> Router {
    let state = AppState::new(bundler);

    let router = Router::new()
        // Tasks
        .route("/tasks", post(routes::create_task))
        .route("/tasks/:id", get(routes::get_status))
        .route("/tasks/:id/links", post(routes::add_links))
        .route("/tasks/:id/download", get(routes::download_archive))
        // System
        .route("/health", get(routes::health_check))
        .route("/openapi.json", get(routes::openapi_spec));

    // Merge Swagger UI routes if enabled in config (before applying state).
    // SwaggerUi registers its document route itself, so it must not reuse /openapi.json.
    let router = if config.api.swagger_ui {
        router.merge(SwaggerUi::new("/swagger-ui").url(SWAGGER_DOC_PATH, ApiDoc::openapi()))
    } else {
        router
    };

    let router = router.with_state(state).layer(TraceLayer::new_for_http());

    // Apply CORS middleware if enabled in config (outermost)
    if config.api.cors_enabled {
        let cors = build_cors_layer(&config.api.cors_origins);
        router.layer(cors)
    } else {
        router
    }
}

/// CORS for browser clients polling task status and fetching archives
///
/// `"*"` or an empty list allows any origin. Origins that are not valid
/// header values are skipped with a warning.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() || origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins.iter().filter_map(|origin| {
            HeaderValue::from_str(origin)
                .inspect_err(|_| tracing::warn!(%origin, "ignoring invalid CORS origin"))
                .ok()
        }))
    };

    // Content-Disposition carries the archive filename for downloads
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
        .expose_headers([header::CONTENT_DISPOSITION])
}

/// Start the API server on the configured host and port.
///
/// Runs until `shutdown` resolves; in-flight requests are allowed to finish.
///
/// # Example
///
/// ```no_run
/// use link_bundler::{Bundler, Config};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Arc::new(Config::default());
/// let bundler = Arc::new(Bundler::new((*config).clone())?);
///
/// let shutdown = link_bundler::shutdown_signal();
/// link_bundler::api::start_api_server(bundler, config, shutdown).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_api_server<F>(
    bundler: Arc<Bundler>,
    config: Arc<Config>,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let bind_address = format!("{}:{}", config.service.bind_host(), config.service.port);

    tracing::info!(address = %bind_address, "Starting API server");

    let app = create_router(bundler, config);

    let listener = TcpListener::bind(&bind_address)
        .await
        .map_err(crate::error::Error::Io)?;

    tracing::info!(address = %bind_address, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| crate::error::Error::ApiServerError(e.to_string()))?;

    tracing::info!("API server stopped");
    Ok(())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
