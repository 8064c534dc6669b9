//! OpenAPI documentation and schema generation
//!
//! Compile-time spec generation with utoipa.

use utoipa::OpenApi;

/// OpenAPI documentation for the link-bundler REST API
///
/// The document is served at:
/// - `/openapi.json` - JSON format OpenAPI specification
/// - `/swagger-ui` - Interactive Swagger UI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "link-bundler REST API",
        version = "0.1.0",
        description = "Collect links into tasks, fetch them concurrently and download the results as a single ZIP archive",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        // Tasks
        crate::api::routes::create_task,
        crate::api::routes::add_links,
        crate::api::routes::get_status,
        crate::api::routes::download_archive,

        // System
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
    ),
    components(schemas(
        crate::types::TaskId,
        crate::types::Status,
        crate::types::TaskCreated,
        crate::types::StatusReport,

        crate::api::routes::AddLinksRequest,
        crate::api::routes::AddLinksResponse,

        crate::error::ApiError,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "tasks", description = "Tasks - Create, add links, check status and download archives"),
        (name = "system", description = "System endpoints - Health checks and OpenAPI spec"),
    )
)]
pub struct ApiDoc;
