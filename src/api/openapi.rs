//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{health, stats, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "User Stats API",
        version = "0.1.0",
        description = "User registration and daily action statistics"
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Users
        users::register_user,
        // Stats
        stats::record_stat,
        stats::top_stats,
    ),
    components(
        schemas(
            // Users
            crate::models::user::RegisterUser,
            crate::models::user::User,
            crate::models::enums::Sex,
            // Stats
            crate::models::stat::RecordStat,
            crate::models::enums::Action,
            crate::models::report::ReportRow,
            crate::models::report::DateGroup,
            crate::models::report::ReportDocument,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "User registration"),
        (name = "stats", description = "Action statistics")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
