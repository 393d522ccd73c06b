//! API handlers for the userstats REST endpoints

pub mod health;
pub mod openapi;
pub mod stats;
pub mod users;

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    routing::{get, post},
    Router,
};
use serde_json::error::Category;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    error::AppError,
    models::TopStatsQuery,
    validator::{self, Validate, ValidationError},
    AppState,
};

/// Create the application router with all routes.
///
/// A known path hit with another method answers 405.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Users
        .route("/api/users", post(users::register_user))
        // Statistics
        .route("/api/users/stats", post(stats::record_stat))
        .route("/api/users/stats/top", get(stats::top_stats))
        .with_state(state);

    Router::new()
        .merge(api)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}

/// JSON body extractor that decodes `T` and validates it into `T::Output`.
///
/// The body is decoded whatever its `Content-Type`. Undecodable JSON is a
/// bad request; well-formed JSON of the wrong shape is a validation failure.
pub struct ValidJson<T: Validate>(pub T::Output);

#[async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: Validate + Send,
    T::Output: Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        let payload: T = serde_json::from_slice(&body).map_err(|err| match err.classify() {
            Category::Data => AppError::from(ValidationError::Parameters(T::FIELDS)),
            Category::Io | Category::Syntax | Category::Eof => {
                AppError::BadRequest("Incorrect JSON format".to_string())
            }
        })?;

        Ok(Self(payload.validate()?))
    }
}

/// Query-string extractor for the top-stats report
pub struct ReportParams(pub TopStatsQuery);

#[async_trait]
impl<S> FromRequestParts<S> for ReportParams
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map_err(|_| AppError::BadRequest("Incorrect query rows".to_string()))?;

        Ok(Self(validator::top_stats_query(&pairs)?))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::{sync::Arc, time::Duration};

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use tower::ServiceExt;

    use crate::{repository::MockStore, services::Services, AppState};

    pub fn app(store: MockStore) -> Router {
        let services = Services::new(Arc::new(store), Duration::from_secs(5));
        super::create_router(AppState {
            services: Arc::new(services),
        })
    }

    pub fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    /// Run one request through the router, returning status and body text
    pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }
}
