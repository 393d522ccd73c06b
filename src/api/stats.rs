//! Statistics endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::{RecordStat, ReportDocument},
};

use super::{ReportParams, ValidJson};

/// Count one user event
#[utoipa::path(
    post,
    path = "/api/users/stats",
    tag = "stats",
    request_body = RecordStat,
    responses(
        (status = 200, description = "Event counted"),
        (status = 400, description = "Malformed JSON or invalid parameters", body = crate::error::ErrorResponse),
        (status = 405, description = "Method not allowed"),
        (status = 500, description = "Database error", body = crate::error::ErrorResponse)
    )
)]
pub async fn record_stat(
    State(state): State<crate::AppState>,
    ValidJson(event): ValidJson<RecordStat>,
) -> AppResult<StatusCode> {
    state.services.stats.record(&event).await?;
    Ok(StatusCode::OK)
}

/// Most active users per day for one action
#[utoipa::path(
    get,
    path = "/api/users/stats/top",
    tag = "stats",
    params(
        ("date1" = String, Query, description = "First day of the window (YYYY-MM-DD, inclusive)"),
        ("date2" = String, Query, description = "End of the window (YYYY-MM-DD, exclusive)"),
        ("action" = crate::models::Action, Query, description = "login, like, commentary or logout"),
        ("limit" = i64, Query, description = "Users kept per day")
    ),
    responses(
        (status = 200, description = "Top users grouped by day", body = ReportDocument),
        (status = 400, description = "Malformed query or invalid parameters", body = crate::error::ErrorResponse),
        (status = 405, description = "Method not allowed"),
        (status = 500, description = "Database error", body = crate::error::ErrorResponse)
    )
)]
pub async fn top_stats(
    State(state): State<crate::AppState>,
    ReportParams(query): ReportParams,
) -> AppResult<Json<ReportDocument>> {
    let report = state.services.stats.top(&query).await?;
    Ok(Json(report))
}
