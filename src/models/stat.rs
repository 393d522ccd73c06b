//! Stat submission and report query models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{enums::Action, user::TextId};

/// One counted user event. Persisted as a counter keyed by
/// `(user, action, date)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatEvent {
    pub user: String,
    pub action: Action,
    pub date: NaiveDate,
}

/// Stat submission body (POST /api/users/stats)
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RecordStat {
    /// Identifier of a registered user
    #[serde(default)]
    #[schema(value_type = String, example = "2")]
    pub user: Option<TextId>,
    /// One of login, like, commentary, logout
    #[serde(default)]
    #[schema(value_type = String, example = "like")]
    pub action: Option<String>,
    /// Event date (YYYY-MM-DD) or RFC 3339 timestamp
    #[serde(default)]
    #[schema(value_type = String, example = "2012-02-02")]
    pub ts: Option<String>,
}

/// Validated parameters of the top-stats report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopStatsQuery {
    /// Inclusive lower bound of the report window
    pub date_from: NaiveDate,
    /// Exclusive upper bound of the report window
    pub date_to: NaiveDate,
    pub action: Action,
    /// Maximum number of users kept per date
    pub limit: i64,
}
