//! Top-stats report rows and document

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::enums::Sex;

/// Rows that can be grouped by calendar date
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

/// One ranked entry of the report: a user's counter for a given date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ReportRow {
    #[schema(value_type = String, format = Date, example = "2012-02-02")]
    pub date: NaiveDate,
    pub user_id: String,
    pub age: i32,
    #[sqlx(try_from = "String")]
    pub sex: Sex,
    /// Number of events recorded for this user, action and date
    pub count: i64,
}

impl Dated for ReportRow {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Rows of a single date, in the order the store ranked them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DateGroup {
    /// Canonical YYYY-MM-DD date
    pub date: String,
    pub rows: Vec<ReportRow>,
}

/// Response body of GET /api/users/stats/top
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReportDocument {
    /// Date groups in ascending date order
    pub items: Vec<DateGroup>,
}
