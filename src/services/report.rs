//! Report aggregation
//!
//! Regroups ranked rows by calendar date. Dates are keyed by their
//! `YYYY-MM-DD` rendering and ordered as strings, which is chronological
//! only because that format is zero-padded and most-significant first.
//! Switching to another date rendering requires ordering by `NaiveDate`.

use std::collections::BTreeMap;

use crate::{
    models::{DateGroup, Dated, ReportDocument, ReportRow},
    validator::DATE_FORMAT,
};

/// Group rows by canonical date string.
///
/// Groups come out in ascending key order; rows inside a group keep the order
/// in which they were received.
pub fn group_by_date<R, I>(rows: I) -> Vec<(String, Vec<R>)>
where
    R: Dated,
    I: IntoIterator<Item = R>,
{
    let mut groups: BTreeMap<String, Vec<R>> = BTreeMap::new();
    for row in rows {
        let key = row.date().format(DATE_FORMAT).to_string();
        groups.entry(key).or_default().push(row);
    }
    groups.into_iter().collect()
}

/// Build the top-stats response document from store rows
pub fn build_report(rows: Vec<ReportRow>) -> ReportDocument {
    ReportDocument {
        items: group_by_date(rows)
            .into_iter()
            .map(|(date, rows)| DateGroup { date, rows })
            .collect(),
    }
}
