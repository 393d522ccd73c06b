//! Request validation
//!
//! Pure checks turning decoded request payloads into typed domain values.
//! Every failure carries a message telling which rule was violated.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::{Action, RecordStat, RegisterUser, Sex, StatEvent, TopStatsQuery, User};

/// Canonical calendar date format used on the wire
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing one or more parameters or parameters invalid (use {0})")]
    Parameters(&'static str),

    #[error("Incorrect number of params (have {have}, must 4)")]
    ParamCount { have: usize },

    #[error("Incorrect value for action: {0:?} (use login, like, commentary or logout)")]
    Action(String),

    #[error("Incorrect value for sex: {0:?} (use \"M\" or \"F\")")]
    Sex(String),

    #[error("Incorrect value for {field}: {value:?}")]
    Value { field: &'static str, value: String },
}

/// A request payload that is decoded from JSON and then validated
pub trait Validate: DeserializeOwned {
    type Output;

    /// Human-readable list of the fields the payload must carry
    const FIELDS: &'static str;

    fn validate(self) -> Result<Self::Output, ValidationError>;
}

impl Validate for RegisterUser {
    type Output = User;

    const FIELDS: &'static str = r#""id", "age" and "sex""#;

    fn validate(self) -> Result<User, ValidationError> {
        registration(self)
    }
}

impl Validate for RecordStat {
    type Output = StatEvent;

    const FIELDS: &'static str = r#""user", "action" and "ts""#;

    fn validate(self) -> Result<StatEvent, ValidationError> {
        stat_submission(self)
    }
}

/// Validate a registration payload.
///
/// Unknown keys never get this far: they are rejected while decoding.
pub fn registration(payload: RegisterUser) -> Result<User, ValidationError> {
    let (Some(id), Some(age), Some(sex)) = (payload.id, payload.age, payload.sex) else {
        return Err(ValidationError::Parameters(RegisterUser::FIELDS));
    };

    Ok(User {
        id: id.into(),
        age,
        sex: sex_value(&sex)?,
    })
}

/// Validate a stat submission payload
pub fn stat_submission(payload: RecordStat) -> Result<StatEvent, ValidationError> {
    let (Some(user), Some(action), Some(ts)) = (payload.user, payload.action, payload.ts) else {
        return Err(ValidationError::Parameters(RecordStat::FIELDS));
    };

    Ok(StatEvent {
        user: user.into(),
        action: action_value(&action)?,
        date: event_date(&ts)?,
    })
}

/// Validate the query-string pairs of the top-stats report.
///
/// Repeated keys are allowed; the first value wins.
pub fn top_stats_query(pairs: &[(String, String)]) -> Result<TopStatsQuery, ValidationError> {
    let mut params: BTreeMap<&str, &str> = BTreeMap::new();
    for (key, value) in pairs {
        params.entry(key.as_str()).or_insert(value.as_str());
    }

    let (Some(date1), Some(date2), Some(action), Some(limit)) = (
        params.get("date1"),
        params.get("date2"),
        params.get("action"),
        params.get("limit"),
    ) else {
        return Err(ValidationError::ParamCount { have: params.len() });
    };

    let action = action_value(action)?;
    let date_from = calendar_date("date1", date1)?;
    let date_to = calendar_date("date2", date2)?;
    let limit = limit
        .parse::<i64>()
        .ok()
        .filter(|limit| *limit > 0)
        .ok_or_else(|| ValidationError::Value {
            field: "limit",
            value: limit.to_string(),
        })?;

    Ok(TopStatsQuery {
        date_from,
        date_to,
        action,
        limit,
    })
}

/// Closed-set check for `action`
pub fn action_value(value: &str) -> Result<Action, ValidationError> {
    value
        .parse()
        .map_err(|_| ValidationError::Action(value.to_string()))
}

/// Closed-set check for `sex`
pub fn sex_value(value: &str) -> Result<Sex, ValidationError> {
    value
        .parse()
        .map_err(|_| ValidationError::Sex(value.to_string()))
}

fn calendar_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| ValidationError::Value {
        field,
        value: value.to_string(),
    })
}

/// `ts` may be a plain date or a full RFC 3339 timestamp; only the date is kept
fn event_date(ts: &str) -> Result<NaiveDate, ValidationError> {
    calendar_date("ts", ts).or_else(|err| {
        DateTime::parse_from_rfc3339(ts)
            .map(|dt| dt.date_naive())
            .map_err(|_| err)
    })
}
