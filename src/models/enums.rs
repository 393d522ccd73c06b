//! Shared domain enums

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Raised when a string does not name a variant of a closed enum
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} value: {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

// ---------------------------------------------------------------------------
// Sex
// ---------------------------------------------------------------------------

/// Sex of a registered user, stored and transmitted as a single letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "M",
            Sex::Female => "F",
        }
    }
}

impl FromStr for Sex {
    type Err = UnknownVariant;

    /// Case-sensitive: only `M` and `F` are accepted
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "M" => Ok(Sex::Male),
            "F" => Ok(Sex::Female),
            other => Err(UnknownVariant {
                kind: "sex",
                value: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Sex {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        // CHAR(1) columns may come back blank-padded
        value.trim_end().parse()
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// Category of a user event counted in the statistics table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Login,
    Like,
    Commentary,
    Logout,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Login, Action::Like, Action::Commentary, Action::Logout];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Login => "login",
            Action::Like => "like",
            Action::Commentary => "commentary",
            Action::Logout => "logout",
        }
    }
}

impl FromStr for Action {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "action",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
