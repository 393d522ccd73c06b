//! User model and registration payload

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use utoipa::ToSchema;

use super::enums::Sex;

/// A registered user. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Unique user identifier
    pub id: String,
    pub age: i32,
    pub sex: Sex,
}

/// Identifier accepted either as a JSON string or an integer.
/// Always stored as text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TextId {
    Text(String),
    Number(i64),
}

impl From<TextId> for String {
    fn from(id: TextId) -> Self {
        match id {
            TextId::Text(s) => s,
            TextId::Number(n) => n.to_string(),
        }
    }
}

/// Registration request body (POST /api/users).
///
/// Exactly `id`, `age` and `sex` are allowed; any other key is rejected while
/// decoding. Fields are optional here so that missing and `null` values reach
/// validation and get a proper message.
#[serde_as]
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct RegisterUser {
    /// User identifier (string or integer)
    #[serde(default)]
    #[schema(value_type = String, example = "2")]
    pub id: Option<TextId>,
    /// Age in years (integer or numeric string)
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[schema(value_type = i32, example = 18)]
    pub age: Option<i32>,
    /// "M" or "F"
    #[serde(default)]
    #[schema(value_type = String, example = "M")]
    pub sex: Option<String>,
}
