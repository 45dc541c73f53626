use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Stored in place of an empty referer so the column never holds `""`.
pub const DIRECT_REFERER: &str = "(direct)";

/// A pageview ready to be appended to the hit store.
///
/// Built only by the recorder, which guarantees `user_id` is non-empty and
/// `referer` is already normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHit {
    pub client_id: String,
    pub user_id: String,
    pub page: String,
    pub referer: String,
}

/// A pageview as persisted, including the store-assigned columns.
#[derive(Debug, Clone, FromRow)]
pub struct Hit {
    pub id: i64,
    pub client_id: String,
    pub user_id: String,
    pub page: String,
    pub referer: String,
    pub created_at: i64,
}

/// Hit column a grouped count can be taken over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitField {
    Referer,
    Page,
}

impl HitField {
    /// Column name in the `hits` table. Only these fixed names are ever
    /// interpolated into SQL.
    pub const fn column(self) -> &'static str {
        match self {
            HitField::Referer => "referer",
            HitField::Page => "page",
        }
    }
}

/// One row of a grouped count. Serialized with the field names dashboards
/// already consume: `{"String": "...", "Count": 3}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct StringCount {
    #[serde(rename = "String")]
    pub value: String,
    #[serde(rename = "Count")]
    pub count: i64,
}

impl StringCount {
    pub fn new(value: impl Into<String>, count: i64) -> Self {
        Self {
            value: value.into(),
            count,
        }
    }
}
