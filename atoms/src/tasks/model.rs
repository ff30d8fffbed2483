use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize, Serializer};

/// Timestamp layout used on the wire, matching MySQL's DATETIME text form
pub const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Task domain model - one row of the `todos` table
#[derive(Debug, Serialize, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Task {
    pub id: i64,
    pub task: String,

    /// Stored as TINYINT(1); the client only checks truthiness so it goes out as 0/1
    #[serde(serialize_with = "as_flag")]
    pub completed: bool,

    #[serde(serialize_with = "as_datetime")]
    pub created_at: NaiveDateTime,
}

/// Body of POST /api/add_todo
#[derive(Debug, Deserialize, Default)]
pub struct CreateTaskPayload {
    pub task: Option<String>,
}

/// Body of POST /api/complete_todo and /api/delete_todo
#[derive(Debug, Deserialize, Default)]
pub struct TaskIdPayload {
    pub id: Option<RawTaskId>,
}

/// Form bodies always carry text, JSON bodies may carry a number.
/// Kept raw so a missing id and a malformed id can be told apart.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum RawTaskId {
    Number(i64),
    Float(f64),
    Text(String),
}

fn as_flag<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(u8::from(*value))
}

fn as_datetime<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&value.format(CREATED_AT_FORMAT))
}
