use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Narrator,
    Player,
    System,
}

/// One entry in the append-only conversation log. Immutable once appended;
/// insertion order is the log's only ordering guarantee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Attached clue photograph as a `data:` URI. Player messages only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn player(content: impl Into<String>, image: Option<String>) -> Self {
        Self {
            role: Role::Player,
            content: content.into(),
            image,
            timestamp: Utc::now(),
        }
    }

    pub fn narrator(content: impl Into<String>) -> Self {
        Self {
            role: Role::Narrator,
            content: content.into(),
            image: None,
            timestamp: Utc::now(),
        }
    }
}
