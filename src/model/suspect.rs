use serde::{Deserialize, Serialize};

/// A member of the household, fixed at startup and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suspect {
    pub id: String,
    pub name: String,
    pub role_label: String,
    pub description: String,
    pub portrait: String,
}

/// Declared for future case files; nothing populates it yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evidence {
    pub id: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}
