use serde::{Deserialize, Serialize};

use crate::model::message::Message;
use crate::model::suspect::{Evidence, Suspect};

/// A full snapshot of the session sent from the engine to the UI.
/// This is READ-ONLY outside the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub messages: Vec<Message>,
    pub suspects: Vec<Suspect>,
    pub evidence: Vec<Evidence>,
    pub game_started: bool,
    pub awaiting_reply: bool,
}
