use crate::engine::narrator::NarratorSettings;
use crate::model::session_state::SessionSnapshot;

pub enum EngineCommand {
    /// Open the case: the narrator sets the scene from a synthetic seed
    /// instruction that never enters the visible log.
    StartGame,
    /// One player submission: text, an attached clue photo, or both.
    SubmitTurn {
        text: String,
        image: Option<String>,
    },
    /// Swap the narrator client, e.g. after the API key changed.
    ConfigureNarrator(NarratorSettings),
}

pub enum EngineResponse {
    /// The player's message is in the log; the reply is pending.
    TurnStarted(SessionSnapshot),
    /// The narrator's reply is in the log.
    TurnCompleted(SessionSnapshot),
    /// The submission was refused; the log is untouched.
    TurnRejected(String),
}
