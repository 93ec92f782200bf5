use anyhow::{ensure, Result};

use crate::engine::narrator::Narrator;
use crate::model::message::Message;
use crate::model::scenario;
use crate::model::session_state::SessionSnapshot;
use crate::model::suspect::{Evidence, Suspect};

/// Owned session state plus the turn controller that mutates it.
///
/// The message log is append-only and grows by exactly two per turn (one
/// Player, one Narrator), or by one for the opening. At most one reply is
/// ever outstanding; `begin_turn` refuses to overlap.
pub struct Session {
    messages: Vec<Message>,
    suspects: Vec<Suspect>,
    evidence: Vec<Evidence>,
    awaiting_reply: bool,
    game_started: bool,
}

impl Session {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            suspects: scenario::manor_suspects(),
            evidence: Vec::new(),
            awaiting_reply: false,
            game_started: false,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn awaiting_reply(&self) -> bool {
        self.awaiting_reply
    }

    pub fn game_started(&self) -> bool {
        self.game_started
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            messages: self.messages.clone(),
            suspects: self.suspects.clone(),
            evidence: self.evidence.clone(),
            game_started: self.game_started,
            awaiting_reply: self.awaiting_reply,
        }
    }

    /// Opens the case. Returns the synthetic seed instruction to send to the
    /// narrator; the seed itself is never retained in the log.
    pub fn begin_opening(&mut self) -> Result<Message> {
        ensure!(!self.game_started, "the investigation is already underway");
        ensure!(!self.awaiting_reply, "the narrator is still writing");
        self.awaiting_reply = true;
        Ok(Message::player(scenario::OPENING_PROMPT, None))
    }

    /// Records the scene-setting reply; only now does the game count as started.
    pub fn finish_opening(&mut self, reply: String) {
        self.messages.push(Message::narrator(reply));
        self.awaiting_reply = false;
        self.game_started = true;
    }

    /// Appends the player's message and marks the reply as pending.
    /// Refuses blank submissions and overlapping turns without touching the log.
    pub fn begin_turn(&mut self, text: &str, image: Option<String>) -> Result<()> {
        ensure!(!self.awaiting_reply, "the narrator is still writing");
        let text = text.trim();
        ensure!(
            !text.is_empty() || image.is_some(),
            "nothing to send: type a question or attach a clue"
        );
        let content = if text.is_empty() {
            scenario::CLUE_PROMPT
        } else {
            text
        };
        self.messages.push(Message::player(content, image));
        self.awaiting_reply = true;
        Ok(())
    }

    /// Records the narrator's reply and closes the turn.
    pub fn finish_turn(&mut self, reply: String) {
        self.messages.push(Message::narrator(reply));
        self.awaiting_reply = false;
    }

    /// One full opening exchange. The engine loop uses the begin/finish halves
    /// directly so the UI can render between them.
    pub fn start(&mut self, narrator: &dyn Narrator) -> Result<()> {
        let seed = self.begin_opening()?;
        let reply = narrator.respond(&[seed]);
        self.finish_opening(reply);
        Ok(())
    }

    /// One full turn: player message in, narrator reply out. A turn that
    /// begins always completes; narrator failures arrive as an in-character
    /// reply, never as an error.
    pub fn advance(
        &mut self,
        narrator: &dyn Narrator,
        text: &str,
        image: Option<String>,
    ) -> Result<()> {
        self.begin_turn(text, image)?;
        let reply = narrator.respond(&self.messages);
        self.finish_turn(reply);
        Ok(())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::message::Role;
    use std::cell::Cell;

    struct Scripted(&'static str);

    impl Narrator for Scripted {
        fn respond(&self, _log: &[Message]) -> String {
            self.0.to_string()
        }
    }

    /// Counts calls so rejection tests can prove no request went out.
    struct Counting {
        calls: Cell<usize>,
    }

    impl Counting {
        fn new() -> Self {
            Self {
                calls: Cell::new(0),
            }
        }
    }

    impl Narrator for Counting {
        fn respond(&self, _log: &[Message]) -> String {
            self.calls.set(self.calls.get() + 1);
            "noted".to_string()
        }
    }

    #[test]
    fn opening_records_only_the_reply() {
        let mut session = Session::new();
        session
            .start(&Scripted("Rain lashes the windows of Vanguard Estate."))
            .expect("fresh session starts");

        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].role, Role::Narrator);
        assert!(session.game_started());
        assert!(!session.awaiting_reply());
    }

    #[test]
    fn opening_twice_is_refused() {
        let mut session = Session::new();
        session.start(&Scripted("intro")).unwrap();
        assert!(session.start(&Scripted("intro again")).is_err());
        assert_eq!(session.messages().len(), 1);
    }

    #[test]
    fn turn_appends_player_then_narrator() {
        let mut session = Session::new();
        session
            .advance(
                &Scripted("Arthur claims he was polishing silver."),
                "Where was Arthur at midnight?",
                None,
            )
            .expect("valid submission");

        let log = session.messages();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].role, Role::Player);
        assert_eq!(log[0].content, "Where was Arthur at midnight?");
        assert_eq!(log[1].role, Role::Narrator);
        assert!(!session.awaiting_reply());
    }

    #[test]
    fn blank_submission_is_rejected_without_a_call() {
        let mut session = Session::new();
        let narrator = Counting::new();

        assert!(session.advance(&narrator, "   ", None).is_err());
        assert!(session.messages().is_empty(), "log must stay untouched");
        assert_eq!(narrator.calls.get(), 0, "no request may go out");
    }

    #[test]
    fn overlapping_turn_is_rejected() {
        let mut session = Session::new();
        session.begin_turn("Who poured the brandy?", None).unwrap();
        assert!(session.awaiting_reply());

        let narrator = Counting::new();
        assert!(session.advance(&narrator, "Second question", None).is_err());
        assert_eq!(session.messages().len(), 1);
        assert_eq!(narrator.calls.get(), 0);

        session.finish_turn("Evelyn did, she says.".into());
        assert_eq!(session.messages().len(), 2);
        assert!(!session.awaiting_reply());
    }

    #[test]
    fn image_only_turn_uses_the_clue_phrase() {
        let mut session = Session::new();
        let uri = "data:image/png;base64,AAAA".to_string();
        session
            .advance(&Scripted("A torn glove..."), "", Some(uri.clone()))
            .expect("image alone is a valid submission");

        let player = &session.messages()[0];
        assert_eq!(player.content, scenario::CLUE_PROMPT);
        assert_eq!(player.image.as_deref(), Some(uri.as_str()));
    }

    #[test]
    fn absorbed_failure_still_completes_the_turn() {
        // A failed call reaches the session as an ordinary reply string.
        let mut session = Session::new();
        session
            .advance(&Scripted(scenario::CONNECTION_LOST), "Accuse Evelyn", None)
            .unwrap();

        assert_eq!(session.messages()[1].content, scenario::CONNECTION_LOST);
        assert!(!session.awaiting_reply());
    }

    #[test]
    fn log_grows_two_per_turn_one_for_opening() {
        let mut session = Session::new();
        let narrator = Scripted("reply");

        session.start(&narrator).unwrap();
        assert_eq!(session.messages().len(), 1);

        for turn in 1usize..=4 {
            session.advance(&narrator, "Another question", None).unwrap();
            assert_eq!(session.messages().len(), 1 + 2 * turn);
        }
    }

    #[test]
    fn full_investigation_flow() {
        let mut session = Session::new();
        let narrator = Scripted("The study door was locked from the inside.");

        session.start(&narrator).unwrap();
        assert_eq!(session.messages().len(), 1);
        assert!(session.game_started());

        session
            .advance(&narrator, "Where was Arthur at midnight?", None)
            .unwrap();
        assert_eq!(session.messages().len(), 3);

        let uri = "data:image/jpeg;base64,Zm9v".to_string();
        session.advance(&narrator, "", Some(uri.clone())).unwrap();
        let log = session.messages();
        assert_eq!(log.len(), 5);
        assert_eq!(log[3].content, scenario::CLUE_PROMPT);
        assert_eq!(log[3].image.as_deref(), Some(uri.as_str()));
    }
}
