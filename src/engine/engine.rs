use std::sync::mpsc::{Receiver, Sender};

use crate::engine::narrator::{GeminiNarrator, Narrator};
use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::engine::session::Session;

/// Runs on its own thread and is the only writer of session state. Each turn
/// publishes two snapshots: one with the player's message while the narrator
/// call is in flight, one with the reply.
pub struct Engine {
    rx: Receiver<EngineCommand>,
    tx: Sender<EngineResponse>,
    session: Session,
    narrator: Box<dyn Narrator>,
}

impl Engine {
    pub fn new(
        rx: Receiver<EngineCommand>,
        tx: Sender<EngineResponse>,
        narrator: Box<dyn Narrator>,
    ) -> Self {
        Self {
            rx,
            tx,
            session: Session::new(),
            narrator,
        }
    }

    pub fn run(&mut self) {
        while let Ok(cmd) = self.rx.recv() {
            match cmd {
                EngineCommand::StartGame => self.start_game(),
                EngineCommand::SubmitTurn { text, image } => self.submit_turn(&text, image),
                EngineCommand::ConfigureNarrator(settings) => {
                    log::info!("narrator reconfigured (model: {})", settings.model);
                    self.narrator = Box::new(GeminiNarrator::new(settings));
                }
            }
        }
    }

    fn start_game(&mut self) {
        let seed = match self.session.begin_opening() {
            Ok(seed) => seed,
            Err(err) => {
                log::warn!("start refused: {err}");
                let _ = self.tx.send(EngineResponse::TurnRejected(err.to_string()));
                return;
            }
        };

        let _ = self
            .tx
            .send(EngineResponse::TurnStarted(self.session.snapshot()));

        log::info!("opening the case");
        let reply = self.narrator.respond(&[seed]);
        self.session.finish_opening(reply);

        let _ = self
            .tx
            .send(EngineResponse::TurnCompleted(self.session.snapshot()));
    }

    fn submit_turn(&mut self, text: &str, image: Option<String>) {
        if let Err(err) = self.session.begin_turn(text, image) {
            log::warn!("turn refused: {err}");
            let _ = self.tx.send(EngineResponse::TurnRejected(err.to_string()));
            return;
        }

        let _ = self
            .tx
            .send(EngineResponse::TurnStarted(self.session.snapshot()));

        let reply = self.narrator.respond(self.session.messages());
        self.session.finish_turn(reply);

        let _ = self
            .tx
            .send(EngineResponse::TurnCompleted(self.session.snapshot()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::message::{Message, Role};
    use crate::model::scenario;
    use std::sync::mpsc;
    use std::time::Duration;

    struct Scripted(&'static str);

    impl Narrator for Scripted {
        fn respond(&self, _log: &[Message]) -> String {
            self.0.to_string()
        }
    }

    fn recv(rx: &mpsc::Receiver<EngineResponse>) -> EngineResponse {
        rx.recv_timeout(Duration::from_secs(5))
            .expect("engine should answer promptly")
    }

    #[test]
    fn engine_runs_a_full_case() {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();

        let handle = std::thread::spawn(move || {
            let mut engine = Engine::new(
                cmd_rx,
                resp_tx,
                Box::new(Scripted("The study smells of bitter almonds.")),
            );
            engine.run();
        });

        // Opening: an empty in-flight snapshot, then one narrator message.
        cmd_tx.send(EngineCommand::StartGame).unwrap();
        match recv(&resp_rx) {
            EngineResponse::TurnStarted(snap) => {
                assert!(snap.messages.is_empty());
                assert!(snap.awaiting_reply);
            }
            _ => panic!("expected TurnStarted"),
        }
        match recv(&resp_rx) {
            EngineResponse::TurnCompleted(snap) => {
                assert_eq!(snap.messages.len(), 1);
                assert_eq!(snap.messages[0].role, Role::Narrator);
                assert!(snap.game_started);
                assert_eq!(snap.suspects.len(), 3);
                assert!(snap.evidence.is_empty());
            }
            _ => panic!("expected TurnCompleted"),
        }

        // A question: player message visible mid-flight, then the reply.
        cmd_tx
            .send(EngineCommand::SubmitTurn {
                text: "Where was Arthur at midnight?".into(),
                image: None,
            })
            .unwrap();
        match recv(&resp_rx) {
            EngineResponse::TurnStarted(snap) => {
                assert_eq!(snap.messages.len(), 2);
                assert_eq!(snap.messages[1].role, Role::Player);
                assert!(snap.awaiting_reply);
            }
            _ => panic!("expected TurnStarted"),
        }
        match recv(&resp_rx) {
            EngineResponse::TurnCompleted(snap) => {
                assert_eq!(snap.messages.len(), 3);
                assert!(!snap.awaiting_reply);
            }
            _ => panic!("expected TurnCompleted"),
        }

        // Image-only submission gets the canned clue phrase.
        cmd_tx
            .send(EngineCommand::SubmitTurn {
                text: String::new(),
                image: Some("data:image/png;base64,AAAA".into()),
            })
            .unwrap();
        match recv(&resp_rx) {
            EngineResponse::TurnStarted(snap) => {
                let player = snap.messages.last().unwrap();
                assert_eq!(player.content, scenario::CLUE_PROMPT);
                assert!(player.image.is_some());
            }
            _ => panic!("expected TurnStarted"),
        }
        assert!(matches!(recv(&resp_rx), EngineResponse::TurnCompleted(_)));

        // A blank submission is refused without touching the log.
        cmd_tx
            .send(EngineCommand::SubmitTurn {
                text: "  ".into(),
                image: None,
            })
            .unwrap();
        assert!(matches!(recv(&resp_rx), EngineResponse::TurnRejected(_)));

        drop(cmd_tx);
        handle.join().unwrap();
    }
}
