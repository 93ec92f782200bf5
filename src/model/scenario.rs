use crate::model::suspect::Suspect;

/// Synthetic Player instruction that opens the case. Sent to the narrator
/// once, never shown in the log.
pub const OPENING_PROMPT: &str =
    "Introduce the crime scene at Vanguard Estate and the three suspects present.";

/// Stands in for the player's words when a clue photo is sent without text.
pub const CLUE_PROMPT: &str = "I found this clue at the scene. What do you make of it?";

/// Shown when the model answers with nothing usable.
pub const SILENT_REPLY: &str = "The shadows remain silent...";

/// Shown in place of any failed narrator call. The one error surface.
pub const CONNECTION_LOST: &str = "A sudden static fills your mind... (Connection Error)";

pub const CASE_TITLE: &str = "MIDNIGHT MANOR";
pub const CASE_NUMBER: &str = "Case #1924-A";
pub const CASE_TAGLINE: &str =
    "\"The rain hasn't stopped, and neither has the pulse of the killer among us.\"";
pub const CASE_OBJECTIVE: &str = "Gather evidence, interrogate the household, and present an \
Accusation Report to the Dungeon Master when you're ready to close the case.";

/// Persona directive prepended to every narrator request. Carries the
/// scenario, the suspects' secrets and the accusation rule; it is never part
/// of the visible log.
pub const NARRATOR_PERSONA: &str = r#"You are the "Dungeon Master" of a dynamic, multimodal murder mystery game set in "Vanguard Estate", a 1920s-style mansion.

SCENARIO: Lord Harrington has been murdered in his locked study during a blackout.
SUSPECTS:
1. Arthur (The Butler): Stoic, observant, seemingly loyal. Secret: He was being fired that morning.
2. Evelyn (The Niece): Estranged, debt-ridden, sharp-tongued. Secret: She forged her uncle's will.
3. Dr. Aris (The Partner): Nervous scientist. Secret: Harrington was going to expose his fraudulent research.

RULES:
- You play all NPCs. Respond as them in dialogue or as the DM describing scenes.
- Use a suspenseful, noir-inspired tone.
- If the player uploads an image, interpret it as a "clue" found at the scene. Explain its relevance to the case or a suspect's alibi.
- Do not reveal the culprit (Dr. Aris poisoned the brandy, but Arthur moved the glass) until a formal Accusation Report is presented.
- Keep responses concise but atmospheric. Use Markdown for emphasis.

When responding to an accusation, judge it based on logical consistency with the clues provided during the game."#;

/// The fixed roster present at the estate on the night of the murder.
pub fn manor_suspects() -> Vec<Suspect> {
    vec![
        Suspect {
            id: "1".into(),
            name: "Arthur".into(),
            role_label: "The Butler".into(),
            description: "A man of few words, his hands slightly tremble when he pours the tea."
                .into(),
            portrait: "portraits/butler".into(),
        },
        Suspect {
            id: "2".into(),
            name: "Evelyn".into(),
            role_label: "The Niece".into(),
            description:
                "Dripping in diamonds but drowning in gambling debts. She looks bored by the tragedy."
                    .into(),
            portrait: "portraits/niece".into(),
        },
        Suspect {
            id: "3".into(),
            name: "Dr. Aris".into(),
            role_label: "The Partner".into(),
            description:
                "Adjusting his spectacles constantly. He carries a leather briefcase he refuses to open."
                    .into(),
            portrait: "portraits/doctor".into(),
        },
    ]
}
