use anyhow::{ensure, Context as _, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::model::attachment;
use crate::model::message::{Message, Role};
use crate::model::scenario;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Seam between the engine and the hosted model.
///
/// Implementations absorb every failure into an in-character reply string;
/// the rest of the app has no error surface for a lost narrator.
pub trait Narrator: Send {
    fn respond(&self, log: &[Message]) -> String;
}

/// Credentials and generation knobs, persisted with the UI settings.
/// Defaults match the original tuning; any stable configuration works.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarratorSettings {
    /// Stored key. `GEMINI_API_KEY` in the environment takes precedence.
    #[serde(default)]
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    #[serde(default)]
    pub thinking_budget: Option<u32>,
}

impl Default for NarratorSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gemini-3-pro-preview".into(),
            temperature: 0.8,
            top_p: 0.95,
            thinking_budget: Some(2000),
        }
    }
}

impl NarratorSettings {
    fn resolved_api_key(&self) -> Option<String> {
        std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| {
                let stored = self.api_key.trim();
                (!stored.is_empty()).then(|| stored.to_string())
            })
    }
}

/* =========================
   Wire types
   ========================= */

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<WireContent>,
    system_instruction: WireContent,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<WirePart>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

impl WirePart {
    fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            inline_data: None,
        }
    }

    fn inline(mime_type: &str, data: &str) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.to_string(),
                data: data.to_string(),
            }),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    thinking_config: Option<ThinkingConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<WireContent>,
}

/* =========================
   Client
   ========================= */

pub struct GeminiNarrator {
    settings: NarratorSettings,
}

impl GeminiNarrator {
    pub fn new(settings: NarratorSettings) -> Self {
        Self { settings }
    }

    fn request_body(&self, log: &[Message]) -> GenerateRequest {
        GenerateRequest {
            contents: conversation(log),
            system_instruction: WireContent {
                role: None,
                parts: vec![WirePart::text(scenario::NARRATOR_PERSONA)],
            },
            generation_config: GenerationConfig {
                temperature: self.settings.temperature,
                top_p: self.settings.top_p,
                thinking_config: self
                    .settings
                    .thinking_budget
                    .map(|thinking_budget| ThinkingConfig { thinking_budget }),
            },
        }
    }

    fn call(&self, log: &[Message]) -> Result<String> {
        ensure!(!log.is_empty(), "empty conversation");
        let key = self
            .settings
            .resolved_api_key()
            .context("no API key configured")?;

        // No deadline: a hung request stays pending until the server answers.
        let client = reqwest::blocking::Client::builder()
            .timeout(None::<Duration>)
            .build()?;

        let url = format!("{API_BASE}/models/{}:generateContent", self.settings.model);
        let response = client
            .post(&url)
            .header("x-goog-api-key", key)
            .json(&self.request_body(log))
            .send()?
            .error_for_status()?
            .json::<GenerateResponse>()?;

        Ok(reply_text(&response))
    }
}

impl Narrator for GeminiNarrator {
    fn respond(&self, log: &[Message]) -> String {
        absorb(self.call(log))
    }
}

/// Maps the session's role vocabulary onto the wire's two-role one.
fn wire_role(role: Role) -> &'static str {
    match role {
        Role::Player => "user",
        Role::Narrator | Role::System => "model",
    }
}

fn conversation(log: &[Message]) -> Vec<WireContent> {
    log.iter()
        .map(|msg| {
            let mut parts = vec![WirePart::text(&msg.content)];
            if msg.role == Role::Player {
                if let Some(uri) = &msg.image {
                    if let Some((mime, payload)) = attachment::split_data_uri(uri) {
                        parts.push(WirePart::inline(mime, payload));
                    }
                }
            }
            WireContent {
                role: Some(wire_role(msg.role).to_string()),
                parts,
            }
        })
        .collect()
}

fn reply_text(response: &GenerateResponse) -> String {
    let text = response
        .candidates
        .first()
        .and_then(|candidate| candidate.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|part| part.text.as_deref())
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        scenario::SILENT_REPLY.to_string()
    } else {
        text
    }
}

/// Collapses every failure into the single in-character placeholder.
fn absorb(result: Result<String>) -> String {
    match result {
        Ok(text) => text,
        Err(err) => {
            log::error!("narrator request failed: {err:#}");
            scenario::CONNECTION_LOST.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use chrono::Utc;

    fn narrator() -> GeminiNarrator {
        GeminiNarrator::new(NarratorSettings::default())
    }

    fn system_message(content: &str) -> Message {
        Message {
            role: Role::System,
            content: content.into(),
            image: None,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn roles_map_onto_the_wire_vocabulary() {
        let log = vec![
            Message::player("Who found the body?", None),
            Message::narrator("Arthur did, at half past twelve."),
            system_message("Setting the scene at Vanguard Estate..."),
        ];

        let contents = conversation(&log);
        let roles: Vec<_> = contents
            .iter()
            .map(|c| c.role.as_deref().unwrap())
            .collect();
        assert_eq!(roles, ["user", "model", "model"]);
    }

    #[test]
    fn player_image_becomes_a_stripped_inline_part() {
        let uri = "data:image/png;base64,aGVsbG8=".to_string();
        let log = vec![Message::player("Look at this.", Some(uri))];

        let contents = conversation(&log);
        let parts = &contents[0].parts;
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].text.as_deref(), Some("Look at this."));

        let inline = parts[1].inline_data.as_ref().expect("inline part");
        assert_eq!(inline.mime_type, "image/png");
        assert_eq!(inline.data, "aGVsbG8=", "data-URI header must be stripped");
    }

    #[test]
    fn persona_rides_along_outside_the_log() {
        let body = narrator().request_body(&[Message::player("Hello?", None)]);

        let part = &body.system_instruction.parts[0];
        assert_eq!(part.text.as_deref(), Some(scenario::NARRATOR_PERSONA));
        assert_eq!(body.contents.len(), 1, "persona is not a log entry");
    }

    #[test]
    fn request_serializes_with_wire_field_names() {
        let uri = "data:image/jpeg;base64,Zm9v".to_string();
        let body = narrator().request_body(&[Message::player("clue", Some(uri))]);
        let json = serde_json::to_value(&body).unwrap();

        assert!(json.get("systemInstruction").is_some());
        let config = json.get("generationConfig").unwrap();
        assert!(config.get("topP").is_some());
        assert_eq!(
            config["thinkingConfig"]["thinkingBudget"],
            serde_json::json!(2000)
        );
        let inline = &json["contents"][0]["parts"][1]["inlineData"];
        assert_eq!(inline["mimeType"], "image/jpeg");
    }

    #[test]
    fn empty_output_becomes_the_silent_placeholder() {
        let no_candidates = GenerateResponse { candidates: vec![] };
        assert_eq!(reply_text(&no_candidates), scenario::SILENT_REPLY);

        let blank: GenerateResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": "  "}]}}]
        }))
        .unwrap();
        assert_eq!(reply_text(&blank), scenario::SILENT_REPLY);
    }

    #[test]
    fn text_parts_are_joined_in_order() {
        let response: GenerateResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{"content": {"role": "model", "parts": [
                {"text": "The butler "},
                {"text": "hesitates."}
            ]}}]
        }))
        .unwrap();
        assert_eq!(reply_text(&response), "The butler hesitates.");
    }

    #[test]
    fn failures_are_absorbed_into_the_placeholder() {
        assert_eq!(absorb(Err(anyhow!("boom"))), scenario::CONNECTION_LOST);
        assert_eq!(absorb(Ok("fine".into())), "fine");
    }
}
