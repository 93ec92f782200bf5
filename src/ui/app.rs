use eframe::egui;
use std::collections::HashMap;
use std::sync::mpsc;

use crate::engine::engine::Engine;
use crate::engine::narrator::GeminiNarrator;
use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::model::attachment;
use crate::model::message::Message;
use crate::model::scenario;
use crate::model::session_state::SessionSnapshot;
use crate::model::suspect::Suspect;
use crate::ui::settings::Settings;
use crate::ui::settings_io;
use crate::ui::{chat_panel, suspect_panel};

/* =========================
   UI State
   ========================= */

/// A clue photo picked in the input bar, staged until the next send.
pub struct PendingImage {
    pub data_uri: String,
    pub texture: Option<egui::TextureHandle>,
}

#[derive(Default)]
pub struct UiState {
    pub input_text: String,
    pub pending_image: Option<PendingImage>,

    pub messages: Vec<Message>,
    pub suspects: Vec<Suspect>,
    pub game_started: bool,
    pub thinking: bool,
    pub should_auto_scroll: bool,
}

/* =========================
   App
   ========================= */

pub struct ManorApp {
    pub ui: UiState,
    pub settings: Settings,

    cmd_tx: mpsc::Sender<EngineCommand>,
    resp_rx: mpsc::Receiver<EngineResponse>,

    /// Decoded clue photos by message index; `None` marks an undecodable one.
    pub textures: HashMap<usize, Option<egui::TextureHandle>>,
}

impl ManorApp {
    pub fn new() -> Self {
        let settings = settings_io::load_settings();

        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();

        let narrator = GeminiNarrator::new(settings.narrator.clone());
        std::thread::spawn(move || {
            let mut engine = Engine::new(cmd_rx, resp_tx, Box::new(narrator));
            engine.run();
        });

        Self {
            ui: UiState::default(),
            settings,
            cmd_tx,
            resp_rx,
            textures: HashMap::new(),
        }
    }

    pub fn send_command(&self, cmd: EngineCommand) {
        let _ = self.cmd_tx.send(cmd);
    }

    /// Ships the current input as one turn. The engine re-validates; this
    /// guard is only the advisory UI gate.
    pub fn submit_input(&mut self) {
        if self.ui.thinking {
            return;
        }
        let text = self.ui.input_text.trim().to_string();
        if text.is_empty() && self.ui.pending_image.is_none() {
            return;
        }
        let image = self.ui.pending_image.take().map(|p| p.data_uri);

        self.send_command(EngineCommand::SubmitTurn { text, image });
        self.ui.input_text.clear();
        self.ui.thinking = true;
    }

    /// Opens a file dialog and stages the chosen image as a data URI.
    pub fn attach_image(&mut self, ctx: &egui::Context) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg"])
            .pick_file()
        else {
            return;
        };

        match std::fs::read(&path) {
            Ok(bytes) => {
                let mime = attachment::mime_for_path(&path);
                let data_uri = attachment::to_data_uri(mime, &bytes);
                let texture = load_texture_from_bytes(ctx, "clue_preview", &bytes);
                self.ui.pending_image = Some(PendingImage { data_uri, texture });
            }
            Err(err) => log::warn!("could not read {}: {err}", path.display()),
        }
    }

    fn drain_engine(&mut self) {
        while let Ok(resp) = self.resp_rx.try_recv() {
            match resp {
                EngineResponse::TurnStarted(snapshot)
                | EngineResponse::TurnCompleted(snapshot) => self.apply_snapshot(snapshot),
                EngineResponse::TurnRejected(reason) => {
                    log::warn!("submission rejected: {reason}");
                    self.ui.thinking = false;
                }
            }
        }
    }

    fn apply_snapshot(&mut self, snapshot: SessionSnapshot) {
        self.ui.messages = snapshot.messages;
        self.ui.suspects = snapshot.suspects;
        self.ui.game_started = snapshot.game_started;
        self.ui.thinking = snapshot.awaiting_reply;
        self.ui.should_auto_scroll = true;
    }
}

impl eframe::App for ManorApp {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        ctx.set_pixels_per_point(self.settings.ui_scale);
        self.drain_engine();

        // The reply arrives on the engine channel, not as an input event.
        if self.ui.thinking {
            ctx.request_repaint_after(std::time::Duration::from_millis(150));
        }

        if !self.ui.game_started {
            draw_title_screen(ctx, self);
            return;
        }

        suspect_panel::draw_suspect_panel(ctx, self);
        chat_panel::draw_chat_panel(ctx, self);

        self.ui.should_auto_scroll = false;
    }
}

/* =========================
   Title screen
   ========================= */

fn draw_title_screen(ctx: &egui::Context, app: &mut ManorApp) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.add_space(ui.available_height() * 0.25);
        ui.vertical_centered(|ui| {
            ui.label(
                egui::RichText::new(scenario::CASE_TITLE)
                    .size(56.0)
                    .strong()
                    .color(egui::Color32::from_rgb(240, 210, 140)),
            );
            ui.add_space(12.0);
            ui.label(
                egui::RichText::new(scenario::CASE_TAGLINE)
                    .size(17.0)
                    .italics()
                    .weak(),
            );
            ui.add_space(28.0);

            if app.ui.thinking {
                ui.add(egui::Spinner::new());
                ui.label(
                    egui::RichText::new("Setting the scene at Vanguard Estate...")
                        .italics()
                        .weak(),
                );
            } else if ui
                .add(egui::Button::new(
                    egui::RichText::new("Enter the Manor").size(18.0),
                ))
                .clicked()
            {
                app.send_command(EngineCommand::StartGame);
                app.ui.thinking = true;
            }
        });
    });
}

/* =========================
   Textures
   ========================= */

pub fn load_texture_from_bytes(
    ctx: &egui::Context,
    name: &str,
    bytes: &[u8],
) -> Option<egui::TextureHandle> {
    let decoded = image::load_from_memory(bytes).ok()?;
    let rgba = decoded.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    let pixels = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_flat_samples().as_slice());
    Some(ctx.load_texture(name.to_owned(), pixels, egui::TextureOptions::LINEAR))
}

/// Decodes a message's clue photo once and caches the handle by log index.
pub fn texture_for<'a>(
    textures: &'a mut HashMap<usize, Option<egui::TextureHandle>>,
    ctx: &egui::Context,
    index: usize,
    uri: &str,
) -> Option<&'a egui::TextureHandle> {
    textures
        .entry(index)
        .or_insert_with(|| {
            attachment::decode_data_uri(uri)
                .ok()
                .and_then(|bytes| load_texture_from_bytes(ctx, &format!("clue_{index}"), &bytes))
        })
        .as_ref()
}
