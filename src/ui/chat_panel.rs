use eframe::egui;
use egui::Layout;
use std::collections::HashMap;

use crate::model::message::{Message, Role};
use crate::ui::app::{texture_for, ManorApp};
use crate::ui::settings::Settings;

pub fn draw_chat_panel(ctx: &egui::Context, app: &mut ManorApp) {
    draw_input_bar(ctx, app);
    draw_feed(ctx, app);
}

/* =========================
   Input bar
   ========================= */

fn draw_input_bar(ctx: &egui::Context, app: &mut ManorApp) {
    let input_id = egui::Id::new("case_input");

    egui::TopBottomPanel::bottom("input_bar").show(ctx, |ui| {
        ui.add_space(4.0);

        if let Some(pending) = &app.ui.pending_image {
            let mut remove = false;
            ui.horizontal(|ui| {
                match &pending.texture {
                    Some(texture) => {
                        ui.add(egui::Image::new(texture).max_height(64.0));
                    }
                    None => {
                        ui.label(egui::RichText::new("attached clue").italics().weak());
                    }
                }
                if ui.small_button("❌").clicked() {
                    remove = true;
                }
            });
            if remove {
                app.ui.pending_image = None;
            }
        }

        let mut send_now = false;

        ui.horizontal(|ui| {
            if ui
                .add_enabled(!app.ui.thinking, egui::Button::new("📷"))
                .on_hover_text("Search for a clue (attach an image)")
                .clicked()
            {
                app.attach_image(ctx);
            }

            let response = ui.add_sized(
                [ui.available_width() - 70.0, 56.0],
                egui::TextEdit::multiline(&mut app.ui.input_text)
                    .id(input_id)
                    .hint_text("Question a suspect or theorize…")
                    .lock_focus(true),
            );

            // Enter vs Shift+Enter
            if response.has_focus()
                && ui.input(|i| i.key_pressed(egui::Key::Enter) && !i.modifiers.shift)
            {
                send_now = true;
            }

            let can_send = !app.ui.thinking
                && (!app.ui.input_text.trim().is_empty() || app.ui.pending_image.is_some());
            if ui
                .add_enabled(can_send, egui::Button::new("Send"))
                .clicked()
            {
                send_now = true;
            }
        });

        ui.add_space(4.0);

        if send_now {
            app.submit_input();

            // Keep cursor focused
            ui.memory_mut(|m| m.request_focus(input_id));
        }
    });
}

/* =========================
   Chat feed
   ========================= */

fn draw_feed(ctx: &egui::Context, app: &mut ManorApp) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let state = &app.ui;
        let settings = &app.settings;
        let textures = &mut app.textures;

        egui::ScrollArea::vertical()
            .auto_shrink(false)
            .stick_to_bottom(state.should_auto_scroll)
            .show(ui, |ui| {
                for (index, msg) in state.messages.iter().enumerate() {
                    draw_message(ui, ctx, settings, textures, index, msg);
                }

                if state.thinking {
                    ui.add_space(6.0);
                    ui.horizontal(|ui| {
                        ui.add(egui::Spinner::new());
                        ui.label(
                            egui::RichText::new("Writing the next chapter...")
                                .italics()
                                .weak(),
                        );
                    });
                }
            });
    });
}

fn draw_message(
    ui: &mut egui::Ui,
    ctx: &egui::Context,
    settings: &Settings,
    textures: &mut HashMap<usize, Option<egui::TextureHandle>>,
    index: usize,
    msg: &Message,
) {
    ui.add_space(6.0);

    match msg.role {
        Role::Player => {
            ui.with_layout(Layout::right_to_left(egui::Align::TOP), |ui| {
                message_stack(
                    ui,
                    ctx,
                    textures,
                    index,
                    msg,
                    "The Detective",
                    settings.color("Player"),
                );
            });
        }
        Role::Narrator => {
            message_stack(
                ui,
                ctx,
                textures,
                index,
                msg,
                "Dungeon Master",
                settings.color("Narrator"),
            );
        }
        Role::System => {
            message_stack(ui, ctx, textures, index, msg, "", settings.color("System"));
        }
    }
}

fn message_stack(
    ui: &mut egui::Ui,
    ctx: &egui::Context,
    textures: &mut HashMap<usize, Option<egui::TextureHandle>>,
    index: usize,
    msg: &Message,
    label: &str,
    color: egui::Color32,
) {
    ui.vertical(|ui| {
        if !label.is_empty() {
            ui.label(egui::RichText::new(label).small().weak());
        }
        bubble(ui, color, &msg.content);
        if let Some(uri) = &msg.image {
            if let Some(texture) = texture_for(textures, ctx, index, uri) {
                ui.add(egui::Image::new(texture).max_width(260.0));
            }
        }
    });
}

fn bubble(ui: &mut egui::Ui, color: egui::Color32, text: &str) {
    egui::Frame::new()
        .fill(color)
        .corner_radius(egui::CornerRadius::same(8))
        .inner_margin(egui::Margin::symmetric(10, 6))
        .show(ui, |ui| {
            ui.set_max_width(540.0);
            ui.label(egui::RichText::new(text).color(egui::Color32::WHITE));
        });
}
