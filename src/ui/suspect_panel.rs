use eframe::egui;

use crate::engine::protocol::EngineCommand;
use crate::model::scenario;
use crate::ui::app::ManorApp;
use crate::ui::settings_io;

const CARD_COLORS: [egui::Color32; 3] = [
    egui::Color32::from_rgb(90, 60, 40),
    egui::Color32::from_rgb(40, 70, 120),
    egui::Color32::from_rgb(40, 90, 60),
];

pub fn draw_suspect_panel(ctx: &egui::Context, app: &mut ManorApp) {
    egui::SidePanel::left("suspects")
        .resizable(true)
        .default_width(300.0)
        .min_width(240.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Suspects");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(egui::RichText::new(scenario::CASE_NUMBER).small().weak());
                });
            });
            ui.separator();

            let mut interrogate: Option<String> = None;
            let mut apply_settings = false;

            egui::ScrollArea::vertical().show(ui, |ui| {
                for (i, suspect) in app.ui.suspects.iter().enumerate() {
                    ui.group(|ui| {
                        ui.horizontal(|ui| {
                            portrait_badge(ui, CARD_COLORS[i % CARD_COLORS.len()], &suspect.name);
                            ui.vertical(|ui| {
                                ui.label(egui::RichText::new(&suspect.name).strong());
                                ui.label(
                                    egui::RichText::new(&suspect.role_label).small().weak(),
                                );
                            });
                        });
                        ui.label(egui::RichText::new(&suspect.description).small().italics());
                        if ui.small_button("Interrogate").clicked() {
                            interrogate = Some(suspect.name.clone());
                        }
                    });
                    ui.add_space(4.0);
                }

                ui.add_space(8.0);
                egui::Frame::new()
                    .fill(egui::Color32::from_rgb(42, 33, 20))
                    .corner_radius(egui::CornerRadius::same(6))
                    .inner_margin(egui::Margin::same(8))
                    .show(ui, |ui| {
                        ui.label(egui::RichText::new("CASE OBJECTIVE").small().strong());
                        ui.label(
                            egui::RichText::new(scenario::CASE_OBJECTIVE).small().italics(),
                        );
                    });

                ui.add_space(8.0);
                ui.collapsing("Settings", |ui| {
                    ui.label("UI Scale");
                    ui.add(egui::Slider::new(&mut app.settings.ui_scale, 0.75..=2.0));

                    ui.separator();
                    ui.label("API key");
                    ui.add(
                        egui::TextEdit::singleline(&mut app.settings.narrator.api_key)
                            .password(true)
                            .hint_text("GEMINI_API_KEY overrides this"),
                    );
                    ui.label("Model");
                    ui.text_edit_singleline(&mut app.settings.narrator.model);

                    ui.separator();
                    for role in ["Player", "Narrator", "System"] {
                        let mut color = app.settings.color(role);
                        ui.horizontal(|ui| {
                            if ui.color_edit_button_srgba(&mut color).changed() {
                                app.settings.set_color(role, color);
                            }
                            ui.label(role);
                        });
                    }

                    ui.separator();
                    if ui.button("Apply").clicked() {
                        apply_settings = true;
                    }
                });
            });

            if let Some(name) = interrogate {
                app.ui.input_text = format!("Interrogate {name}: ");
            }
            if apply_settings {
                settings_io::save_settings(&app.settings);
                app.send_command(EngineCommand::ConfigureNarrator(
                    app.settings.narrator.clone(),
                ));
            }
        });
}

fn portrait_badge(ui: &mut egui::Ui, color: egui::Color32, name: &str) {
    let initial = name.chars().next().unwrap_or('?');
    egui::Frame::new()
        .fill(color)
        .corner_radius(egui::CornerRadius::same(14))
        .inner_margin(egui::Margin::symmetric(10, 4))
        .show(ui, |ui| {
            ui.label(
                egui::RichText::new(initial.to_string())
                    .size(18.0)
                    .strong()
                    .color(egui::Color32::WHITE),
            );
        });
}
