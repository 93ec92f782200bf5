use egui::Color32;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::engine::narrator::NarratorSettings;

#[derive(Serialize, Deserialize, Clone)]
pub struct Settings {
    pub ui_scale: f32,

    // Role → bubble color mapping (extensible)
    pub role_colors: HashMap<String, [u8; 4]>,

    #[serde(default)]
    pub narrator: NarratorSettings,
}

impl Default for Settings {
    fn default() -> Self {
        let mut role_colors = HashMap::new();

        role_colors.insert("Player".into(), [120, 85, 30, 255]);
        role_colors.insert("Narrator".into(), [45, 45, 58, 255]);
        role_colors.insert("System".into(), [80, 80, 80, 255]);

        Self {
            ui_scale: 1.0,
            role_colors,
            narrator: NarratorSettings::default(),
        }
    }
}

impl Settings {
    pub fn color(&self, key: &str) -> Color32 {
        self.role_colors
            .get(key)
            .map(|c| Color32::from_rgba_unmultiplied(c[0], c[1], c[2], c[3]))
            .unwrap_or(Color32::WHITE)
    }

    pub fn set_color(&mut self, key: &str, color: Color32) {
        self.role_colors.insert(
            key.to_string(),
            [color.r(), color.g(), color.b(), color.a()],
        );
    }
}
