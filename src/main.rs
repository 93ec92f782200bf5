use eframe::egui;

use midnight_manor::logging;
use midnight_manor::ui::app::ManorApp;

fn main() -> eframe::Result<()> {
    if let Err(err) = logging::init() {
        eprintln!("file logging unavailable: {err}");
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1180.0, 760.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Midnight Manor",
        options,
        Box::new(|_cc| Ok(Box::new(ManorApp::new()))),
    )
}
