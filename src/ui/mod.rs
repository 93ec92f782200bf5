pub mod app;
pub mod chat_panel;
pub mod settings;
pub mod settings_io;
pub mod suspect_panel;
