pub mod engine;
pub mod logging;
pub mod model;
pub mod ui;

// Re-export commonly used items for easier access
pub use engine::narrator::{GeminiNarrator, Narrator, NarratorSettings};
pub use engine::session::Session;
pub use model::message::{Message, Role};
pub use model::suspect::{Evidence, Suspect};
