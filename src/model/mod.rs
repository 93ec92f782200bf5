pub mod attachment;
pub mod message;
pub mod scenario;
pub mod session_state;
pub mod suspect;
