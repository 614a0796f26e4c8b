// Library exports for testing
pub mod audio;
pub mod clipboard;
pub mod config;
pub mod feedback;
pub mod hotkey;
pub mod model_download;
pub mod ollama;
pub mod pipeline;
pub mod router;
pub mod session;
pub mod transcription;
pub mod wav;
