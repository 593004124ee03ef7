// Public modules
pub mod chat;
pub mod client;
pub mod client_logger;
pub mod config;
pub mod error;
pub mod history;
pub mod observability;
pub mod transcript;
pub mod types;

// Re-exports
pub use client::{ChatBackend, ChatClient};
pub use client_logger::{ClientLogger, JsonLinesLogger};
pub use config::{ApiKey, ApiSettings};
pub use error::{Error, Result};
pub use history::History;
pub use observability::register_biometrics;
pub use transcript::{render_transcript, write_transcript};
pub use types::*;
