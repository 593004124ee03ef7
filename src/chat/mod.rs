//! Interactive chat application.
//!
//! This module provides the REPL chat interface built on top of the
//! persona-chat client library. It supports:
//!
//! - A persona-defining system prompt that is never trimmed
//! - Bounded history sent in full on every turn
//! - Exit words (`exit`, `quit`, `:q`) matched case-insensitively
//! - An optional plain-text transcript written on graceful exit
//!
//! # Architecture
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`session`]: Conversation state and the per-turn request
//! - [`commands`]: Classification of input lines
//! - [`repl`]: The input loop and exit handling
//! - [`render`]: Terminal output

mod commands;
mod config;
mod render;
mod repl;
mod session;

pub use commands::{EXIT_WORDS, UserInput, classify_input, is_exit_command};
pub use config::{
    ChatArgs, ChatConfig, DEFAULT_ASSISTANT_NAME, DEFAULT_MAX_PAIRS, DEFAULT_SYSTEM_PROMPT,
    DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT,
};
pub use render::{PlainTextRenderer, Renderer};
pub use repl::{FAREWELL, INTERRUPT_FAREWELL, LineSource, PROMPT, ReadOutcome, ReplExit, run_repl};
pub use session::ChatSession;
