//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which owns the conversation
//! history and performs one completion request per turn.

use std::path::Path;

use crate::chat::config::ChatConfig;
use crate::client::{ChatBackend, ChatClient};
use crate::error::Result;
use crate::history::History;
use crate::observability::{
    HISTORY_EVICTED, HISTORY_TRUNCATIONS, SESSION_FAILED_TURNS, SESSION_TURNS,
};
use crate::transcript::write_transcript;
use crate::types::Message;

/// A chat session that manages conversation state and API interactions.
///
/// Each turn appends the user message, trims history, then asks the backend
/// for a reply. A failed turn leaves the user message in history so the next
/// request carries it.
pub struct ChatSession<B: ChatBackend = ChatClient> {
    backend: B,
    config: ChatConfig,
    history: History,
    turns: u64,
    failed_turns: u64,
}

impl<B: ChatBackend> ChatSession<B> {
    /// Creates a new chat session seeded with the configured system prompt.
    pub fn new(backend: B, config: ChatConfig) -> Self {
        let history = History::new(config.system_prompt.clone());
        Self {
            backend,
            config,
            history,
            turns: 0,
            failed_turns: 0,
        }
    }

    /// Sends a user message and returns the assistant's reply.
    ///
    /// # Errors
    ///
    /// Returns the backend's error. The user message stays in history and no
    /// assistant message is appended.
    pub async fn send(&mut self, user_input: &str) -> Result<String> {
        self.turns += 1;
        SESSION_TURNS.click();

        self.history.append(Message::user(user_input));
        let evicted = self.history.truncate(self.config.max_pairs);
        if evicted > 0 {
            HISTORY_TRUNCATIONS.click();
            HISTORY_EVICTED.add(evicted as f64);
        }

        let reply = self
            .backend
            .complete(
                &self.config.model,
                self.history.messages(),
                self.config.temperature,
                self.config.timeout,
            )
            .await;

        match reply {
            Ok(reply) => {
                self.history.append(Message::assistant(reply.clone()));
                Ok(reply)
            }
            Err(err) => {
                self.failed_turns += 1;
                SESSION_FAILED_TURNS.click();
                Err(err)
            }
        }
    }

    /// The conversation so far.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// The session configuration.
    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// The model used for replies.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Label printed in front of replies.
    pub fn assistant_name(&self) -> &str {
        &self.config.assistant_name
    }

    /// Returns the number of messages in the conversation.
    pub fn message_count(&self) -> usize {
        self.history.len()
    }

    /// Number of turns submitted, successful or not.
    pub fn turns(&self) -> u64 {
        self.turns
    }

    /// Number of turns whose request failed.
    pub fn failed_turns(&self) -> u64 {
        self.failed_turns
    }

    /// The configured transcript path, if any.
    pub fn transcript_path(&self) -> Option<&Path> {
        self.config.transcript_path.as_deref()
    }

    /// Saves the transcript to the specified path.
    pub fn save_transcript_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_transcript(path, self.history.messages())
    }

    /// Saves the transcript to the configured path. Returns the path written,
    /// or `None` when no path is configured.
    pub fn save_transcript(&self) -> Result<Option<&Path>> {
        match self.transcript_path() {
            Some(path) => {
                self.save_transcript_to(path)?;
                Ok(Some(path))
            }
            None => Ok(None),
        }
    }
}
