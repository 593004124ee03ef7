//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling chat behavior.

use std::path::PathBuf;
use std::time::Duration;

use arrrg_derive::CommandLine;

use crate::config::DEFAULT_MODEL;
use crate::error::Error;

/// Persona used when no system prompt is given.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are SpongeBob SquarePants. Talk cheerfully, use \
underwater/ocean humor, wholesome optimism, and occasional nautical nonsense. Keep replies \
concise, friendly, and squeaky-clean. Stay in character.";

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f64 = 0.6;

/// Default number of user/assistant pairs kept after the system message.
pub const DEFAULT_MAX_PAIRS: i64 = 6;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Label printed in front of assistant replies.
pub const DEFAULT_ASSISTANT_NAME: &str = "SpongeBob";

/// Command-line arguments for the persona-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// System prompt defining the persona.
    #[arrrg(optional, "Override the system prompt", "PROMPT")]
    pub system: Option<String>,

    /// Sampling temperature, parsed when the configuration is built.
    #[arrrg(optional, "Sampling temperature (default 0.6)", "TEMP")]
    pub temp: Option<String>,

    /// Maximum user/assistant pairs kept in history.
    #[arrrg(optional, "Max user/assistant pairs to keep (default 6)", "N")]
    pub max_pairs: Option<i64>,

    /// Transcript path written on exit.
    #[arrrg(optional, "Transcript file path to save on exit (e.g., logs/chat.txt)", "PATH")]
    pub save: Option<String>,

    /// Request timeout in seconds.
    #[arrrg(optional, "Request timeout in seconds (default 60)", "SECONDS")]
    pub timeout: Option<u64>,

    /// Append each API exchange to a JSON-lines file.
    #[arrrg(optional, "Log API requests and responses as JSON lines", "PATH")]
    pub log_requests: Option<String>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Configuration for a chat session.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// The model to use for generating responses.
    pub model: String,

    /// The persona-defining system prompt.
    pub system_prompt: String,

    /// Sampling temperature.
    pub temperature: f64,

    /// User/assistant pairs retained after the system message.
    pub max_pairs: i64,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Path the transcript is written to on graceful exit.
    pub transcript_path: Option<PathBuf>,

    /// Path of the JSON-lines request log.
    pub request_log_path: Option<PathBuf>,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// Label printed in front of assistant replies.
    pub assistant_name: String,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Model: gemma3:4b
    /// - System prompt: the SpongeBob persona
    /// - Temperature: 0.6
    /// - Max pairs: 6
    /// - Timeout: 60 seconds
    /// - Transcript: disabled
    /// - Color: enabled
    pub fn new() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_pairs: DEFAULT_MAX_PAIRS,
            timeout: DEFAULT_TIMEOUT,
            transcript_path: None,
            request_log_path: None,
            use_color: true,
            assistant_name: DEFAULT_ASSISTANT_NAME.to_string(),
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the number of retained pairs.
    pub fn with_max_pairs(mut self, max_pairs: i64) -> Self {
        self.max_pairs = max_pairs;
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the transcript path.
    pub fn with_transcript_path(mut self, path: Option<PathBuf>) -> Self {
        self.transcript_path = path;
        self
    }

    /// Sets the request log path.
    pub fn with_request_log_path(mut self, path: Option<PathBuf>) -> Self {
        self.request_log_path = path;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Sets the label printed in front of replies.
    pub fn with_assistant_name(mut self, name: impl Into<String>) -> Self {
        self.assistant_name = name.into();
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<ChatArgs> for ChatConfig {
    type Error = Error;

    fn try_from(args: ChatArgs) -> Result<Self, Error> {
        let defaults = ChatConfig::new();
        let temperature = match args.temp.as_deref() {
            Some(temp) => parse_temperature(temp)?,
            None => DEFAULT_TEMPERATURE,
        };
        Ok(ChatConfig {
            system_prompt: args
                .system
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            temperature,
            max_pairs: args.max_pairs.unwrap_or(DEFAULT_MAX_PAIRS),
            timeout: args
                .timeout
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TIMEOUT),
            transcript_path: non_empty_path(args.save),
            request_log_path: non_empty_path(args.log_requests),
            use_color: !args.no_color,
            ..defaults
        })
    }
}

fn parse_temperature(temp: &str) -> Result<f64, Error> {
    match temp.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(Error::configuration(format!(
            "invalid --temp {temp:?}: expected a number such as 0.6"
        ))),
    }
}

fn non_empty_path(path: Option<String>) -> Option<PathBuf> {
    path.filter(|p| !p.trim().is_empty()).map(PathBuf::from)
}
