use serde::{Deserialize, Serialize};

/// Error payload returned alongside a non-success status.
///
/// OpenAI-compatible servers answer with `{"error": {"message": ...}}`; any
/// other shape is treated as unstructured text by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// The error object, when present.
    #[serde(default)]
    pub error: Option<ErrorObject>,
}

impl ErrorResponse {
    /// Returns the human-readable message, if the payload carried one.
    pub fn message(&self) -> Option<&str> {
        self.error
            .as_ref()
            .and_then(|error| error.message.as_deref())
            .filter(|message| !message.is_empty())
    }
}

/// Details of an API error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorObject {
    /// Human-readable error message.
    #[serde(default)]
    pub message: Option<String>,

    /// Error category string.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}
