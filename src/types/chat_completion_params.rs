use serde::{Deserialize, Serialize};

use crate::types::Message;

/// Request body for `POST /api/chat/completions`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionParams {
    /// The model identifier.
    pub model: String,

    /// The conversation, system message first, sent in order.
    pub messages: Vec<Message>,

    /// Sampling temperature.
    pub temperature: f64,
}

impl ChatCompletionParams {
    /// Create request parameters from a model, a conversation and a temperature.
    pub fn new(model: impl Into<String>, messages: Vec<Message>, temperature: f64) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, to_value};

    #[test]
    fn params_serialization() {
        let params = ChatCompletionParams::new(
            "gemma3:4b",
            vec![Message::system("S"), Message::user("hello")],
            0.5,
        );
        assert_eq!(
            to_value(&params).unwrap(),
            json!({
                "model": "gemma3:4b",
                "messages": [
                    {"role": "system", "content": "S"},
                    {"role": "user", "content": "hello"}
                ],
                "temperature": 0.5
            })
        );
    }
}
