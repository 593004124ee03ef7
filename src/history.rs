//! Bounded conversation history.
//!
//! A [`History`] always starts with the system message. Retention keeps that
//! message plus the most recent `2 * max_pairs` messages after it. Trimming
//! is positional: it counts messages, not user/assistant pairs.

use crate::types::Message;

/// An ordered conversation whose first element is the system message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    messages: Vec<Message>,
}

impl History {
    /// Creates a history holding only the given system prompt.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system_prompt)],
        }
    }

    /// Appends a message to the end of the conversation.
    ///
    /// Role ordering is not validated.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Drops the oldest non-system messages so at most `2 * max_pairs` remain
    /// after the system message. Returns how many messages were evicted.
    pub fn truncate(&mut self, max_pairs: i64) -> usize {
        truncate_messages(&mut self.messages, max_pairs)
    }

    /// The messages in conversation order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The system message.
    pub fn system(&self) -> &Message {
        &self.messages[0]
    }

    /// The most recently appended message.
    pub fn last(&self) -> &Message {
        &self.messages[self.messages.len() - 1]
    }

    /// Number of messages, system message included.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always false: the system message is never removed.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Applies the retention policy to a raw message sequence whose element 0 is
/// the system message. Returns how many messages were removed.
///
/// `max_pairs <= 0` keeps only the system message.
pub fn truncate_messages(messages: &mut Vec<Message>, max_pairs: i64) -> usize {
    if messages.is_empty() {
        return 0;
    }
    let keep = usize::try_from(max_pairs)
        .unwrap_or(0)
        .saturating_mul(2);
    let rest = messages.len() - 1;
    if rest <= keep {
        return 0;
    }
    let evicted = rest - keep;
    messages.drain(1..1 + evicted);
    evicted
}
