// Public modules
pub mod chat_completion;
pub mod chat_completion_params;
pub mod error_response;
pub mod message;

// Re-exports
pub use chat_completion::{ChatCompletion, Choice, ChoiceMessage, CompletionUsage};
pub use chat_completion_params::ChatCompletionParams;
pub use error_response::{ErrorObject, ErrorResponse};
pub use message::{Message, MessageRole};
