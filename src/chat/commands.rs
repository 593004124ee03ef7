//! Classification of lines read at the prompt.
//!
//! A line is either blank, one of the exit words, or a message for the
//! model. There are no other commands.

/// Words that end the session, compared case-insensitively.
pub const EXIT_WORDS: [&str; 3] = ["exit", "quit", ":q"];

/// What a line of input asks the driver to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserInput {
    /// Blank or whitespace-only input; ignored.
    Empty,

    /// End the session gracefully.
    Exit,

    /// Send the trimmed text to the model.
    Message(String),
}

/// Classifies a raw line of input.
///
/// # Examples
///
/// ```
/// # use persona_chat::chat::{UserInput, classify_input};
/// assert_eq!(classify_input("  "), UserInput::Empty);
/// assert_eq!(classify_input("QUIT"), UserInput::Exit);
/// assert_eq!(classify_input(" hi "), UserInput::Message("hi".to_string()));
/// ```
pub fn classify_input(line: &str) -> UserInput {
    let line = line.trim();
    if line.is_empty() {
        UserInput::Empty
    } else if is_exit_command(line) {
        UserInput::Exit
    } else {
        UserInput::Message(line.to_string())
    }
}

/// Returns true if `input` is exactly one of [`EXIT_WORDS`], ignoring case.
pub fn is_exit_command(input: &str) -> bool {
    EXIT_WORDS.iter().any(|word| input.eq_ignore_ascii_case(word))
}
