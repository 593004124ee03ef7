//! The read-eval-print loop.
//!
//! [`run_repl`] reads lines until the user exits, input ends, or an interrupt
//! arrives. Only the first two count as a graceful exit, and only a graceful
//! exit writes the transcript.

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::chat::commands::{UserInput, classify_input};
use crate::chat::render::Renderer;
use crate::chat::session::ChatSession;
use crate::client::ChatBackend;

/// Prompt shown before each line of input.
pub const PROMPT: &str = "You: ";

/// Printed on a graceful exit.
pub const FAREWELL: &str = "👋 Bye!";

/// Printed when Ctrl+C ends the session.
pub const INTERRUPT_FAREWELL: &str = "👋 Bye! (Caught Ctrl+C)";

/// Result of reading one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A line of input, untrimmed.
    Line(String),

    /// No more input is available.
    Eof,

    /// The user pressed Ctrl+C at the prompt.
    Interrupted,

    /// Reading failed for another reason.
    Failed(String),
}

/// Source of input lines for the REPL.
pub trait LineSource {
    /// Reads one line, showing `prompt` first.
    fn read_line(&mut self, prompt: &str) -> ReadOutcome;
}

impl LineSource for DefaultEditor {
    fn read_line(&mut self, prompt: &str) -> ReadOutcome {
        match self.readline(prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    let _ = self.add_history_entry(trimmed);
                }
                ReadOutcome::Line(line)
            }
            Err(ReadlineError::Eof) => ReadOutcome::Eof,
            Err(ReadlineError::Interrupted) => ReadOutcome::Interrupted,
            Err(err) => ReadOutcome::Failed(err.to_string()),
        }
    }
}

/// How the loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplExit {
    /// Exit word, end of input, or an input failure. The transcript was
    /// written if configured.
    Graceful,

    /// Ctrl+C at the prompt. Nothing was written.
    Interrupted,
}

/// Drives the session until the user leaves.
///
/// Per-turn errors are printed and the loop continues with the conversation
/// intact.
pub async fn run_repl<B, L, R>(
    session: &mut ChatSession<B>,
    input: &mut L,
    renderer: &mut R,
) -> ReplExit
where
    B: ChatBackend,
    L: LineSource + ?Sized,
    R: Renderer + ?Sized,
{
    loop {
        let line = match input.read_line(PROMPT) {
            ReadOutcome::Line(line) => line,
            ReadOutcome::Eof => {
                renderer.print_info(&format!("\n{FAREWELL}"));
                break;
            }
            ReadOutcome::Interrupted => return ReplExit::Interrupted,
            ReadOutcome::Failed(err) => {
                renderer.print_error(&format!("Input error: {err}"));
                break;
            }
        };

        match classify_input(&line) {
            UserInput::Empty => continue,
            UserInput::Exit => {
                renderer.print_info(FAREWELL);
                break;
            }
            UserInput::Message(text) => match session.send(&text).await {
                Ok(reply) => renderer.print_reply(session.assistant_name(), &reply),
                Err(err) => renderer.print_error(&err.to_string()),
            },
        }
    }

    match session.save_transcript() {
        Ok(Some(path)) => {
            renderer.print_info(&format!("📝 Transcript saved to: {}", path.display()))
        }
        Ok(None) => {}
        Err(err) => renderer.print_error(&format!("Failed to save transcript: {err}")),
    }
    ReplExit::Graceful
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::path::PathBuf;

    use super::*;
    use crate::chat::config::ChatConfig;
    use crate::chat::session::tests::ScriptedBackend;
    use crate::error::Error;
    use crate::types::Message;

    struct ScriptedLines(VecDeque<ReadOutcome>);

    impl ScriptedLines {
        fn new(lines: &[&str]) -> Self {
            Self(
                lines
                    .iter()
                    .map(|line| ReadOutcome::Line(line.to_string()))
                    .collect(),
            )
        }

        fn then(mut self, outcome: ReadOutcome) -> Self {
            self.0.push_back(outcome);
            self
        }
    }

    impl LineSource for ScriptedLines {
        fn read_line(&mut self, prompt: &str) -> ReadOutcome {
            assert_eq!(prompt, PROMPT);
            self.0.pop_front().unwrap_or(ReadOutcome::Eof)
        }
    }

    #[derive(Default)]
    struct CaptureRenderer {
        replies: Vec<(String, String)>,
        errors: Vec<String>,
        info: Vec<String>,
    }

    impl Renderer for CaptureRenderer {
        fn print_reply(&mut self, name: &str, text: &str) {
            self.replies.push((name.to_string(), text.to_string()));
        }

        fn print_error(&mut self, error: &str) {
            self.errors.push(error.to_string());
        }

        fn print_info(&mut self, info: &str) {
            self.info.push(info.to_string());
        }
    }

    fn session(replies: Vec<crate::Result<String>>) -> ChatSession<ScriptedBackend> {
        ChatSession::new(
            ScriptedBackend::new(replies),
            ChatConfig::new().with_system_prompt("S"),
        )
    }

    #[tokio::test]
    async fn blank_lines_are_ignored() {
        let mut session = session(vec![]);
        let mut input = ScriptedLines::new(&["", "   ", "exit"]);
        let mut renderer = CaptureRenderer::default();

        let exit = run_repl(&mut session, &mut input, &mut renderer).await;

        assert_eq!(exit, ReplExit::Graceful);
        assert_eq!(session.message_count(), 1);
        assert_eq!(session.turns(), 0);
    }

    #[tokio::test]
    async fn exit_words_end_the_loop_in_any_case() {
        for word in ["EXIT", "Exit", "exit", "QUIT", ":Q"] {
            let mut session = session(vec![]);
            let mut input = ScriptedLines::new(&[word, "never read"]);
            let mut renderer = CaptureRenderer::default();

            let exit = run_repl(&mut session, &mut input, &mut renderer).await;

            assert_eq!(exit, ReplExit::Graceful, "{word}");
            assert_eq!(input.0.len(), 1, "{word}");
            assert_eq!(renderer.info, vec![FAREWELL.to_string()]);
        }
    }

    #[tokio::test]
    async fn replies_are_printed_with_persona_name() {
        let mut session = session(vec![Ok("Ahoy!".to_string())]);
        let mut input = ScriptedLines::new(&["  hello  "]);
        let mut renderer = CaptureRenderer::default();

        run_repl(&mut session, &mut input, &mut renderer).await;

        assert_eq!(
            renderer.replies,
            vec![("SpongeBob".to_string(), "Ahoy!".to_string())]
        );
        assert_eq!(session.history().messages()[1], Message::user("hello"));
    }

    #[tokio::test]
    async fn errors_are_reported_and_loop_continues() {
        let mut session = session(vec![
            Err(Error::api(503, "overloaded")),
            Ok("better now".to_string()),
        ]);
        let mut input = ScriptedLines::new(&["first", "second", "quit"]);
        let mut renderer = CaptureRenderer::default();

        let exit = run_repl(&mut session, &mut input, &mut renderer).await;

        assert_eq!(exit, ReplExit::Graceful);
        assert_eq!(renderer.errors, vec!["API error 503: overloaded".to_string()]);
        assert_eq!(renderer.replies.len(), 1);
        assert_eq!(
            session.history().messages(),
            &[
                Message::system("S"),
                Message::user("first"),
                Message::user("second"),
                Message::assistant("better now"),
            ]
        );
    }

    #[tokio::test]
    async fn end_of_input_saves_transcript() {
        let dir = tempfile::tempdir().unwrap();
        let path: PathBuf = dir.path().join("chat.txt");
        let mut session = ChatSession::new(
            ScriptedBackend::new(vec![Ok("yo".to_string())]),
            ChatConfig::new()
                .with_system_prompt("S")
                .with_transcript_path(Some(path.clone())),
        );
        let mut input = ScriptedLines::new(&["hi"]);
        let mut renderer = CaptureRenderer::default();

        let exit = run_repl(&mut session, &mut input, &mut renderer).await;

        assert_eq!(exit, ReplExit::Graceful);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "SYSTEM: S\n\nUSER: hi\n\nASSISTANT: yo\n\n"
        );
        assert!(renderer.info.iter().any(|line| line.contains("Transcript saved")));
    }

    #[tokio::test]
    async fn interrupt_skips_transcript() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.txt");
        let mut session = ChatSession::new(
            ScriptedBackend::new(vec![Ok("yo".to_string())]),
            ChatConfig::new().with_transcript_path(Some(path.clone())),
        );
        let mut input = ScriptedLines::new(&["hi"]).then(ReadOutcome::Interrupted);
        let mut renderer = CaptureRenderer::default();

        let exit = run_repl(&mut session, &mut input, &mut renderer).await;

        assert_eq!(exit, ReplExit::Interrupted);
        assert!(!path.exists());
        assert_eq!(session.message_count(), 3);
    }

    #[tokio::test]
    async fn input_failure_ends_gracefully() {
        let mut session = session(vec![]);
        let mut input =
            ScriptedLines::new(&[]).then(ReadOutcome::Failed("terminal went away".to_string()));
        let mut renderer = CaptureRenderer::default();

        let exit = run_repl(&mut session, &mut input, &mut renderer).await;

        assert_eq!(exit, ReplExit::Graceful);
        assert_eq!(
            renderer.errors,
            vec!["Input error: terminal went away".to_string()]
        );
    }

    #[tokio::test]
    async fn transcript_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = ChatSession::new(
            ScriptedBackend::default(),
            ChatConfig::new().with_transcript_path(Some(dir.path().to_path_buf())),
        );
        let mut input = ScriptedLines::new(&["exit"]);
        let mut renderer = CaptureRenderer::default();

        let exit = run_repl(&mut session, &mut input, &mut renderer).await;

        assert_eq!(exit, ReplExit::Graceful);
        assert_eq!(renderer.errors.len(), 1);
        assert!(renderer.errors[0].starts_with("Failed to save transcript"));
    }
}
