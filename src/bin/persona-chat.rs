//! Interactive persona chat against an OpenAI-compatible endpoint.
//!
//! Credentials come from `SOONERAI_API_KEY` in the environment or in
//! `~/.soonerai.env`. `SOONERAI_BASE_URL` and `SOONERAI_MODEL` override the
//! endpoint and model.
//!
//! # Usage
//!
//! ```bash
//! # Chat with the default persona
//! persona-chat
//!
//! # Override the persona and keep fewer turns
//! persona-chat --system "You are Squidward. Be grumpy." --max-pairs 3
//!
//! # Save the conversation when leaving
//! persona-chat --save logs/chat.txt
//! ```
//!
//! Type `exit`, `quit` or `:q` (or press Ctrl+D) to leave and save the
//! transcript. Ctrl+C leaves immediately without saving.

use std::sync::Arc;

use arrrg::CommandLine;
use rustyline::DefaultEditor;

use persona_chat::chat::{
    ChatArgs, ChatConfig, ChatSession, INTERRUPT_FAREWELL, PlainTextRenderer, Renderer, ReplExit,
    run_repl,
};
use persona_chat::{ApiSettings, ChatClient, JsonLinesLogger};

/// Resolves endpoint settings and the session configuration.
fn load_configuration(args: ChatArgs) -> persona_chat::Result<(ApiSettings, ChatConfig)> {
    let settings = ApiSettings::from_env()?;
    let config = ChatConfig::try_from(args)?.with_model(settings.model());
    Ok((settings, config))
}

/// Main entry point for the persona-chat application.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("persona-chat [OPTIONS]");

    let (settings, config) = match load_configuration(args) {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    let mut client = ChatClient::new(&settings)?;
    if let Some(path) = &config.request_log_path {
        client = client.with_logger(Arc::new(JsonLinesLogger::create(path)?));
    }

    let mut renderer = PlainTextRenderer::with_color(config.use_color);
    let mut session = ChatSession::new(client, config);
    let mut editor = DefaultEditor::new()?;

    // SIGINT outside the prompt (e.g. while waiting on a reply) ends the
    // process without saving.
    ctrlc::set_handler(|| {
        println!("\n{INTERRUPT_FAREWELL}");
        std::process::exit(0);
    })?;

    renderer.print_info(&format!(
        "🌊 Ahoy! I'm {} ({} on {}). Type 'exit' to quit.\n",
        session.assistant_name(),
        session.model(),
        settings.host(),
    ));

    if run_repl(&mut session, &mut editor, &mut renderer).await == ReplExit::Interrupted {
        println!("\n{INTERRUPT_FAREWELL}");
    }

    Ok(())
}
