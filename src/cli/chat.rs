// src/cli/chat.rs — Interactive REPL

use std::io::Write;
use std::sync::Arc;

use crate::infra::config::Config;
use crate::infra::errors::QuillError;
use crate::provider::{ChatBackend, ChatRequest, KNOWN_MODELS};
use crate::session::{accumulate, estimate_tokens, Message, SessionStore, StreamOutcome, Transcript};

/// Mutable session state that slash commands can modify. Created on session
/// start, discarded on `/new`; nothing outlives the REPL call.
struct ChatState {
    model: String,
    transcript: Transcript,
    /// Running word-count estimate across the session. Only ever grows, and
    /// only after a fully completed assistant turn.
    total_tokens: u32,
    turn_count: u32,
    last_record: Option<String>,
}

/// Run the interactive chat REPL.
pub async fn run_chat(
    backend: Arc<dyn ChatBackend>,
    model: &str,
    config: &Config,
    store: SessionStore,
) -> anyhow::Result<()> {
    eprintln!(
        "quill v{} | {} via {} | /help for commands\n",
        env!("CARGO_PKG_VERSION"),
        model,
        backend.name(),
    );

    let mut state = ChatState {
        model: model.to_string(),
        transcript: Transcript::new(),
        total_tokens: 0,
        turn_count: 0,
        last_record: None,
    };

    while let Some(input) = read_input() {
        let trimmed = input.trim();

        if trimmed == "quit" || trimmed == "exit" || trimmed == "/quit" {
            break;
        }

        if trimmed.starts_with('/') {
            handle_slash_command(trimmed, &mut state, &store);
            continue;
        }

        if trimmed.is_empty() {
            continue;
        }

        run_turn(&backend, config, &store, &mut state, trimmed).await;
    }

    eprintln!(
        "\nSession total: {} turn(s), ~{} tokens",
        state.turn_count, state.total_tokens,
    );
    if let Some(id) = state.last_record {
        eprintln!("Saved as {id} (replay with `quill replay {id}`)");
    }
    Ok(())
}

/// One request/response exchange. The pending user message is only committed
/// to the transcript together with the assistant reply, after the stream
/// completes; any failure or cancellation leaves the transcript untouched.
async fn run_turn(
    backend: &Arc<dyn ChatBackend>,
    config: &Config,
    store: &SessionStore,
    state: &mut ChatState,
    prompt: &str,
) {
    let mut messages = state.transcript.messages().to_vec();
    messages.push(Message::user(prompt));

    let request = ChatRequest {
        model: state.model.clone(),
        messages,
        system: Some(config.chat.system_prompt.clone()),
        max_tokens: config.chat.max_tokens,
        temperature: config.chat.temperature,
    };

    let stream = match backend.chat_stream(request).await {
        Ok(stream) => stream,
        Err(e) => {
            eprintln!("[error] {e}");
            return;
        }
    };

    print!("quill: ");
    std::io::stdout().flush().ok();

    // The display callback receives the full accumulation; print only the
    // unseen tail so the terminal shows a growing response.
    let mut printed = 0;
    let render = |acc: &str| {
        print!("{}", &acc[printed..]);
        printed = acc.len();
        std::io::stdout().flush().ok();
    };

    let result = tokio::select! {
        result = accumulate(stream, render) => result,
        _ = tokio::signal::ctrl_c() => {
            println!();
            eprintln!("[cancelled, partial response discarded]");
            return;
        }
    };

    match result {
        Ok(StreamOutcome::Complete(reply)) => {
            println!();
            state.total_tokens += estimate_tokens(prompt) + estimate_tokens(&reply);
            state.transcript.push(Message::user(prompt));
            state.transcript.push(Message::assistant(reply));
            state.turn_count += 1;

            if config.chat.autosave {
                match store.save(&state.transcript, &state.model, state.total_tokens) {
                    Ok(id) => state.last_record = id,
                    Err(e) => eprintln!("[warn] could not save session: {e}"),
                }
            }
        }
        Ok(StreamOutcome::Empty) => {
            println!();
            eprintln!("[no response from model]");
        }
        Err(QuillError::StreamInterrupted { partial, message }) => {
            println!();
            eprintln!(
                "[error] stream interrupted: {message} ({} chars of partial text discarded)",
                partial.len()
            );
        }
        Err(e) => {
            println!();
            eprintln!("[error] {e}");
        }
    }
}

fn read_input() -> Option<String> {
    use std::io::{self, BufRead, Write};

    print!("> ");
    io::stdout().flush().ok();

    let stdin = io::stdin();
    let mut line = String::new();
    match stdin.lock().read_line(&mut line) {
        Ok(0) => None, // EOF
        Ok(_) => Some(line),
        Err(_) => None,
    }
}

fn handle_slash_command(input: &str, state: &mut ChatState, store: &SessionStore) {
    let parts: Vec<&str> = input.splitn(2, ' ').collect();
    let cmd = parts[0];
    let arg = parts.get(1).map(|s| s.trim()).unwrap_or("");

    match cmd {
        "/new" => {
            state.transcript.clear();
            state.total_tokens = 0;
            state.turn_count = 0;
            state.last_record = None;
            eprintln!("  Started a new session.");
        }

        "/save" => match store.save(&state.transcript, &state.model, state.total_tokens) {
            Ok(Some(id)) => {
                state.last_record = Some(id.clone());
                eprintln!("  Saved as {id}");
            }
            Ok(None) => eprintln!("  Nothing to save yet."),
            Err(e) => eprintln!("  [error] {e}"),
        },

        "/model" => {
            if arg.is_empty() {
                eprintln!("  Current model: {}", state.model);
                eprintln!("  Known models:");
                for m in KNOWN_MODELS {
                    let marker = if *m == state.model { " *" } else { "" };
                    eprintln!("    {m}{marker}");
                }
                eprintln!("  Usage: /model <provider/model>");
            } else {
                state.model = arg.to_string();
                eprintln!("  Model switched to {}", state.model);
            }
        }

        "/tokens" => {
            eprintln!("  ~{} tokens across {} turn(s)", state.total_tokens, state.turn_count);
        }

        "/history" => {
            if state.transcript.is_empty() {
                eprintln!("  No messages in this session yet.");
            } else {
                for m in state.transcript.messages() {
                    eprintln!("  {}: {}", m.role.label(), m.content);
                }
            }
        }

        "/help" => {
            eprintln!("Slash commands:");
            eprintln!("  /new               Clear the transcript, start fresh");
            eprintln!("  /save              Save the session now");
            eprintln!("  /model [model]     Show or switch active model");
            eprintln!("  /tokens            Show the session token estimate");
            eprintln!("  /history           Show the current transcript");
            eprintln!("  /help              Show this help");
            eprintln!("  /quit, quit, exit  End session");
        }

        _ => {
            eprintln!("Unknown command: {cmd}. Type /help for commands.");
        }
    }
}
