// src/cli/mod.rs — CLI definition (clap derive)

pub mod chat;
pub mod library;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "quill", about = "Streaming writing-assistant chat", version)]
pub struct Cli {
    /// Model to use (provider/model format)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Config file path
    #[arg(long)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive chat session (default when no subcommand given)
    Chat,
    /// Browse saved chat sessions
    Library {
        #[command(subcommand)]
        action: Option<LibraryAction>,
    },
    /// Replay a saved chat session
    Replay {
        /// Record id, as shown by `quill library`
        id: String,
    },
}

#[derive(Subcommand, Clone)]
pub enum LibraryAction {
    /// List saved sessions, newest first
    List,
    /// Show one saved session
    Show { id: String },
}
