// src/cli/library.rs — Saved-session browsing

use crate::session::{SessionRecord, SessionStore};

/// List saved sessions, newest first, with their metadata.
pub fn run_list(store: &SessionStore) -> anyhow::Result<()> {
    let ids = store.list()?;
    if ids.is_empty() {
        println!("No saved chats yet.");
        return Ok(());
    }

    println!("Saved chats ({}):", ids.len());
    for id in ids {
        match store.load(&id) {
            Ok(record) => println!(
                "  {id}  {} | ~{} tokens | {} message(s)",
                record.metadata.model,
                record.metadata.token_count,
                record.messages.len(),
            ),
            // A record that won't parse still gets listed; `show` reports
            // the actual problem.
            Err(e) => {
                tracing::warn!("skipping metadata for {id}: {e}");
                println!("  {id}  (unreadable)");
            }
        }
    }
    Ok(())
}

/// Load one saved session and render its transcript.
pub fn run_show(store: &SessionStore, id: &str) -> anyhow::Result<()> {
    let record = store.load(id)?;
    print_record(&record);
    Ok(())
}

fn print_record(record: &SessionRecord) {
    println!(
        "Model: {} | Date: {} | Tokens: {}\n",
        record.metadata.model, record.metadata.created_at, record.metadata.token_count,
    );
    for m in &record.messages {
        println!("{}: {}\n", m.role.label(), m.content);
    }
}
