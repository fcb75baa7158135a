//! `campusdesk kb` — Curate knowledge base entries.
//!
//! Curation happens out-of-band of the resolver, so these commands talk to
//! the SQLite store directly instead of going through the resolution engine.

use clap::Subcommand;

use campusdesk_config::AppConfig;
use campusdesk_core::knowledge::KnowledgeEntry;
use campusdesk_store::SqliteStore;

#[derive(Subcommand)]
pub enum KbCommands {
    /// Add a knowledge base entry
    Add {
        /// Topic fragment the entry is matched by
        intent: String,

        /// Answer returned verbatim on match
        answer: String,

        /// Store as an unverified draft (drafts never match)
        #[arg(long)]
        unverified: bool,
    },

    /// List all knowledge base entries
    List,
}

pub async fn run(command: KbCommands) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if config.store.backend != "sqlite" {
        return Err(format!(
            "kb commands need a persistent store; configured backend is '{}'",
            config.store.backend
        )
        .into());
    }

    let path = config.store.database_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let store = SqliteStore::new(&path.to_string_lossy()).await?;

    match command {
        KbCommands::Add {
            intent,
            answer,
            unverified,
        } => {
            let intent = intent.trim().to_lowercase();
            if intent.is_empty() {
                return Err("intent must not be empty".into());
            }
            if answer.trim().is_empty() {
                return Err("answer must not be empty".into());
            }

            let entry = KnowledgeEntry {
                intent,
                answer,
                verified: !unverified,
            };
            let id = store.add_entry(&entry).await?;

            let marker = if entry.verified { "✅" } else { "📝" };
            println!("{marker} Stored entry {id} ({})", entry.intent);
        }

        KbCommands::List => {
            let entries = store.list_entries().await?;
            if entries.is_empty() {
                println!("Knowledge base is empty. Add entries with: campusdesk kb add");
                return Ok(());
            }

            println!("Knowledge base ({} entries):", entries.len());
            for entry in entries {
                let marker = if entry.verified { "✅" } else { "📝" };
                println!("  {marker} {} — {}", entry.intent, entry.answer);
            }
        }
    }

    Ok(())
}
