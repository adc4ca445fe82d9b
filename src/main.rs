//! Typewell - polish selected text
//!
//! Command-line front end: polish a saved page snapshot, rewrite text
//! directly, or manage the stored API key.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use typewell::config::Config;
use typewell::notice::LogNotifier;
use typewell::rewrite::{fallback, ChatClient, Rewriter, ToneRequest};
use typewell::store::{CredentialStore, FileStore, API_KEY_NAME};
use typewell::{Outcome, Polisher, Tab, Tone};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Polish the selection in a tab snapshot (JSON) and save the result
    Polish {
        #[arg(short, long, value_enum, default_value_t = Tone::Professional)]
        tone: Tone,

        /// Tab snapshot to read
        #[arg(short, long)]
        page: PathBuf,

        /// Where to write the updated snapshot (defaults to --page)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Rewrite text and print it
    Rewrite {
        #[arg(short, long, value_enum, default_value_t = Tone::Professional)]
        tone: Tone,

        /// Use the local fallback only
        #[arg(long)]
        offline: bool,

        text: String,
    },

    /// Manage the stored API key
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },

    /// List the available tones
    Tones,
}

#[derive(Subcommand, Debug)]
enum KeyAction {
    /// Save the API key
    Set { value: String },
    /// Remove the API key
    Clear,
    /// Show whether a key is stored
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load()?;

    // Setup logging
    let level = if args.verbose {
        Level::DEBUG
    } else {
        config.log_level.parse().unwrap_or(Level::INFO)
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    debug!("Typewell v{} starting...", env!("CARGO_PKG_VERSION"));

    let store = Arc::new(FileStore::open_default());

    match args.command {
        Command::Polish { tone, page, output } => {
            let polisher = Polisher::new(rewriter(&config, store), Arc::new(LogNotifier));
            polish_snapshot(&polisher, tone, &page, output.as_deref().unwrap_or(&page)).await
        }
        Command::Rewrite {
            tone,
            offline,
            text,
        } => {
            let out = if offline {
                fallback::polish(&text, tone)
            } else {
                rewriter(&config, store)
                    .rewrite(&ToneRequest::new(text, tone), &LogNotifier)
                    .await
                    .text
            };
            println!("{}", out);
            Ok(())
        }
        Command::Key { action } => manage_key(&*store, action),
        Command::Tones => {
            for tone in Tone::ALL {
                println!("{:<14}{}", tone.id(), tone.title());
            }
            Ok(())
        }
    }
}

fn rewriter(config: &Config, store: Arc<FileStore>) -> Rewriter {
    Rewriter::new(Arc::new(ChatClient::new(config)), store)
}

async fn polish_snapshot(polisher: &Polisher, tone: Tone, input: &Path, output: &Path) -> Result<()> {
    let content = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read tab snapshot '{}'", input.display()))?;
    let mut tab: Tab = serde_json::from_str(&content)
        .with_context(|| format!("Invalid tab snapshot '{}'", input.display()))?;

    match polisher.run(&mut tab, tone).await {
        Outcome::Polished(source) => {
            std::fs::write(output, serde_json::to_string_pretty(&tab)?)
                .with_context(|| format!("Failed to write '{}'", output.display()))?;
            println!("Polished ({:?}) -> {}", source, output.display());
            Ok(())
        }
        Outcome::NoSelection => bail!("Nothing selected in {}", input.display()),
        Outcome::PageDenied => bail!("Cannot access {}", tab.url),
        Outcome::Failed(reason) => bail!("Polish failed: {}", reason),
    }
}

fn manage_key(store: &dyn CredentialStore, action: KeyAction) -> Result<()> {
    match action {
        KeyAction::Set { value } => {
            store.set(API_KEY_NAME, &value)?;
            println!("Saved ✓");
        }
        KeyAction::Clear => {
            store.remove(API_KEY_NAME)?;
            println!("Cleared ✓");
        }
        KeyAction::Show => match store.get(API_KEY_NAME)? {
            Some(key) => println!("{}", mask(&key)),
            None => println!("No key stored"),
        },
    }
    Ok(())
}

/// First four chars, the rest hidden
fn mask(key: &str) -> String {
    let shown: String = key.chars().take(4).collect();
    format!("{}{}", shown, "*".repeat(key.chars().count().saturating_sub(4)))
}
