use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use vtag::{AnthropicClientBuilder, TagSuggesterBuilder, TaggingService, Vault};

/// vtag - suggest and apply frontmatter tags for a markdown vault note
#[derive(Parser)]
#[command(name = "vtag")]
#[command(about = "Suggests tags for an Obsidian-style markdown note using the Anthropic API")]
#[command(version)]
struct Cli {
    /// Path of the note to tag, relative to the vault root
    #[arg(value_name = "NOTE")]
    note: Option<PathBuf>,

    /// Vault root directory (defaults to $VAULT_DIR, then ~/main)
    #[arg(long, value_name = "DIR")]
    vault: Option<PathBuf>,

    /// Skip the confirmation prompt before calling the API
    #[arg(short, long)]
    yes: bool,
}

fn main() {
    // Best-effort: a missing .env file is not an error.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Missing argument or credential prints usage and exits cleanly, with
    // no error escalation.
    let Some(note) = cli.note.clone() else {
        println!("please provide a note path relative to the vault root");
        return;
    };

    if std::env::var("ANTHROPIC_API_KEY").is_err() {
        println!("please set ANTHROPIC_API_KEY");
        return;
    }

    if let Err(e) = run(&cli, &note) {
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code);
    }
}

/// Determines if an error is a user error (vs internal error).
///
/// User errors are filesystem problems with the note or vault the user
/// named. Internal errors are service failures and everything else.
fn is_user_error(error: &anyhow::Error) -> bool {
    error
        .chain()
        .any(|cause| cause.downcast_ref::<io::Error>().is_some())
}

/// Runs one tagging invocation end to end.
fn run(cli: &Cli, note: &Path) -> Result<()> {
    let vault_root = resolve_vault_root(cli.vault.clone())?;

    println!("Adding tags to {}", note.display());
    if !cli.yes {
        pause_for_confirmation()?;
    }

    let client = AnthropicClientBuilder::new()
        .build()
        .context("Failed to create Anthropic client")?;
    let suggester = TagSuggesterBuilder::new().client(Arc::new(client)).build();
    let service = TaggingService::new(Vault::new(vault_root), suggester);

    let report = service.run(note)?;

    println!("Successfully updated tags for {}", report.path.display());
    println!("Added tags: [{}]", report.added_tags.join(", "));

    Ok(())
}

/// Resolves the vault root: `--vault` flag, then `VAULT_DIR`, then `~/main`.
fn resolve_vault_root(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir);
    }

    if let Ok(dir) = std::env::var("VAULT_DIR") {
        return Ok(PathBuf::from(dir));
    }

    let home =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Failed to determine home directory"))?;
    Ok(home.join("main"))
}

/// Blocks until the user presses Enter.
fn pause_for_confirmation() -> Result<()> {
    print!("Press Enter to continue...");
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read confirmation")?;
    Ok(())
}
