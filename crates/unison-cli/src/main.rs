//! `unison` — command-line client for a running Unison server.
//!
//! # Usage
//!
//! ```
//! unison identify --email doc@hillvalley.edu --phone 88
//! unison identity 3
//! unison list --precedence primary --limit 20
//! unison --url http://localhost:3000 show 1
//! ```

mod client;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use serde::{Deserialize, Serialize};
use unison_core::contact::{ContactId, LinkPrecedence};

const DEFAULT_URL: &str = "http://localhost:3000";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "unison", about = "Command-line client for the Unison identity service")]
struct Args {
  /// Path to a TOML config file (url).
  #[arg(short, long, value_name = "FILE")]
  config: Option<std::path::PathBuf>,

  /// Base URL of the unison server (default: http://localhost:3000).
  #[arg(long, env = "UNISON_URL")]
  url: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Resolve an email and/or phone number to its consolidated identity.
  Identify {
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
  },
  /// Print one stored contact row.
  Show { id: ContactId },
  /// Print the consolidated identity a contact belongs to.
  Identity { id: ContactId },
  /// List stored contacts.
  List {
    /// `primary` or `secondary`.
    #[arg(long)]
    precedence: Option<LinkPrecedence>,
    #[arg(long)]
    limit: Option<usize>,
  },
}

/// Optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url: String,
}

/// CLI flag (or `UNISON_URL`) overrides the config file, which overrides the
/// built-in default.
fn resolve_base_url(flag: Option<String>, file: &ConfigFile) -> String {
  flag
    .or_else(|| (!file.url.is_empty()).then(|| file.url.clone()))
    .unwrap_or_else(|| DEFAULT_URL.to_string())
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  let client = ApiClient::new(ApiConfig { base_url: resolve_base_url(args.url, &file_cfg) })?;

  match args.command {
    Command::Identify { email, phone } => {
      if email.is_none() && phone.is_none() {
        anyhow::bail!("at least one of --email or --phone is required");
      }
      print_json(&client.identify(email.as_deref(), phone.as_deref()).await?)
    }
    Command::Show { id } => print_json(&client.get_contact(id).await?),
    Command::Identity { id } => print_json(&client.identity_of(id).await?),
    Command::List { precedence, limit } => {
      print_json(&client.list_contacts(precedence, limit).await?)
    }
  }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
  let out = serde_json::to_string_pretty(value).context("serialising output")?;
  println!("{out}");
  Ok(())
}
