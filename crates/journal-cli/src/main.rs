//! Community Journal CLI
//!
//! Command-line interface for recording and browsing collective decisions.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use journal_core::{Config, EntryInput, NoopLogger};

mod commands;
mod output;
mod prompt;

use commands::Journal;
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "journal")]
#[command(about = "Community journal - document collective decisions and commitments")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use this config file instead of the default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a new entry
    Add {
        #[command(flatten)]
        fields: EntryFields,
        /// Start from the saved draft; flags override its fields
        #[arg(long)]
        from_draft: bool,
    },
    /// List entries, newest first
    #[command(alias = "ls")]
    List {
        /// Only entries with this tag or decision type
        #[arg(short, long)]
        tag: Option<String>,
        /// Only entries containing this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show one entry
    Show {
        /// Entry ID (full or unique prefix)
        id: String,
    },
    /// Remove an entry
    #[command(alias = "rm")]
    Remove {
        /// Entry ID (full or unique prefix)
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// List tags and decision types with usage counts
    Tags,
    /// Export the journal as JSON
    Export {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Merge entries from an exported JSON file
    Import {
        /// File to import
        file: PathBuf,
    },
    /// Remove every entry
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Manage the unsubmitted draft
    Draft {
        #[command(subcommand)]
        command: DraftCommands,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Show storage location and journal statistics
    Status,
}

/// Entry fields shared by `add` and `draft save`
#[derive(Args, Clone, Default)]
pub struct EntryFields {
    /// What was decided
    #[arg(short = 'T', long)]
    title: Option<String>,
    /// Short account of the discussion
    #[arg(short, long)]
    summary: Option<String>,
    /// Commitments made
    #[arg(short, long)]
    commitments: Option<String>,
    /// Who took part
    #[arg(short, long)]
    participants: Option<String>,
    /// consensus, consultation, initiative, veille, or any other kind
    #[arg(short, long)]
    decision_type: Option<String>,
    /// Comma-separated tags
    #[arg(long)]
    tags: Option<String>,
}

impl EntryFields {
    /// Apply the given flags on top of `base`
    pub fn apply_to(self, mut base: EntryInput) -> EntryInput {
        if let Some(v) = self.title {
            base.title = Some(v);
        }
        if let Some(v) = self.summary {
            base.summary = Some(v);
        }
        if let Some(v) = self.commitments {
            base.commitments = Some(v);
        }
        if let Some(v) = self.participants {
            base.participants = Some(v);
        }
        if let Some(v) = self.decision_type {
            base.decision_type = Some(v);
        }
        if let Some(v) = self.tags {
            base.tags = Some(v.into());
        }
        base
    }
}

#[derive(Subcommand)]
enum DraftCommands {
    /// Save a draft, replacing the previous one
    Save {
        #[command(flatten)]
        fields: EntryFields,
    },
    /// Show the saved draft
    Show,
    /// Delete the saved draft
    Clear,
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, storage_key, max_field_length, required_fields, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Config commands must work even when the stored config is invalid
    if let Commands::Config { command } = &cli.command {
        return match command.clone() {
            Some(ConfigCommands::Show) | None => commands::config::show(config_path, &output),
            Some(ConfigCommands::Set { key, value }) => {
                commands::config::set(key, value, config_path, &output)
            }
        };
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    init_logging(&config);

    // Quiet mode keeps store diagnostics off stderr entirely
    let mut journal = if cli.quiet {
        Journal::open_with_logger(config, Arc::new(NoopLogger))?
    } else {
        Journal::open(config)?
    };

    match cli.command {
        Commands::Add { fields, from_draft } => {
            commands::entry::add(&mut journal, fields, from_draft, &output)
        }
        Commands::List { tag, search } => commands::entry::list(&journal, tag, search, &output),
        Commands::Show { id } => commands::entry::show(&journal, &id, &output),
        Commands::Remove { id, yes } => commands::entry::remove(&mut journal, &id, yes, &output),
        Commands::Tags => commands::tag::list(&journal, &output),
        Commands::Export { output: path } => commands::transfer::export(&journal, path, &output),
        Commands::Import { file } => commands::transfer::import(&mut journal, &file, &output),
        Commands::Clear { yes } => commands::transfer::clear(&mut journal, yes, &output),
        Commands::Draft { command } => match command {
            DraftCommands::Save { fields } => commands::draft::save(&mut journal, fields, &output),
            DraftCommands::Show => commands::draft::show(&journal, &output),
            DraftCommands::Clear => commands::draft::clear(&mut journal, &output),
        },
        Commands::Status => commands::status::show(&mut journal, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

/// Install the tracing subscriber
///
/// Logs go to `log_file` when configured, otherwise to stderr. `RUST_LOG`
/// overrides the default filter.
fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("journal_core=warn,journal_cli=warn"));

    if let Some(ref log_path) = config.log_file {
        match OpenOptions::new().create(true).append(true).open(log_path) {
            Ok(file) => {
                let _ = tracing_subscriber::fmt()
                    .with_env_filter(env_filter)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .try_init();
                return;
            }
            Err(e) => {
                eprintln!("Warning: Could not open log file {:?}: {}", log_path, e);
            }
        }
    }

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
