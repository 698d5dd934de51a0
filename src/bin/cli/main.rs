mod app;
mod commands;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use phrasebook_lib::vocabulary::VocabularyId;

#[derive(Parser)]
#[command(name = "phrasebook-cli", about = "Phrasebook vocabulary review CLI", version)]
struct Cli {
    /// Config file (default: platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL, overrides config and environment
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// List all vocabulary
    List,

    /// Show review buckets (new, review, rest, today, learned)
    Buckets {
        /// Classify an exported JSON list instead of fetching
        #[arg(long)]
        file: Option<PathBuf>,
        /// Print the items of each bucket, not just counts
        #[arg(long)]
        items: bool,
    },

    /// Mark a vocabulary item as reviewed
    Review {
        id: VocabularyId,
    },

    /// Push items back by a number of days
    Delay {
        #[arg(required = true)]
        ids: Vec<VocabularyId>,
        #[arg(long, default_value = "1")]
        days: i64,
    },

    /// Reset items to their initial schedule
    Reset {
        #[arg(required = true)]
        ids: Vec<VocabularyId>,
    },

    /// Restart items from the first stage
    Restart {
        #[arg(required = true)]
        ids: Vec<VocabularyId>,
    },

    /// Delete items
    Delete {
        #[arg(required = true)]
        ids: Vec<VocabularyId>,
    },

    /// Log in and store the access token in the config file
    Login {
        #[arg(long)]
        email: String,
        /// Password (read from stdin when omitted)
        #[arg(long)]
        password: Option<String>,
    },
}

/// Read a single line from stdin
fn read_stdin_line() -> Option<String> {
    let mut buf = String::new();
    std::io::stdin().read_line(&mut buf).ok()?;
    let line = buf.trim_end_matches(['\r', '\n']).to_string();
    if line.is_empty() { None } else { Some(line) }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && atty_check();
    let config_path = cli.config.as_deref();
    let api_url = cli.api_url.clone();

    match cli.command {
        Command::List => {
            let mut app = app::App::new(config_path, api_url)?;
            commands::list::run(&mut app, &cli.format, use_color).await?;
        }
        Command::Buckets { file, items } => {
            let mut app = app::App::new(config_path, api_url)?;
            commands::buckets::run(&mut app, file.as_deref(), items, &cli.format, use_color).await?;
        }
        Command::Review { id } => {
            let mut app = app::App::new(config_path, api_url)?;
            commands::schedule::run_review(&mut app, id, &cli.format).await?;
        }
        Command::Delay { ids, days } => {
            let mut app = app::App::new(config_path, api_url)?;
            commands::schedule::run_delay(&mut app, &ids, days, &cli.format).await?;
        }
        Command::Reset { ids } => {
            let mut app = app::App::new(config_path, api_url)?;
            commands::schedule::run_reset(&mut app, &ids, &cli.format).await?;
        }
        Command::Restart { ids } => {
            let mut app = app::App::new(config_path, api_url)?;
            commands::schedule::run_restart(&mut app, &ids, &cli.format).await?;
        }
        Command::Delete { ids } => {
            let mut app = app::App::new(config_path, api_url)?;
            commands::schedule::run_delete(&mut app, &ids, &cli.format).await?;
        }
        Command::Login { email, password } => {
            let mut app = app::App::new(config_path, api_url)?;
            let password = match password.or_else(read_stdin_line) {
                Some(p) => p,
                None => anyhow::bail!("No password given (use --password or pipe it on stdin)"),
            };
            commands::login::run(&mut app, &email, &password, &cli.format).await?;
        }
    }

    Ok(())
}

/// Check if stdout is a terminal (for color support)
fn atty_check() -> bool {
    unsafe { libc_isatty(1) != 0 }
}

extern "C" {
    #[link_name = "isatty"]
    fn libc_isatty(fd: i32) -> i32;
}
