use anyhow::Result;
use atelier_core::gallery::{SortKey, TimeRange};
use clap::{Parser, Subcommand};

mod commands;
mod helper;

#[derive(Parser)]
#[command(name = "atelier")]
#[command(about = "Atelier - conversational UI/UX design assistant", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive design conversation
    Chat,
    /// List or search generated designs
    Gallery {
        /// Search query (title, description and synonyms)
        #[arg(short, long)]
        query: Option<String>,
        /// Sort order: newest, oldest or title
        #[arg(short, long)]
        sort: Option<SortKey>,
        /// Zero-based page of results
        #[arg(long, default_value_t = 0)]
        page: usize,
        /// Rows per page
        #[arg(long, default_value_t = 10)]
        rows: usize,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show gallery statistics
    Stats {
        /// Time range: week, month or all
        #[arg(short, long, default_value = "week")]
        range: TimeRange,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write default config.toml and a secret.json template
    Init {
        /// Overwrite an existing config.toml
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Chat => commands::chat::run().await?,
        Commands::Gallery {
            query,
            sort,
            page,
            rows,
            json,
        } => {
            commands::gallery::list(commands::gallery::ListOptions {
                query,
                sort,
                page,
                rows,
                json,
            })
            .await?
        }
        Commands::Stats { range, json } => commands::gallery::stats(range, json).await?,
        Commands::Config { action } => match action {
            ConfigAction::Init { force } => commands::config::init(force)?,
            ConfigAction::Show => commands::config::show()?,
        },
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "atelier=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
