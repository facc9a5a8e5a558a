mod commands;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "phishdb-cli")]
#[command(about = "Phishing-URL corpus command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch all feeds, merge with the stored corpus, and publish.
    Refresh,
    /// Count distinct URLs per group value, most-hit groups first.
    Aggregate {
        /// Column to group by: target, source, or domain.
        #[arg(long, default_value = "target")]
        by: String,
    },
    /// Search the corpus.
    Search {
        term: String,
        /// Column to search: url, source, notes, target, or domain.
        #[arg(long, default_value = "url")]
        column: String,
        /// Substring match instead of whole-field equality.
        #[arg(long)]
        contains: bool,
    },
    /// Classify a single URL via the configured classifier service.
    Classify { url: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = phishdb_core::load_app_config()?;

    match cli.command {
        Commands::Refresh => commands::refresh(&config).await,
        Commands::Aggregate { by } => commands::aggregate(&config, &by).await,
        Commands::Search {
            term,
            column,
            contains,
        } => commands::search(&config, &term, &column, contains).await,
        Commands::Classify { url } => commands::classify(&config, &url).await,
    }
}
