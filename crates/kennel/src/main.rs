//! Kennel daemon and offline fact tools

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use kennel::config::Config;
use kennel::error::Result;
use kennel::facts::{build_summary, extract_facts};
use kennel::server::Server;

/// Kennel - memory gateway and agent bridge for conversational advisors
#[derive(Parser)]
#[command(name = "kennel")]
#[command(about = "Memory gateway and agent bridge for conversational advisors")]
#[command(version)]
pub struct Cli {
    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server (default command)
    #[command(name = "serve")]
    Serve,

    /// Categorize facts offline and print the entity summary
    #[command(name = "categorize")]
    Categorize {
        /// Raw fact strings
        #[arg(required = true)]
        facts: Vec<String>,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    init_logging();

    let cli = Cli::parse();

    match cli.command {
        None | Some(Command::Serve) => serve(cli.config).await,
        Some(Command::Categorize { facts }) => {
            categorize(&facts);
            Ok(())
        }
    }
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,kennel=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn load_config(config_path: Option<PathBuf>) -> Result<Config> {
    let mut config = match config_path {
        Some(path) => {
            tracing::info!("Loading config from: {}", path.display());
            Config::from_file(&path)?
        }
        None => {
            let default_paths = [
                dirs::home_dir().map(|h| h.join(".kennel").join("config.toml")),
                dirs::config_dir().map(|c| c.join("kennel").join("config.toml")),
                Some(PathBuf::from("config.toml")),
            ];

            match default_paths.iter().flatten().find(|p| p.exists()) {
                Some(path) => {
                    tracing::info!("Loading config from: {}", path.display());
                    Config::from_file(path)?
                }
                None => {
                    tracing::info!("No config file found, using defaults");
                    Config::default()
                }
            }
        }
    };

    config.apply_env_overrides();
    Ok(config)
}

async fn serve(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;
    tracing::debug!("Config loaded: {:?}", config);

    Server::new(config).serve().await?;

    tracing::info!("Kennel stopped");
    Ok(())
}

fn categorize(raw: &[String]) {
    let facts = extract_facts(raw);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Fact", "Category", "Cleaned"]);
    for fact in &facts {
        table.add_row(vec![
            fact.fact.as_str(),
            fact.category.as_str(),
            fact.clean.as_str(),
        ]);
    }
    println!("{table}");

    let summary = build_summary(&facts);
    if summary.is_empty() {
        println!("\nNo categorized facts");
    } else {
        println!("\n{summary}");
    }
}
