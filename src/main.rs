use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use platter::config::Config;
use platter::embedding::{EmbeddingClient, OpenAiEmbedder};
use platter::extraction::{extract_reviews, ExtractionOptions, OpenAiExtractor, Review};
use platter::menu::{MenuCategory, MenuEngine, ProcessedReview};
use platter::output::terminal::display_menu;
use platter::storage::ReviewStore;

/// Platter: turn restaurant reviews into a rated menu.
///
/// Groups the dishes customers mention into canonical menu items and ranks
/// them by average sentiment.
#[derive(Parser)]
#[command(name = "platter", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Group extracted (item, rating) rows from a JSON file into menu items
    Group {
        /// JSON array of {"item": ..., "rating": ...} objects
        #[arg(long)]
        input: PathBuf,

        /// Print the menu as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Extract food items and sentiment from raw reviews and store them
    Extract {
        /// JSON array of {"text": ..., "rating": ...} reviews
        #[arg(long)]
        input: PathBuf,

        /// Identifier of the place the reviews belong to
        #[arg(long)]
        place_id: String,

        /// Average each reviewer's star rating into the sentiment score
        #[arg(long)]
        weighted: bool,

        /// Number of reviews to extract in parallel (default: 8)
        #[arg(long, default_value = "8")]
        concurrency: usize,
    },

    /// Build the menu for a place from its stored reviews
    Menu {
        /// Identifier used with `platter extract`
        #[arg(long)]
        place_id: String,

        /// Print the menu as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Logs go to stderr so `--json` output stays machine-readable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("platter=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Group { input, json } => {
            let config = Config::load()?;
            let rows: Vec<ProcessedReview> = read_json(&input)?;

            info!(rows = rows.len(), "Grouping rows");
            let menu = build_menu(&config, &rows).await?;
            print_menu(&menu, json)?;
        }

        Commands::Extract {
            input,
            place_id,
            weighted,
            concurrency,
        } => {
            let config = Config::load()?;
            let reviews: Vec<Review> = read_json(&input)?;
            if reviews.is_empty() {
                anyhow::bail!("{} contains no reviews", input.display());
            }

            let extractor = OpenAiExtractor::from_config(&config)?;
            println!(
                "Extracting items from {} reviews ({} concurrent)...",
                reviews.len(),
                concurrency
            );

            let options = ExtractionOptions {
                weighted,
                concurrency,
                show_progress: true,
            };
            let summary = extract_reviews(&extractor, &reviews, options).await;

            let store = ReviewStore::new(&config.data_dir);
            let path = store.save(&place_id, &summary.processed).await?;

            println!("\n{}", "Extraction complete.".bold());
            println!("  Items found: {}", summary.processed.len());
            println!("  No item mentioned: {}", summary.no_item);
            if summary.invalid > 0 {
                println!("  {} {} invalid reviews skipped", "!".yellow(), summary.invalid);
            }
            if summary.failed > 0 {
                println!("  {} {} extractions failed", "!".red(), summary.failed);
            }
            println!("  Saved to {}", path.display());
            println!("\nNext: platter menu --place-id {place_id}");
        }

        Commands::Menu { place_id, json } => {
            let config = Config::load()?;
            let store = ReviewStore::new(&config.data_dir);
            let stored = store.load(&place_id).await?.with_context(|| {
                format!("No stored reviews for {place_id}. Run `platter extract` first.")
            })?;

            info!(
                place_id = place_id.as_str(),
                processed_at = %stored.processed_at,
                "Loaded stored reviews"
            );
            let menu = build_menu(&config, &stored.reviews).await?;
            print_menu(&menu, json)?;
        }
    }

    Ok(())
}

async fn build_menu(config: &Config, rows: &[ProcessedReview]) -> Result<Vec<MenuCategory>> {
    let embedder = OpenAiEmbedder::from_config(config)?;
    let engine = MenuEngine::new(
        EmbeddingClient::new(Arc::new(embedder)),
        config.engine.clone(),
    );
    Ok(engine.build_menu(rows).await?)
}

fn print_menu(menu: &[MenuCategory], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(menu)?);
    } else {
        display_menu(menu);
    }
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}
