use anyhow::{Context, Result};
use clap::Parser;
use rand::Rng;
use std::path::PathBuf;
use std::time::Duration;

use recipe_suggest::scrape::{ImageScraper, RecipeTable};

const CHECKPOINT_EVERY: usize = 250;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const MIN_DELAY_SECS: f64 = 0.5;
const MAX_DELAY_SECS: f64 = 1.2;

#[derive(Parser, Debug)]
#[command(author, version, about = "Scrapes recipe pages to backfill the recipe_image column", long_about = None)]
struct Cli {
    /// Path to the recipe CSV to augment
    #[arg(short, long, default_value = "recipes.csv")]
    input: PathBuf,

    /// Where the final augmented CSV is written
    #[arg(short, long, default_value = "recipes_with_images.csv")]
    output: PathBuf,

    /// Where periodic checkpoints are written
    #[arg(short, long, default_value = "recipes_partial.csv")]
    checkpoint: PathBuf,

    /// Row offset to start from; restarting after a crash means passing the
    /// last checkpointed row here by hand
    #[arg(short, long, default_value_t = 0)]
    start_index: usize,

    /// Process at most this many rows (for debugging)
    #[arg(long)]
    head_limit: Option<usize>,
}

async fn fetch_image_url(
    client: &reqwest::Client,
    scraper: &ImageScraper,
    url: &str,
) -> Result<Option<String>> {
    let body = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Request to '{}' failed", url))?
        .text()
        .await
        .with_context(|| format!("Failed to read body from '{}'", url))?;
    Ok(scraper.extract_image_url(&body))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let table = RecipeTable::load(&cli.input)
        .with_context(|| format!("Failed to load recipe table from {:?}", cli.input))?;
    let scraper = ImageScraper::new()?;
    let client = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")?;

    let mut end = table.len();
    if let Some(limit) = cli.head_limit {
        end = end.min(cli.start_index.saturating_add(limit));
    }
    let total = end.saturating_sub(cli.start_index);
    println!(
        "Processing {} recipes from row {}...",
        total,
        cli.start_index + 1
    );

    let mut images: Vec<String> = Vec::with_capacity(total);
    for row in cli.start_index..end {
        let url = table.url(row);
        println!("[{}] Fetching: {}", row + 1, url);

        // Any failure on a row records an empty image and moves on; nothing
        // is retried.
        let image_url = match fetch_image_url(&client, &scraper, url).await {
            Ok(Some(found)) => {
                println!("   -> Found image: {}", found);
                found
            }
            Ok(None) => {
                println!("   -> No valid image found.");
                String::new()
            }
            Err(err) => {
                eprintln!("   -> Error: {}", err);
                String::new()
            }
        };
        images.push(image_url);

        let delay = rand::thread_rng().gen_range(MIN_DELAY_SECS..MAX_DELAY_SECS);
        tokio::time::sleep(Duration::from_secs_f64(delay)).await;

        if images.len() % CHECKPOINT_EVERY == 0 {
            table
                .write_checkpoint(&cli.checkpoint, cli.start_index, &images)
                .with_context(|| format!("Failed to write checkpoint to {:?}", cli.checkpoint))?;
            println!("Checkpoint saved at row {}", row + 1);
        }
    }

    table
        .write_merged(&cli.output, cli.start_index, &images)
        .with_context(|| format!("Failed to write final CSV to {:?}", cli.output))?;
    println!("Done! Final CSV saved to {:?}", cli.output);

    Ok(())
}
