use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use loot_rarity::analyzer::{tier_distribution, ItemClassifier};
use loot_rarity::config::{Config, DEFAULT_BAG_COUNT, DEFAULT_DATA_DIR, DEFAULT_PARTS_FILE};
use loot_rarity::fetcher::{LootApiClient, LootCollector};
use loot_rarity::report::RarityReport;
use loot_rarity::storage::database::{Database, DEFAULT_DATABASE_URL};
use loot_rarity::storage::documents::{load_item_parts, load_loot, save_loot};
use loot_rarity::Result;

/// Rarity statistics for a fixed collection of loot bags.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(flatten)]
    paths: PathArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct PathArgs {
    /// Directory holding loot.json and the generated documents
    #[arg(long, global = true, env = "LOOT_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Item-part dictionary used to classify item names
    #[arg(long, global = true, env = "LOOT_PARTS_FILE", default_value = DEFAULT_PARTS_FILE)]
    parts: PathBuf,

    /// SQLite database checkpointing fetched bags
    #[arg(long, global = true, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    database_url: String,
}

impl From<PathArgs> for Config {
    fn from(args: PathArgs) -> Self {
        Config {
            data_dir: args.data_dir,
            parts_file: args.parts,
            database_url: args.database_url,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch bags 1..=COUNT from the loot API and write loot.json
    Fetch {
        #[arg(long, default_value_t = DEFAULT_BAG_COUNT)]
        count: u32,

        /// Base URL of the loot API
        #[arg(long, env = "LOOT_API_URL")]
        api_url: String,

        /// Minimum delay between requests, in milliseconds
        #[arg(long, default_value_t = 100)]
        delay_ms: u64,
    },
    /// Compute every rarity document from loot.json
    Analyze {
        /// Where to write the documents (defaults to the data directory)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print how a single item name is classified
    Classify { name: String },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "loot_rarity=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from(cli.paths);

    if let Err(e) = run(cli.command, &config).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Fetch {
            count,
            api_url,
            delay_ms,
        } => {
            let client = LootApiClient::new(api_url).with_rate_limit(Duration::from_millis(delay_ms));
            fetch(config, count, client).await
        }
        Command::Analyze { output } => {
            let output = output.unwrap_or_else(|| config.data_dir.clone());
            analyze(config, &output).await
        }
        Command::Classify { name } => {
            let parts = load_item_parts(&config.parts_file).await?;
            let item = ItemClassifier::new(&parts).classify(&name);
            println!("{}", serde_json::to_string_pretty(&item)?);
            Ok(())
        }
    }
}

async fn fetch(config: &Config, count: u32, client: LootApiClient) -> Result<()> {
    let database = Database::initialize(&config.database_url).await?;

    let loot = LootCollector::new(client, &database).collect(count).await?;

    tokio::fs::create_dir_all(&config.data_dir).await?;
    save_loot(&config.loot_file(), &loot).await?;
    info!("Wrote {} bags to {}", loot.len(), config.loot_file().display());
    Ok(())
}

async fn analyze(config: &Config, output: &Path) -> Result<()> {
    let loot = load_loot(&config.loot_file()).await?;
    let parts = load_item_parts(&config.parts_file).await?;

    let report = RarityReport::build(&loot, &parts)?;
    report.write_all(output).await?;

    for (tier, items) in tier_distribution(&report.item_rarities) {
        info!("{:>9}: {} items", tier.to_string(), items);
    }
    if let Some(rarest) = report.rare.first() {
        info!("Rarest bag: #{} (score {})", rarest.loot_id, rarest.score);
    }
    Ok(())
}
