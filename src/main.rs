//! @ai:module:intent CLI for the article summarizer
//! @ai:module:layer presentation

use anyhow::{Context, Result};
use article_summarizer::{
    config::SummarizerConfig,
    report::{render_run_summary, render_table, RunStats},
    runner::{to_rows, BatchExecutor, CompletionClient, MockCompletionClient, OpenAiClient},
    table::TableStore,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

const DEFAULT_CONFIG_FILE: &str = "summarizer.toml";

const DRY_RUN_SUMMARY: &str = "- [DRY RUN] No actual API call made\n\
                               - The article was not sent anywhere\n\
                               - Run without --dry-run to summarize";

#[derive(Parser)]
#[command(name = "article-summarizer")]
#[command(about = "Summarize articles.csv into summaries.csv with an LLM")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Input table (overrides paths.input)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output table (overrides paths.output)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Run without making API calls
    #[arg(long)]
    dry_run: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize default configuration
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        output: PathBuf,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("article_summarizer=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    if let Some(Commands::Init { output }) = cli.command {
        return init_config(output);
    }

    let mut config = load_or_default_config(cli.config)?;

    if let Some(input) = cli.input {
        config.paths.input = input;
    }
    if let Some(output) = cli.output {
        config.paths.output = output;
    }
    config.run.dry_run |= cli.dry_run;

    if config.run.dry_run {
        tracing::info!("Running in dry-run mode");
        let client = Arc::new(MockCompletionClient::new(DRY_RUN_SUMMARY));
        run_summarization(client, &config).await
    } else {
        // Built before any table is touched so a missing key stops the run cold.
        let client = OpenAiClient::new(config.api.clone()).with_context(|| {
            format!(
                "Error initializing OpenAI client. Ensure {} is set as an environment variable",
                config.api.api_key_env
            )
        })?;
        tracing::info!("Using model {}", config.api.model);
        run_summarization(Arc::new(client), &config).await
    }
}

/// @ai:intent Load articles, summarize each, write and print the summary table
/// @ai:effects network, fs:read, fs:write
async fn run_summarization<C: CompletionClient>(
    client: Arc<C>,
    config: &SummarizerConfig,
) -> Result<()> {
    let started_at = chrono::Utc::now();
    let store = TableStore::new(config.paths.input.clone(), config.paths.output.clone());

    let articles = store
        .load_or_create_articles()
        .context("Failed to load input table")?;
    tracing::info!("Loaded {} articles", articles.len());

    let executor = BatchExecutor::new(client, config);
    let results = executor.execute_all(&articles).await;
    let rows = to_rows(&results);

    store
        .write_summaries(&rows)
        .context("Failed to write output table")?;

    let stats = RunStats::from_results(&results);
    if stats.failed > 0 {
        tracing::warn!("{} of {} articles could not be summarized", stats.failed, stats.total);
    }

    println!();
    println!("--- Summarization Complete! ---");
    println!("Generated summaries saved to '{}'.", store.output_path().display());
    println!();
    println!("Contents of {}:", store.output_path().display());
    let written = store
        .read_summaries()
        .context("Failed to read back output table")?;
    print!("{}", render_table(&written));
    println!();
    print!("{}", render_run_summary(&stats, started_at));

    Ok(())
}

/// @ai:intent Write the default configuration file
/// @ai:effects fs:write
fn init_config(output: PathBuf) -> Result<()> {
    let config = SummarizerConfig::default();
    config.save(&output)?;
    println!("Configuration saved to {}", output.display());
    Ok(())
}

/// @ai:intent Load configuration or use defaults
/// @ai:effects fs:read
fn load_or_default_config(path: Option<PathBuf>) -> Result<SummarizerConfig> {
    match path {
        Some(p) => Ok(SummarizerConfig::load(&p)?),
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);

            if default_path.exists() {
                Ok(SummarizerConfig::load(&default_path)?)
            } else {
                Ok(SummarizerConfig::default())
            }
        }
    }
}
