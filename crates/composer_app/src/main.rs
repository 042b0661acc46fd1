use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use composer_logging::composer_debug;
use composer_web::{link_hopping_pipeline, FetchSettings, ReqwestFetcher};
use log::LevelFilter;

mod logging;
mod programs;

use logging::LogDestination;

#[derive(Parser)]
#[command(name = "composer")]
#[command(about = "Run pipelines of composed synchronous and asynchronous steps", long_about = None)]
#[command(version)]
struct Cli {
    /// Where log output goes
    #[arg(long, value_enum, default_value_t = LogDestination::Terminal, global = true)]
    log: LogDestination,

    /// Log at debug level instead of info
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute ((input * 10) + 5) * 100
    Arithmetic {
        #[arg(long, default_value_t = 15, allow_negative_numbers = true)]
        input: i64,

        /// Interleave logging steps between the arithmetic steps
        #[arg(long)]
        logged: bool,

        /// Print every intermediate value
        #[arg(long)]
        tracked: bool,
    },
    /// Fetch a page, follow its first absolute link, and repeat
    Links {
        url: String,

        /// How many fetch-and-extract rounds to run
        #[arg(long, default_value_t = 2)]
        hops: usize,

        /// Interleave logging steps between fetches and extractions
        #[arg(long)]
        logged: bool,

        #[command(flatten)]
        fetch: FetchArgs,
    },
}

/// Overrides for the fetcher defaults.
#[derive(Args)]
struct FetchArgs {
    #[arg(long)]
    connect_timeout_secs: Option<u64>,

    #[arg(long)]
    request_timeout_secs: Option<u64>,

    #[arg(long)]
    redirect_limit: Option<usize>,

    #[arg(long)]
    max_bytes: Option<u64>,
}

impl FetchArgs {
    fn into_settings(self) -> FetchSettings {
        let defaults = FetchSettings::default();
        FetchSettings {
            connect_timeout: self
                .connect_timeout_secs
                .map_or(defaults.connect_timeout, Duration::from_secs),
            request_timeout: self
                .request_timeout_secs
                .map_or(defaults.request_timeout, Duration::from_secs),
            redirect_limit: self.redirect_limit.unwrap_or(defaults.redirect_limit),
            max_bytes: self.max_bytes.unwrap_or(defaults.max_bytes),
            allowed_content_types: defaults.allowed_content_types,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logging::initialize(cli.log, level);

    match cli.command {
        Command::Arithmetic {
            input,
            logged,
            tracked,
        } => run_arithmetic(input, logged, tracked).await,
        Command::Links {
            url,
            hops,
            logged,
            fetch,
        } => run_links(url, hops, logged, fetch.into_settings()).await,
    }
}

async fn run_arithmetic(input: i64, logged: bool, tracked: bool) -> anyhow::Result<()> {
    let pipeline = programs::arithmetic_pipeline(logged);

    if tracked {
        let trace = pipeline
            .call_tracked(input)
            .await
            .context("arithmetic program failed")?;
        let steps: Vec<String> = trace.values().iter().map(i64::to_string).collect();
        println!("{}", steps.join(" -> "));
        return Ok(());
    }

    let outcome = pipeline.evaluate(input);
    composer_debug!(
        "arithmetic program finished {}",
        if outcome.is_concrete() {
            "synchronously"
        } else {
            "asynchronously"
        }
    );
    let result = outcome.await.context("arithmetic program failed")?;
    println!("{result}");
    Ok(())
}

async fn run_links(
    url: String,
    hops: usize,
    logged: bool,
    settings: FetchSettings,
) -> anyhow::Result<()> {
    let fetcher = Arc::new(ReqwestFetcher::new(settings));
    let pipeline = link_hopping_pipeline(fetcher, hops, logged);

    let link = pipeline
        .call(url.clone())
        .await
        .with_context(|| format!("failed to follow links from {url}"))?;
    println!("{link}");
    Ok(())
}
