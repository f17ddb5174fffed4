use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, ValueEnum};
use shared::openalex::MAX_PER_PAGE;
use shared::{default_topics, Config, OpenAlexClient, TopicTable, WorkQuery, DEFAULT_OUTPUT_DIR};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "topic-feeds")]
#[command(about = "Generate RSS feeds of recent OpenAlex works for a set of topics")]
struct Args {
    /// Directory the <slug>.xml feeds are written to
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Number of days to look back for publications
    #[arg(short, long, default_value = "30")]
    days: u32,

    /// Maximum number of works per feed
    #[arg(short, long, default_value = "20",
          value_parser = clap::value_parser!(u32).range(1..=MAX_PER_PAGE as i64))]
    max_results: u32,

    /// Only generate these feeds (repeatable)
    #[arg(short, long = "feed", value_name = "SLUG")]
    feeds: Vec<String>,

    /// Print the configured feeds and exit
    #[arg(long)]
    list: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[arg(long, value_enum, default_value = "text")]
    log_format: LogFormat,
}

fn init_tracing(args: &Args) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = match args.verbose {
        0 => "shared=info,topic_feeds=info",
        1 => "shared=debug,topic_feeds=debug",
        _ => "shared=trace,topic_feeds=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match args.log_format {
        LogFormat::Text => fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_tracing(&args);

    // Validate the whole table before touching the network
    let table = TopicTable::new(default_topics()).context("Invalid feed configuration")?;
    let table = table.select(&args.feeds).context("Invalid --feed selection")?;

    if args.list {
        for topic in table.iter() {
            println!("{:<20} {:<8} {}", topic.key, topic.topic_id, topic.title);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let query = WorkQuery::new(args.days, args.max_results)?;
    let config = Config::from_env();
    let client = OpenAlexClient::new(&config).context("Failed to set up OpenAlex client")?;

    println!(
        "📡 Generating {} feed(s) into {} (last {} days, up to {} works each)...",
        table.len(),
        args.output_dir.display(),
        query.days_back,
        query.max_results
    );
    let started = Utc::now();

    let report = shared::run(&client, &table, &query, &args.output_dir).await;

    for outcome in &report.outcomes {
        match &outcome.written {
            Ok(path) if outcome.fetched() => {
                println!("  ✓ {} ({} works)", path.display(), outcome.entry_count)
            }
            Ok(path) => println!("  ⚠ {} (fetch failed, empty feed)", path.display()),
            Err(e) => println!("  ✗ {}: {}", outcome.key, e),
        }
    }

    let elapsed = Utc::now() - started;
    println!(
        "\n{} {}/{} feeds written, {} fetch failure(s), in {:.1}s",
        if report.is_success() { "✅" } else { "❌" },
        report.written_count(),
        report.outcomes.len(),
        report.fetch_failures(),
        elapsed.num_milliseconds() as f64 / 1000.0
    );

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
