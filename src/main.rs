use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use faculty_scraper::config::{load_config, ScraperConfig, Seed};
use faculty_scraper::pagination::PaginationPolicy;
use faculty_scraper::pipeline::{self, PageExtraction};
use faculty_scraper::sink::{self, JsonLinesSink};
use rayon::prelude::*;
use scraper::Html;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "faculty_scraper",
    about = "Extract faculty records from university directory pages"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract one saved directory page
    Extract {
        /// HTML file to read
        file: PathBuf,
        /// URL the page was fetched from
        #[arg(short, long)]
        url: String,
        /// Append JSON lines here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// YAML config for selector overrides
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Extract every seed snapshot listed in the config
    Run {
        #[arg(short, long, default_value = "tracking/crawl.yml")]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            file,
            url,
            output,
            config,
        } => {
            let config = match config {
                Some(path) => load_config(&path)?,
                None => ScraperConfig::default(),
            };
            extract_one(&file, &url, output.as_deref(), &config)
        }
        Commands::Run { config } => {
            let config = load_config(&config)?;
            run(&config)
        }
    }
}

fn extract_one(
    file: &Path,
    url: &str,
    output: Option<&Path>,
    config: &ScraperConfig,
) -> Result<()> {
    let html = fs::read_to_string(file)
        .with_context(|| format!("Failed to read page from {:?}", file))?;
    let document = Html::parse_document(&html);
    let page = pipeline::extract_page(&document, url, Utc::now(), &config.extraction);

    let policy = PaginationPolicy::from_config(&config.pagination);
    for next in policy.collect(&document, url) {
        tracing::info!(next = %next, "pagination link");
    }

    let pushed = match output {
        Some(path) => {
            let mut sink = JsonLinesSink::append_to(path)?;
            let pushed = sink::emit_page(&mut sink, &page)?;
            sink.flush()?;
            pushed
        }
        None => {
            let mut sink = JsonLinesSink::new(io::stdout().lock());
            let pushed = sink::emit_page(&mut sink, &page)?;
            sink.flush()?;
            pushed
        }
    };

    tracing::info!(url, pushed, "done");
    Ok(())
}

/// Records and follow-up links for one seed.
struct SeedResult {
    page: PageExtraction,
    next_pages: Vec<String>,
}

fn run(config: &ScraperConfig) -> Result<()> {
    let policy = PaginationPolicy::from_config(&config.pagination);
    let seeds: Vec<&Seed> = config
        .start_urls
        .iter()
        .take(config.max_requests_per_crawl)
        .collect();

    if seeds.len() < config.start_urls.len() {
        tracing::warn!(
            limit = config.max_requests_per_crawl,
            skipped = config.start_urls.len() - seeds.len(),
            "request limit reached"
        );
    }

    let scraped_at = Utc::now();
    let results: Vec<(String, Result<SeedResult>)> = seeds
        .par_iter()
        .map(|seed| (seed.url.clone(), process_seed(seed, config, &policy, scraped_at)))
        .collect();

    let mut sink = JsonLinesSink::append_to(&config.output)?;
    let mut pages = 0;
    let mut faculty = 0;

    for (url, result) in results {
        match result {
            Ok(seed) => {
                for next in &seed.next_pages {
                    tracing::info!(from = %url, next = %next, "pagination link");
                }
                sink::emit_page(&mut sink, &seed.page)?;
                pages += 1;
                faculty += seed.page.records.len();
            }
            Err(e) => tracing::warn!(url = %url, error = %format!("{:#}", e), "seed skipped"),
        }
    }
    sink.flush()?;

    tracing::info!(pages, faculty, output = ?config.output, "crawl finished");
    Ok(())
}

fn process_seed(
    seed: &Seed,
    config: &ScraperConfig,
    policy: &PaginationPolicy,
    scraped_at: chrono::DateTime<Utc>,
) -> Result<SeedResult> {
    let snapshot = seed
        .snapshot
        .as_ref()
        .with_context(|| format!("No snapshot configured for {}", seed.url))?;
    let html = fs::read_to_string(snapshot)
        .with_context(|| format!("Failed to read snapshot {:?}", snapshot))?;

    let document = Html::parse_document(&html);
    let page = pipeline::extract_page(&document, &seed.url, scraped_at, &config.extraction);
    let next_pages = policy.collect(&document, &seed.url);

    Ok(SeedResult { page, next_pages })
}
