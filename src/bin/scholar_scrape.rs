use anyhow::Result;
use clap::Parser;
use labsite::scholar::{scrape_profile, write_csv, ScrapeOptions};
use reqwest::Client;
use std::{path::PathBuf, time::Duration};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Export a Google Scholar profile's publications to CSV.
#[derive(Debug, Parser)]
struct Args {
    #[arg(long, default_value = "https://scholar.google.com/citations?user=lAS1T9BopYMC&hl=en")]
    profile: String,

    #[arg(long, default_value = "scholar_publications.csv")]
    out: PathBuf,

    /// Oldest year kept.
    #[arg(long, default_value_t = 2007)]
    min_year: i32,

    #[arg(long, default_value_t = 100)]
    page_size: usize,

    /// Pause between page requests.
    #[arg(long, default_value_t = 2)]
    delay_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let args = Args::parse();
    let opts = ScrapeOptions {
        min_year: args.min_year,
        page_size: args.page_size,
        delay: Duration::from_secs(args.delay_secs),
    };
    info!(profile = %args.profile, min_year = opts.min_year, "startup");

    let client = Client::builder().cookie_store(true).gzip(true).build()?;
    let pubs = scrape_profile(&client, &args.profile, &opts).await?;

    for (i, p) in pubs.iter().take(5).enumerate() {
        info!("{}. [{}] {} ({} citations)", i + 1, p.year, p.title, p.citations);
    }
    let written = write_csv(&args.out, &pubs)?;
    info!(written, out = %args.out.display(), "all done");
    Ok(())
}
