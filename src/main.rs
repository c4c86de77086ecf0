use anyhow::Result;
use clap::Parser;
use labsite::{
    config::SiteConfig,
    fetch::Source,
    render::team::TeamLayout,
    site::{write_fragments, ContentArea, RenderReport, Site},
};
use reqwest::Client;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Render the lab site's data-driven content areas into HTML fragments.
#[derive(Debug, Parser)]
#[command(name = "labsite", version)]
struct Args {
    /// YAML site config.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base URL or directory holding the data resources.
    #[arg(long)]
    source: Option<String>,

    /// Directory the fragments are written to.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Areas to render (repeatable). Defaults to every listing.
    #[arg(long = "area", value_enum)]
    areas: Vec<ContentArea>,

    /// Name of the person whose profile to render.
    #[arg(long)]
    person: Option<String>,

    #[arg(long, value_enum)]
    layout: Option<TeamLayout>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    // ─── 2) config, CLI overrides on top ─────────────────────────────
    let args = Args::parse();
    let mut cfg = SiteConfig::load(args.config.as_deref())?;
    if let Some(src) = args.source {
        cfg.source = Some(src);
    }
    if let Some(out) = args.out {
        cfg.output_dir = out;
    }
    if let Some(layout) = args.layout {
        cfg.team_layout = layout;
    }

    let mut areas = if args.areas.is_empty() {
        ContentArea::LISTINGS.to_vec()
    } else {
        args.areas
    };
    if args.person.is_some() && !areas.contains(&ContentArea::Person) {
        areas.push(ContentArea::Person);
    }

    // ─── 3) render ───────────────────────────────────────────────────
    let source = Source::parse(&cfg.resolved_source(), Client::new())?;
    info!(source = %source.describe(), areas = areas.len(), "startup");
    let site = Site::new(&source, &cfg);
    let fragments = site.render_all(&areas, args.person.as_deref()).await;

    // ─── 4) write ────────────────────────────────────────────────────
    let report = RenderReport::new(source.describe(), &fragments);
    write_fragments(&cfg.output_dir, &fragments, &report)?;
    info!(out = %cfg.output_dir.display(), "all done");
    Ok(())
}
