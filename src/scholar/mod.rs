// src/scholar/mod.rs

//! Pulls a Google Scholar profile's publication table into
//! `scholar_publications.csv`.

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, instrument, warn};
use url::Url;

pub const SCHOLAR_BASE: &str = "https://scholar.google.com";
/// Scholar serves at most this many rows per page.
pub const MAX_PAGE_SIZE: usize = 100;
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr.gsc_a_tr").expect("row selector"));
static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("a.gsc_a_at").expect("title selector"));
static GRAY: Lazy<Selector> = Lazy::new(|| Selector::parse("div.gs_gray").expect("gray selector"));
static CITES: Lazy<Selector> = Lazy::new(|| Selector::parse("a.gsc_a_ac").expect("cites selector"));
static YEAR: Lazy<Selector> = Lazy::new(|| Selector::parse("span.gsc_a_h").expect("year selector"));
static WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// One row of the output CSV, columns in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScholarPublication {
    pub title: String,
    pub authors: String,
    pub venue: String,
    pub year: String,
    pub citations: String,
    pub link: String,
}

#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    /// Publications older than this are dropped.
    pub min_year: i32,
    /// Rows requested per page, clamped to `1..=MAX_PAGE_SIZE`.
    pub page_size: usize,
    pub delay: Duration,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            min_year: 2007,
            page_size: 100,
            delay: Duration::from_secs(2),
        }
    }
}

fn text_of(el: ElementRef<'_>) -> String {
    WS.replace_all(&el.text().collect::<String>(), " ")
        .trim()
        .to_string()
}

/// `user` query parameter of a profile URL.
pub fn user_id(profile_url: &str) -> Result<String> {
    let url = Url::parse(profile_url).with_context(|| format!("parsing {}", profile_url))?;
    url.query_pairs()
        .find(|(k, _)| k == "user")
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| anyhow!("no user id in {}", profile_url))
}

pub fn page_url(user: &str, start: usize, page_size: usize) -> Result<Url> {
    let mut url = Url::parse(&format!("{}/citations", SCHOLAR_BASE))?;
    url.query_pairs_mut()
        .append_pair("user", user)
        .append_pair("hl", "en")
        .append_pair("cstart", &start.to_string())
        .append_pair("pagesize", &page_size.to_string());
    Ok(url)
}

fn parse_row(row: ElementRef<'_>) -> ScholarPublication {
    let mut p = ScholarPublication::default();

    if let Some(a) = row.select(&TITLE).next() {
        p.title = text_of(a);
        if let Some(href) = a.value().attr("href").filter(|h| !h.is_empty()) {
            p.link = format!("{}{}", SCHOLAR_BASE, href);
        }
    }

    // first gray line is the author list, the second the venue
    let mut gray = row.select(&GRAY);
    if let Some(a) = gray.next() {
        p.authors = text_of(a);
    }
    if let Some(v) = gray.next() {
        p.venue = text_of(v);
    }

    p.citations = row
        .select(&CITES)
        .next()
        .map(text_of)
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| "0".to_string());
    p.year = row.select(&YEAR).next().map(text_of).unwrap_or_default();
    p
}

/// Publications on one profile page, in page order.
pub fn parse_page(html: &str) -> Vec<ScholarPublication> {
    let doc = Html::parse_document(html);
    doc.select(&ROW).map(parse_row).collect()
}

/// Drop undated and too-old entries, then sort newest first.
///
/// Non-numeric years are kept and sort after every numeric year.
pub fn filter_and_sort(pubs: Vec<ScholarPublication>, min_year: i32) -> Vec<ScholarPublication> {
    let mut kept: Vec<ScholarPublication> = pubs
        .into_iter()
        .filter(|p| {
            if p.year.is_empty() {
                return false;
            }
            match p.year.parse::<i32>() {
                Ok(y) => y >= min_year,
                Err(_) => true,
            }
        })
        .collect();
    kept.sort_by_key(|p| std::cmp::Reverse(p.year.parse::<i32>().unwrap_or(0)));
    kept
}

fn effective_page_size(requested: usize) -> usize {
    requested.clamp(1, MAX_PAGE_SIZE)
}

async fn fetch_page(client: &Client, url: &Url) -> Result<String> {
    client
        .get(url.clone())
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .send()
        .await
        .with_context(|| format!("GET {} failed", url))?
        .error_for_status()
        .with_context(|| format!("Non-success status {}", url))?
        .text()
        .await
        .with_context(|| format!("Reading text from {}", url))
}

/// Page through a profile until a short page, an empty page, or a
/// request error.
#[instrument(level = "info", skip(client, opts))]
pub async fn scrape_profile(
    client: &Client,
    profile_url: &str,
    opts: &ScrapeOptions,
) -> Result<Vec<ScholarPublication>> {
    let user = user_id(profile_url)?;
    let page_size = effective_page_size(opts.page_size);
    info!(user = %user, min_year = opts.min_year, "fetching publications");

    let mut all = Vec::new();
    let mut start = 0usize;
    loop {
        if start > 0 {
            sleep(opts.delay).await;
        }
        let url = page_url(&user, start, page_size)?;
        info!("Fetching publications {} to {}", start + 1, start + page_size);

        let html = match fetch_page(client, &url).await {
            Ok(h) => h,
            Err(e) => {
                warn!(error = %e, "page fetch failed; stopping");
                break;
            }
        };
        let page = parse_page(&html);
        if page.is_empty() {
            info!("no more publications");
            break;
        }
        let n = page.len();
        info!(found = n, "page parsed");
        all.extend(page);
        if n < page_size {
            break;
        }
        start += page_size;
    }

    let total = all.len();
    let kept = filter_and_sort(all, opts.min_year);
    info!(total, kept = kept.len(), "scrape complete");
    Ok(kept)
}

/// Write publications as CSV. Nothing is written for an empty list.
pub fn write_csv<P: AsRef<Path>>(path: P, pubs: &[ScholarPublication]) -> Result<usize> {
    let path = path.as_ref();
    if pubs.is_empty() {
        warn!("no publications to save");
        return Ok(0);
    }
    let mut w = csv::Writer::from_path(path).with_context(|| format!("creating {:?}", path))?;
    for p in pubs {
        w.serialize(p)?;
    }
    w.flush()?;
    info!("saved {} publications to {}", pubs.len(), path.display());
    Ok(pubs.len())
}
