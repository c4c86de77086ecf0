// src/site.rs

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::{fs, io::Write, path::Path};
use tempfile::NamedTempFile;
use tracing::{info, instrument, warn};

use crate::config::SiteConfig;
use crate::fallback;
use crate::fetch::Source;
use crate::records::{AlumniEntry, Publication, SelectedPublication, TeamMember};
use crate::render::{alumni, person, publications, selected, team};
use crate::tabular::{parse_csv, xlsx, RowRecord};

/// A region of a page filled from a data resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ContentArea {
    Team,
    Publications,
    Alumni,
    Person,
    SelectedPublications,
}

impl ContentArea {
    /// Every area that does not need a person name.
    pub const LISTINGS: [ContentArea; 4] = [
        ContentArea::Team,
        ContentArea::Publications,
        ContentArea::Alumni,
        ContentArea::SelectedPublications,
    ];

    pub fn container_id(self) -> &'static str {
        match self {
            ContentArea::Team => "team-members-container",
            ContentArea::Publications => "publications-container",
            ContentArea::Alumni => "alumni-container",
            ContentArea::Person => "person-container",
            ContentArea::SelectedPublications => "selected-publications-container",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Live,
    Fallback,
    /// A message was rendered instead of data.
    Message,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub area: ContentArea,
    pub html: String,
    pub origin: Origin,
    pub records: usize,
    /// Document title, set for the person page.
    pub title: Option<String>,
}

impl Fragment {
    pub fn container_id(&self) -> &'static str {
        self.area.container_id()
    }
}

/// Renders content areas from one data source.
pub struct Site<'a> {
    source: &'a Source,
    config: &'a SiteConfig,
}

impl<'a> Site<'a> {
    pub fn new(source: &'a Source, config: &'a SiteConfig) -> Self {
        Self { source, config }
    }

    /// One fetch + parse. `None` means the resource is unavailable.
    #[instrument(level = "debug", skip(self))]
    async fn fetch_csv(&self, path: &str) -> Option<Vec<RowRecord>> {
        match self.source.get_text(path).await {
            Ok(text) => Some(parse_csv(&text)),
            Err(e) => {
                warn!(resource = %path, error = %e, "resource unavailable");
                None
            }
        }
    }

    /// Live rows when the fetch succeeds with at least one row, else the
    /// embedded dataset.
    fn or_fallback(
        live: Option<Vec<RowRecord>>,
        fallback: fn() -> Vec<RowRecord>,
    ) -> (Vec<RowRecord>, Origin) {
        match live {
            Some(rows) if !rows.is_empty() => (rows, Origin::Live),
            _ => (fallback(), Origin::Fallback),
        }
    }

    /// XLSX first, CSV second; keys trimmed either way.
    #[instrument(level = "debug", skip(self))]
    async fn fetch_selected(&self) -> Option<Vec<RowRecord>> {
        let res = &self.config.resources;
        match self.source.get_bytes(&res.selected_xlsx).await {
            Ok(bytes) => match xlsx::read_first_sheet(&bytes) {
                Ok(rows) if !rows.is_empty() => {
                    return Some(rows.iter().map(RowRecord::normalized).collect())
                }
                Ok(_) => info!("selected publications workbook has no rows; trying CSV"),
                Err(e) => warn!(error = %e, "unreadable workbook; trying CSV"),
            },
            Err(e) => info!(error = %e, "no selected publications workbook; trying CSV"),
        }
        self.fetch_csv(&res.selected_csv)
            .await
            .map(|rows| rows.iter().map(RowRecord::normalized).collect())
    }

    /// Fetch, parse, and render one area. Never fails: unavailable data
    /// becomes fallback data or a message.
    #[instrument(level = "info", skip(self, person_name), fields(container = area.container_id()))]
    pub async fn render_area(&self, area: ContentArea, person_name: Option<&str>) -> Fragment {
        let cfg = self.config;
        let highlight = cfg.principal_surname.as_str();

        let fragment = match area {
            ContentArea::Team => {
                let live = self.fetch_csv(&cfg.resources.people).await;
                let (rows, origin) = Self::or_fallback(live, fallback::people);
                let members: Vec<TeamMember> = rows.iter().map(TeamMember::from_row).collect();
                Fragment {
                    area,
                    html: team::render_team(&members, cfg.team_layout, &cfg.person_page),
                    origin,
                    records: members.len(),
                    title: None,
                }
            }
            ContentArea::Publications => {
                let live = self.fetch_csv(&cfg.resources.publications).await;
                let (rows, origin) = Self::or_fallback(live, fallback::publications);
                let pubs: Vec<Publication> = rows.iter().map(Publication::from_row).collect();
                Fragment {
                    area,
                    html: publications::render_publications(&pubs, highlight),
                    origin,
                    records: pubs.len(),
                    title: None,
                }
            }
            ContentArea::Alumni => {
                let live = self.fetch_csv(&cfg.resources.alumni).await;
                let (rows, origin) = Self::or_fallback(live, fallback::alumni);
                let entries: Vec<AlumniEntry> = rows.iter().map(AlumniEntry::from_row).collect();
                Fragment {
                    area,
                    html: alumni::render_alumni(&entries),
                    origin,
                    records: entries.len(),
                    title: None,
                }
            }
            ContentArea::SelectedPublications => {
                let live = self.fetch_selected().await;
                let (rows, origin) = Self::or_fallback(live, fallback::selected_publications);
                let pubs: Vec<SelectedPublication> =
                    rows.iter().map(SelectedPublication::from_row).collect();
                Fragment {
                    area,
                    html: selected::render_selected(&pubs, highlight),
                    origin,
                    records: pubs.iter().filter(|p| p.title.is_some()).count(),
                    title: None,
                }
            }
            ContentArea::Person => self.render_person(person_name).await,
        };

        info!(origin = ?fragment.origin, records = fragment.records, "rendered");
        fragment
    }

    async fn render_person(&self, person_name: Option<&str>) -> Fragment {
        let name = person_name.filter(|n| !n.is_empty());
        let Some(name) = name else {
            return Fragment {
                area: ContentArea::Person,
                html: person::render_lookup(&person::PersonLookup::NoName),
                origin: Origin::Message,
                records: 0,
                title: None,
            };
        };

        let primary: Option<Vec<TeamMember>> = self
            .fetch_csv(&self.config.resources.people)
            .await
            .map(|rows| rows.iter().map(TeamMember::from_row).collect());
        let fallback: Vec<TeamMember> = fallback::people()
            .iter()
            .map(TeamMember::from_row)
            .collect();

        let lookup = person::find_person(primary.as_deref(), &fallback, Some(name));
        let (origin, records) = match &lookup {
            person::PersonLookup::Found { from_fallback: false, .. } => (Origin::Live, 1),
            person::PersonLookup::Found { from_fallback: true, .. } => (Origin::Fallback, 1),
            _ => {
                info!(person = %name, "no matching record");
                (Origin::Message, 0)
            }
        };

        Fragment {
            area: ContentArea::Person,
            html: person::render_lookup(&lookup),
            origin,
            records,
            title: Some(person::page_title(name, &self.config.lab_name)),
        }
    }

    /// Render each area in turn; one fetch per area.
    pub async fn render_all(&self, areas: &[ContentArea], person_name: Option<&str>) -> Vec<Fragment> {
        let mut out = Vec::with_capacity(areas.len());
        for &area in areas {
            out.push(self.render_area(area, person_name).await);
        }
        out
    }
}

#[derive(Debug, Serialize)]
pub struct AreaReport {
    pub area: ContentArea,
    pub container_id: &'static str,
    pub origin: Origin,
    pub records: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RenderReport {
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub areas: Vec<AreaReport>,
}

impl RenderReport {
    pub fn new(source: String, fragments: &[Fragment]) -> Self {
        Self {
            generated_at: Utc::now(),
            source,
            areas: fragments
                .iter()
                .map(|f| AreaReport {
                    area: f.area,
                    container_id: f.container_id(),
                    origin: f.origin,
                    records: f.records,
                    title: f.title.clone(),
                })
                .collect(),
        }
    }
}

pub const REPORT_FILE: &str = "render-report.json";

/// Write `contents` to `path` through a temp file in the same directory.
fn write_atomic(dir: &Path, name: &str, contents: &[u8]) -> Result<()> {
    let mut tmp = NamedTempFile::new_in(dir).with_context(|| format!("temp file in {:?}", dir))?;
    tmp.write_all(contents)
        .with_context(|| format!("writing {}", name))?;
    let dest = dir.join(name);
    tmp.persist(&dest)
        .with_context(|| format!("persisting {:?}", dest))?;
    Ok(())
}

/// Write `<container-id>.html` per fragment plus the JSON report.
pub fn write_fragments(out_dir: &Path, fragments: &[Fragment], report: &RenderReport) -> Result<()> {
    fs::create_dir_all(out_dir).with_context(|| format!("creating {:?}", out_dir))?;
    for f in fragments {
        let name = format!("{}.html", f.container_id());
        write_atomic(out_dir, &name, f.html.as_bytes())?;
        info!(file = %name, "wrote fragment");
    }
    let json = serde_json::to_vec_pretty(report).context("serializing render report")?;
    write_atomic(out_dir, REPORT_FILE, &json)?;
    Ok(())
}
