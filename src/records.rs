// src/records.rs

//! Typed views over parsed rows, one per data file schema.
//! Blank cells become `None`.

use crate::tabular::RowRecord;

/// A row of `people.csv`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamMember {
    pub name: String,
    pub position: Option<String>,
    pub photo: Option<String>,
    pub email: Option<String>,
    pub github: Option<String>,
    pub scholar: Option<String>,
    pub bio: Option<String>,
    pub section: Option<String>,
}

impl TeamMember {
    pub fn from_row(row: &RowRecord) -> Self {
        Self {
            name: row.get("Name").to_string(),
            position: row.opt("Position"),
            photo: row.opt("Photo"),
            email: row.opt("Email"),
            github: row.opt("GitHub"),
            scholar: row.opt("GoogleScholar"),
            bio: row.opt("Bio"),
            section: row.opt("Section"),
        }
    }
}

/// A row of `scholar_publications.csv`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Publication {
    pub title: String,
    pub authors: Option<String>,
    pub venue: Option<String>,
    pub year: Option<String>,
    pub paper: Option<String>,
    pub preprint: Option<String>,
    pub code: Option<String>,
}

impl Publication {
    pub fn from_row(row: &RowRecord) -> Self {
        Self {
            title: row.get("title").to_string(),
            authors: row.opt("authors"),
            venue: row.opt("venue"),
            year: row.opt("year"),
            // scraper output carries the Scholar page under `link`
            paper: row.opt("paper").or_else(|| row.opt("link")),
            preprint: row.opt("preprint"),
            code: row.opt("code"),
        }
    }
}

/// A row of `alumni.csv`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlumniEntry {
    pub section: Option<String>,
    pub name: Option<String>,
    pub position: Option<String>,
    pub program: Option<String>,
    pub time_in_lab: Option<String>,
    pub current_position: Option<String>,
}

impl AlumniEntry {
    pub fn from_row(row: &RowRecord) -> Self {
        Self {
            section: row.opt("Section"),
            name: row.opt("Name"),
            position: row.opt("Position"),
            program: row.opt("Program"),
            time_in_lab: row.opt("Time in Lab"),
            current_position: row.opt("Current Position"),
        }
    }
}

/// A row of the curated selected-publications sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedPublication {
    pub title: Option<String>,
    pub authors: Option<String>,
    pub journal: Option<String>,
    pub year: Option<String>,
    pub link: Option<String>,
    pub figure: Option<String>,
    pub description: Option<String>,
}

impl SelectedPublication {
    /// Expects a row whose keys were already trimmed.
    pub fn from_row(row: &RowRecord) -> Self {
        Self {
            title: row.opt("Title"),
            authors: row.opt("Authors"),
            journal: row.opt("Journal"),
            year: row.opt("Year"),
            link: row.opt("Link"),
            figure: row.opt("Figure"),
            description: row.opt("Description"),
        }
    }
}
