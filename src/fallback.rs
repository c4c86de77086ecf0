// src/fallback.rs

//! Datasets compiled into the binary, used when a live resource cannot be
//! fetched or has no rows.

use crate::tabular::{parse_csv, RowRecord};

pub const PEOPLE_CSV: &str = include_str!("../data/fallback/people.csv");
pub const PUBLICATIONS_CSV: &str = include_str!("../data/fallback/scholar_publications.csv");
pub const ALUMNI_CSV: &str = include_str!("../data/fallback/alumni.csv");
pub const SELECTED_CSV: &str = include_str!("../data/fallback/selected_publications.csv");

pub fn people() -> Vec<RowRecord> {
    parse_csv(PEOPLE_CSV)
}

pub fn publications() -> Vec<RowRecord> {
    parse_csv(PUBLICATIONS_CSV)
}

pub fn alumni() -> Vec<RowRecord> {
    parse_csv(ALUMNI_CSV)
}

pub fn selected_publications() -> Vec<RowRecord> {
    parse_csv(SELECTED_CSV)
        .iter()
        .map(RowRecord::normalized)
        .collect()
}
