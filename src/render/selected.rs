// src/render/selected.rs

use super::{empty_message, escape_html, format_authors, normalize_path};
use crate::records::SelectedPublication;

pub const NONE_FOUND: &str = "No selected publications found.";

/// Card for one highlight; `None` when the row has no title.
pub fn highlight_html(p: &SelectedPublication, highlight: &str) -> Option<String> {
    let title = p.title.as_deref()?;

    let figure = match p.figure.as_deref().map(normalize_path) {
        Some(src) => format!(
            "<div class=\"pub-figure\"><img src=\"{}\" alt=\"Figure from publication\"></div>",
            escape_html(&src)
        ),
        None => "<div class=\"pub-figure pub-figure-empty\"></div>".to_string(),
    };

    let authors = p.authors.as_deref();
    let journal = p.journal.as_deref();
    let year = p.year.as_deref();
    let meta = if authors.is_some() || journal.is_some() || year.is_some() {
        let mut m = String::from("<p class=\"pub-meta\">");
        m.push_str(&format!(
            "<span class=\"pub-authors\">{}</span>",
            format_authors(authors.unwrap_or(""), highlight)
        ));
        if authors.is_some() && (journal.is_some() || year.is_some()) {
            m.push_str(" · ");
        }
        if let Some(j) = journal {
            m.push_str(&format!("<span class=\"pub-journal\">{}</span>", escape_html(j)));
        }
        if let Some(y) = year {
            m.push_str(&format!(" ({})", escape_html(y)));
        }
        m.push_str("</p>");
        m
    } else {
        String::new()
    };

    let description = p
        .description
        .as_deref()
        .map(|d| format!("<p class=\"pub-description\">{}</p>", escape_html(d)))
        .unwrap_or_default();
    let link = p
        .link
        .as_deref()
        .map(|l| {
            format!(
                "<p class=\"pub-links\"><a href=\"{}\" class=\"tool-link\" target=\"_blank\">Paper</a></p>",
                escape_html(l)
            )
        })
        .unwrap_or_default();

    Some(format!(
        "<article class=\"pub-highlight\">{}<div class=\"pub-body\"><h3 class=\"pub-title\">{}</h3>{}{}{}</div></article>",
        figure,
        escape_html(title),
        meta,
        description,
        link
    ))
}

pub fn render_selected(pubs: &[SelectedPublication], highlight: &str) -> String {
    let html: String = pubs
        .iter()
        .filter_map(|p| highlight_html(p, highlight))
        .collect();
    if html.is_empty() {
        empty_message(NONE_FOUND)
    } else {
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untitled_rows_are_dropped() {
        let pubs = vec![SelectedPublication {
            authors: Some("A".to_string()),
            ..Default::default()
        }];
        assert_eq!(
            render_selected(&pubs, "kinney"),
            "<p class=\"loading-message\">No selected publications found.</p>"
        );
    }

    #[test]
    fn test_full_card() {
        let p = SelectedPublication {
            title: Some("Sort-seq".to_string()),
            authors: Some("JB Kinney, CG Callan".to_string()),
            journal: Some("PNAS".to_string()),
            year: Some("2010".to_string()),
            link: Some("https://doi.example/1".to_string()),
            figure: Some("images/fig1.png".to_string()),
            description: Some("Massively parallel assays & models".to_string()),
        };
        let html = highlight_html(&p, "kinney").unwrap();
        assert!(html.contains("<img src=\"/images/fig1.png\""));
        assert!(html.contains("<strong>JB Kinney</strong>, CG Callan</span> · <span class=\"pub-journal\">PNAS</span> (2010)"));
        assert!(html.contains("assays &amp; models"));
        assert!(html.contains(">Paper</a>"));
    }

    #[test]
    fn test_minimal_card() {
        let p = SelectedPublication {
            title: Some("Only a title".to_string()),
            ..Default::default()
        };
        let html = highlight_html(&p, "kinney").unwrap();
        assert!(html.contains("pub-figure-empty"));
        assert!(!html.contains("pub-meta"));
        assert!(!html.contains("pub-links"));
    }
}
