// src/render/publications.rs

use super::{escape_html, format_authors};
use crate::records::Publication;

/// Group key used when a publication has no year.
pub const UNKNOWN_YEAR: &str = "Unknown";

/// Leading integer of `s`, the way a lenient `parseInt` reads it.
fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

/// Group publications by year, newest year first.
///
/// Groups appear in first-seen order before sorting and the sort is stable,
/// so equal years keep that order. Years with no leading number sort last.
/// Within a group the input order is kept.
pub fn group_by_year(pubs: &[Publication]) -> Vec<(String, Vec<&Publication>)> {
    let mut groups: Vec<(String, Vec<&Publication>)> = Vec::new();
    for p in pubs {
        let year = p.year.as_deref().unwrap_or(UNKNOWN_YEAR);
        match groups.iter().position(|(y, _)| y == year) {
            Some(i) => groups[i].1.push(p),
            None => groups.push((year.to_string(), vec![p])),
        }
    }
    groups.sort_by_key(|(y, _)| match leading_int(y) {
        Some(n) => (0, -n),
        None => (1, 0),
    });
    groups
}

pub fn publication_html(p: &Publication, highlight: &str) -> String {
    let links: String = [
        (p.paper.as_deref(), "Paper"),
        (p.preprint.as_deref(), "Preprint"),
        (p.code.as_deref(), "Code"),
    ]
    .into_iter()
    .filter_map(|(href, label)| {
        href.map(|h| {
            format!(
                "<a href=\"{}\" class=\"pub-link\" target=\"_blank\">{}</a>",
                escape_html(h),
                label
            )
        })
    })
    .collect();
    let links = if links.is_empty() {
        String::new()
    } else {
        format!("<div class=\"pub-links\">{}</div>", links)
    };

    format!(
        "<div class=\"pub-item\">\
<h3 class=\"pub-title\">{}</h3>\
<p class=\"pub-authors\">{}</p>\
<p class=\"pub-journal\"><em>{}</em></p>\
{}</div>",
        escape_html(&p.title),
        format_authors(p.authors.as_deref().unwrap_or(""), highlight),
        escape_html(p.venue.as_deref().unwrap_or("")),
        links
    )
}

pub fn render_publications(pubs: &[Publication], highlight: &str) -> String {
    group_by_year(pubs)
        .into_iter()
        .map(|(year, list)| {
            let items: String = list.iter().map(|p| publication_html(p, highlight)).collect();
            format!(
                "<div class=\"pub-year\"><h2>{}</h2><div class=\"pub-list\">{}</div></div>",
                escape_html(&year),
                items
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn publication(title: &str, year: Option<&str>) -> Publication {
        Publication {
            title: title.to_string(),
            year: year.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_groups_descending_and_stable() {
        let pubs = vec![
            publication("a", Some("2020")),
            publication("b", Some("1999")),
            publication("c", Some("2020")),
        ];
        let groups = group_by_year(&pubs);
        let years: Vec<&str> = groups.iter().map(|(y, _)| y.as_str()).collect();
        assert_eq!(years, vec!["2020", "1999"]);
        let titles: Vec<&str> = groups[0].1.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "c"]);
    }

    #[test]
    fn test_unparsable_years_sort_last() {
        let pubs = vec![
            publication("x", None),
            publication("y", Some("in press")),
            publication("z", Some("2005")),
            publication("w", Some("2011 (online)")),
        ];
        let groups = group_by_year(&pubs);
        let years: Vec<&str> = groups.iter().map(|(y, _)| y.as_str()).collect();
        assert_eq!(years, vec!["2011 (online)", "2005", UNKNOWN_YEAR, "in press"]);
    }

    #[test]
    fn test_leading_int() {
        assert_eq!(leading_int("2020"), Some(2020));
        assert_eq!(leading_int(" 2019a"), Some(2019));
        assert_eq!(leading_int("-3"), Some(-3));
        assert_eq!(leading_int("n/a"), None);
        assert_eq!(leading_int(""), None);
    }

    #[test]
    fn test_links_only_when_present() {
        let mut p = publication("T", Some("2020"));
        assert!(!publication_html(&p, "kinney").contains("pub-links"));

        p.preprint = Some("https://biorxiv.example/1".to_string());
        p.code = Some("https://github.example/x".to_string());
        let html = publication_html(&p, "kinney");
        assert!(!html.contains(">Paper<"));
        assert!(html.contains(">Preprint<"));
        assert!(html.find(">Preprint<").unwrap() < html.find(">Code<").unwrap());
    }

    #[test]
    fn test_entry_emphasizes_principal() {
        let p = Publication {
            title: "Deep mutational scanning".to_string(),
            authors: Some("A Smith, JB Kinney, C Lee".to_string()),
            venue: Some("Nature <Methods>".to_string()),
            year: Some("2020".to_string()),
            ..Default::default()
        };
        let html = render_publications(&[p], "kinney");
        assert!(html.contains("A Smith, <strong>JB Kinney</strong>, C Lee"));
        assert!(html.contains("<em>Nature &lt;Methods&gt;</em>"));
        assert!(html.contains("<h2>2020</h2>"));
    }
}
