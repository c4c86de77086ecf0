// src/render/alumni.rs

use super::escape_html;
use crate::records::AlumniEntry;

/// Section used for rows with no `Section` value.
pub const DEFAULT_SECTION: &str = "Other";

const COLUMNS: [&str; 5] = ["Name", "Position", "Program", "Time in Lab", "Current Position"];

/// Group by section, sections in first-appearance order.
pub fn group_by_section(alumni: &[AlumniEntry]) -> Vec<(String, Vec<&AlumniEntry>)> {
    let mut groups: Vec<(String, Vec<&AlumniEntry>)> = Vec::new();
    for a in alumni {
        let section = a.section.as_deref().unwrap_or(DEFAULT_SECTION);
        match groups.iter().position(|(s, _)| s == section) {
            Some(i) => groups[i].1.push(a),
            None => groups.push((section.to_string(), vec![a])),
        }
    }
    groups
}

fn row_html(a: &AlumniEntry) -> String {
    let cells: String = [
        &a.name,
        &a.position,
        &a.program,
        &a.time_in_lab,
        &a.current_position,
    ]
    .into_iter()
    .map(|v| format!("<td>{}</td>", escape_html(v.as_deref().unwrap_or(""))))
    .collect();
    format!("<tr>{}</tr>", cells)
}

pub fn table_html(section: &str, alumni: &[&AlumniEntry]) -> String {
    let head: String = COLUMNS.iter().map(|c| format!("<th>{}</th>", c)).collect();
    let body: String = alumni.iter().map(|a| row_html(a)).collect();
    format!(
        "<div class=\"alumni-table-section\">\
<h3>{}</h3>\
<table class=\"alumni-table\"><thead><tr>{}</tr></thead><tbody>{}</tbody></table>\
</div>",
        escape_html(section),
        head,
        body
    )
}

pub fn render_alumni(alumni: &[AlumniEntry]) -> String {
    group_by_section(alumni)
        .iter()
        .map(|(section, list)| table_html(section, list))
        .collect()
}
