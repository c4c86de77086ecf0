// src/render/team.rs

use serde::Deserialize;
use url::form_urlencoded;

use super::{escape_html, photo_html};
use crate::records::TeamMember;

/// Section order for the sectioned layout.
pub const SECTION_ORDER: &[&str] = &["Principal Investigator", "Postdoctoral Researchers", "Staff"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TeamLayout {
    /// One grid, file order.
    #[default]
    Flat,
    /// Grouped by the `Section` column under headings.
    Sectioned,
}

/// Link to a member's profile page.
pub fn person_url(person_page: &str, name: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(name.as_bytes()).collect();
    format!("{}?name={}", person_page, encoded)
}

pub fn member_card(member: &TeamMember, person_page: &str) -> String {
    let name = escape_html(&member.name);
    let photo = photo_html(member.photo.as_deref(), &member.name);
    let href = escape_html(&person_url(person_page, &member.name));
    let position = escape_html(member.position.as_deref().unwrap_or(""));
    let email = member
        .email
        .as_deref()
        .map(|e| {
            let e = escape_html(e);
            format!("<p class=\"member-email\"><a href=\"mailto:{e}\">{e}</a></p>")
        })
        .unwrap_or_default();

    format!(
        "<div class=\"team-member\">\
<a href=\"{href}\" class=\"member-photo-link\"><div class=\"member-photo\">{photo}</div></a>\
<h3 class=\"member-name\">{name}</h3>\
<p class=\"member-role\">{position}</p>\
{email}</div>"
    )
}

fn grid(members: &[&TeamMember], person_page: &str) -> String {
    let cards: String = members.iter().map(|m| member_card(m, person_page)).collect();
    format!("<div class=\"team-grid members-grid\">{}</div>", cards)
}

pub fn render_team(members: &[TeamMember], layout: TeamLayout, person_page: &str) -> String {
    match layout {
        TeamLayout::Flat => grid(&members.iter().collect::<Vec<_>>(), person_page),
        TeamLayout::Sectioned => render_sectioned(members, person_page),
    }
}

/// Fixed sections first, then any others in first-appearance order.
/// Empty sections are omitted.
fn render_sectioned(members: &[TeamMember], person_page: &str) -> String {
    let mut order: Vec<&str> = SECTION_ORDER.to_vec();
    for m in members {
        let s = m.section.as_deref().unwrap_or("");
        if !s.is_empty() && !order.contains(&s) {
            order.push(s);
        }
    }

    let mut html = String::new();
    for section in order {
        let group: Vec<&TeamMember> = members
            .iter()
            .filter(|m| m.section.as_deref() == Some(section))
            .collect();
        if group.is_empty() {
            continue;
        }
        html.push_str(&format!(
            "<div class=\"team-section\"><h2 class=\"section-title\">{}</h2>{}</div>",
            escape_html(section),
            grid(&group, person_page)
        ));
    }

    // members without a section still get shown
    let loose: Vec<&TeamMember> = members.iter().filter(|m| m.section.is_none()).collect();
    if !loose.is_empty() {
        html.push_str(&grid(&loose, person_page));
    }
    html
}
