// src/render/person.rs

use super::{error_message, escape_html, icons, photo_html};
use crate::records::TeamMember;

/// Outcome of resolving the requested profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonLookup<'a> {
    /// No name was requested.
    NoName,
    Found {
        member: &'a TeamMember,
        from_fallback: bool,
    },
    /// Live data loaded but neither it nor the fallback has the name.
    NotFound,
    /// Live data was unavailable and the fallback has no such name.
    Unavailable,
}

/// Exact `Name` match in `primary` (`None` when it could not be loaded),
/// then in `fallback`.
pub fn find_person<'a>(
    primary: Option<&'a [TeamMember]>,
    fallback: &'a [TeamMember],
    name: Option<&str>,
) -> PersonLookup<'a> {
    let Some(name) = name.filter(|n| !n.is_empty()) else {
        return PersonLookup::NoName;
    };
    if let Some(member) = primary.and_then(|p| p.iter().find(|m| m.name == name)) {
        return PersonLookup::Found {
            member,
            from_fallback: false,
        };
    }
    if let Some(member) = fallback.iter().find(|m| m.name == name) {
        return PersonLookup::Found {
            member,
            from_fallback: true,
        };
    }
    match primary {
        Some(_) => PersonLookup::NotFound,
        None => PersonLookup::Unavailable,
    }
}

/// `"<name> | <lab>"`.
pub fn page_title(name: &str, lab_name: &str) -> String {
    format!("{} | {}", name, lab_name)
}

fn link(href: &str, icon: &str, label: &str) -> String {
    format!(
        "<a href=\"{}\" class=\"person-link\" target=\"_blank\">{}<span>{}</span></a>",
        escape_html(href),
        icon,
        label
    )
}

pub fn profile_html(p: &TeamMember) -> String {
    let photo = photo_html(p.photo.as_deref(), &p.name);

    let mut links = String::new();
    if let Some(gh) = p.github.as_deref() {
        links.push_str(&link(gh, icons::GITHUB, "GitHub"));
    }
    if let Some(gs) = p.scholar.as_deref() {
        links.push_str(&link(gs, icons::SCHOLAR, "Google Scholar"));
    }
    if !links.is_empty() {
        links = format!("<div class=\"person-links\">{}</div>", links);
    }

    let email = p
        .email
        .as_deref()
        .map(|e| {
            let e = escape_html(e);
            format!("<p class=\"person-email\"><a href=\"mailto:{e}\">{e}</a></p>")
        })
        .unwrap_or_default();
    let bio = p
        .bio
        .as_deref()
        .map(|b| format!("<div class=\"person-bio\">{}</div>", escape_html(b)))
        .unwrap_or_default();

    format!(
        "<div class=\"person-profile\">\
<div class=\"person-photo\">{}</div>\
<h1 class=\"person-name\">{}</h1>\
<p class=\"person-position\">{}</p>\
{}{}{}</div>",
        photo,
        escape_html(&p.name),
        escape_html(p.position.as_deref().unwrap_or("")),
        email,
        links,
        bio
    )
}

pub fn render_lookup(lookup: &PersonLookup<'_>) -> String {
    match lookup {
        PersonLookup::NoName => error_message("No person specified."),
        PersonLookup::Found { member, .. } => profile_html(member),
        PersonLookup::NotFound => error_message("Person not found."),
        PersonLookup::Unavailable => error_message("Unable to load person data."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(name: &str) -> TeamMember {
        TeamMember {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_primary_match_wins() {
        let primary = vec![person("Ada")];
        let fallback = vec![person("Ada"), person("Bo")];
        match find_person(Some(&primary), &fallback, Some("Ada")) {
            PersonLookup::Found { from_fallback, .. } => assert!(!from_fallback),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_falls_back_to_embedded() {
        let primary = vec![person("Ada")];
        let fallback = vec![person("Bo")];
        match find_person(Some(&primary), &fallback, Some("Bo")) {
            PersonLookup::Found { member, from_fallback } => {
                assert!(from_fallback);
                assert_eq!(member.name, "Bo");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_match_is_exact() {
        let primary = vec![person("Ada Lovelace")];
        assert_eq!(
            find_person(Some(&primary), &[], Some("ada lovelace")),
            PersonLookup::NotFound
        );
    }

    #[test]
    fn test_missing_everywhere_renders_message() {
        let lookup = find_person(Some(&[]), &[], Some("Nobody"));
        assert_eq!(lookup, PersonLookup::NotFound);
        assert_eq!(
            render_lookup(&lookup),
            "<p class=\"error-message\">Person not found.</p>"
        );

        let lookup = find_person(None, &[], Some("Nobody"));
        assert_eq!(lookup, PersonLookup::Unavailable);
        assert!(render_lookup(&lookup).contains("Unable to load person data."));

        assert_eq!(find_person(None, &[], None), PersonLookup::NoName);
        assert_eq!(find_person(None, &[], Some("")), PersonLookup::NoName);
    }

    #[test]
    fn test_profile_escapes_bio_and_links() {
        let p = TeamMember {
            name: "Ada".to_string(),
            bio: Some("<script>x()</script> works on DNA".to_string()),
            github: Some("https://github.com/ada".to_string()),
            ..Default::default()
        };
        let html = profile_html(&p);
        assert!(html.contains("&lt;script&gt;x()&lt;/script&gt; works on DNA"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("<span>GitHub</span>"));
        assert!(!html.contains("Google Scholar"));
        assert!(!html.contains("person-email"));
    }

    #[test]
    fn test_page_title() {
        assert_eq!(page_title("Ada", "Kinney Lab"), "Ada | Kinney Lab");
    }
}
