// src/render/mod.rs

pub mod alumni;
pub mod icons;
pub mod person;
pub mod publications;
pub mod selected;
pub mod team;

/// Glyph shown when a person has no photo.
pub const PHOTO_PLACEHOLDER: &str = "\u{1F464}";

/// Escape text for use in element content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Make a site-relative asset path absolute. Empty stays empty; absolute
/// paths and URLs are untouched.
pub fn normalize_path(path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    if path.starts_with('/') || path.starts_with("http") {
        return path.to_string();
    }
    format!("/{}", path)
}

/// `<p class="error-message">`.
pub fn error_message(text: &str) -> String {
    format!("<p class=\"error-message\">{}</p>", escape_html(text))
}

/// `<p class="loading-message">`, used for "nothing to show".
pub fn empty_message(text: &str) -> String {
    format!("<p class=\"loading-message\">{}</p>", escape_html(text))
}

/// `<img>` for a photo, or the placeholder glyph when there is none.
pub fn photo_html(photo: Option<&str>, alt: &str) -> String {
    match photo.map(normalize_path).filter(|p| !p.is_empty()) {
        Some(src) => format!(
            "<img src=\"{}\" alt=\"{}\">",
            escape_html(&src),
            escape_html(alt)
        ),
        None => format!("<div class=\"photo-placeholder\">{}</div>", PHOTO_PLACEHOLDER),
    }
}

/// Split a comma-separated author list, escape each name, and wrap in
/// `<strong>` every author whose name contains `highlight`
/// (case-insensitive). An empty `highlight` emphasizes nobody.
pub fn format_authors(authors: &str, highlight: &str) -> String {
    let needle = highlight.to_lowercase();
    authors
        .split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(|a| {
            let escaped = escape_html(a);
            if !needle.is_empty() && a.to_lowercase().contains(&needle) {
                format!("<strong>{}</strong>", escaped)
            } else {
                escaped
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
