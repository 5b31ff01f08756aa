//! HTML entity escaping for user-supplied text.

/// Escapes text for use in element content and double- or single-quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escaped URL for an `href`, or `None` when the scheme is not one we link to.
///
/// Bare domains (`linkedin.com/in/x`) are prefixed with `https://`.
pub fn safe_href(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }
    let lower = url.to_ascii_lowercase();
    let allowed = lower.starts_with("https://")
        || lower.starts_with("http://")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:");

    if allowed {
        Some(escape_html(url))
    } else if !lower.contains(':') {
        Some(escape_html(&format!("https://{url}")))
    } else {
        None
    }
}
