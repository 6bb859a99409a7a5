//! Reusable field filters
//!
//! These normalize payload values after validation and before storage

/// Filter: trim whitespace
pub fn trim(value: &str) -> String {
    value.trim().to_string()
}

/// Filter: trim, and drop the value entirely when nothing is left
pub fn trim_opt(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Filter: canonical e-mail form (trimmed, lower-case)
pub fn email(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Filter: upper-case a trimmed value (PAN numbers)
pub fn uppercase(value: &str) -> String {
    value.trim().to_uppercase()
}

/// Filter: trim each entry and drop empty ones
pub fn tags(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

/// Derive a URL slug: lower-case ASCII alphanumerics joined by single `-`
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}
