//! Text normalization shared by every builder.

use crate::models::Resume;

/// City and address combined without repeating one inside the other
/// (case-insensitive), e.g. `"Austin"` + `"Austin, TX"` → `"Austin, TX"`.
pub fn format_location(resume: &Resume) -> String {
    let city = resume.city.trim();
    let address = resume.address.trim();
    if city.is_empty() || address.is_empty() {
        return if city.is_empty() { address } else { city }.to_string();
    }
    let (city_l, address_l) = (city.to_lowercase(), address.to_lowercase());
    if address_l.contains(&city_l) {
        address.to_string()
    } else if city_l.contains(&address_l) {
        city.to_string()
    } else {
        format!("{city}, {address}")
    }
}

/// Formats a date range with a `{start}`/`{end}` pattern.
///
/// A start without an end becomes `start - Present` when `default_present` is
/// set; a lone value is returned bare; two blanks give an empty string.
pub fn format_date_range(start: &str, end: &str, pattern: &str, default_present: bool) -> String {
    let start = start.trim();
    let mut end = end.trim();
    if !start.is_empty() && end.is_empty() && default_present {
        end = "Present";
    }
    match (start.is_empty(), end.is_empty()) {
        (false, false) => pattern
            .replace("{start}", start)
            .replace("{end}", end)
            .trim()
            .to_string(),
        (false, true) => start.to_string(),
        (true, false) => end.to_string(),
        (true, true) => String::new(),
    }
}

/// Prefixes `https://` unless the value already carries a known scheme.
pub fn normalize_url(url: &str) -> String {
    let raw = url.trim();
    if raw.is_empty() {
        return String::new();
    }
    if ["http://", "https://", "mailto:", "tel:"]
        .iter()
        .any(|scheme| raw.starts_with(scheme))
    {
        raw.to_string()
    } else {
        format!("https://{raw}")
    }
}

/// Skills in ascending lexicographic order.
pub fn sorted_skills(skills: &[String]) -> Vec<&str> {
    let mut out: Vec<&str> = skills.iter().map(String::as_str).collect();
    out.sort_unstable();
    out
}

/// Non-blank trimmed lines of a multi-line description.
pub fn description_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty())
}

/// Joins the non-blank parts with `sep`.
pub fn join_non_empty<'a>(parts: impl IntoIterator<Item = &'a str>, sep: &str) -> String {
    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}
