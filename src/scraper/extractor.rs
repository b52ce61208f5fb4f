//! Per-field value selection: structured value first, text patterns second.

use crate::models::CanonicalField;
use regex::Regex;
use std::sync::LazyLock;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("email pattern")
});

/// Tried in order; the first pattern with a match anywhere in the text wins,
/// so `+39` numbers beat bare local ones. Matches never start or end inside
/// a longer digit run such as a VAT number.
static PHONES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\+39\s?[0-9]{3}\s?[0-9]{6,7}\b",
        r"\+39\s?[0-9]{2}\s?[0-9]{6,8}\b",
        r"\+39\s?[0-9]{9,10}\b",
        r"\b[0-9]{3}\s?[0-9]{7}\b",
        r"\b[0-9]{2}\s?[0-9]{8}\b",
        r"\b[0-9]{10}\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("phone pattern"))
    .collect()
});

pub fn extract(field: CanonicalField, structured: Option<&str>, raw_text: &str) -> String {
    if let Some(value) = structured.map(str::trim).filter(|v| !v.is_empty()) {
        return value.to_string();
    }
    match field {
        CanonicalField::Email => email_in(raw_text),
        CanonicalField::Phone => phone_in(raw_text),
        _ => None,
    }
    .unwrap_or_default()
}

pub fn email_in(text: &str) -> Option<String> {
    EMAIL.find(text).map(|m| m.as_str().to_string())
}

pub fn phone_in(text: &str) -> Option<String> {
    PHONES
        .iter()
        .find_map(|re| re.find(text))
        .map(|m| m.as_str().to_string())
}
