use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ── Fetch kind ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Listing,
    Detail,
}

impl fmt::Display for FetchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchKind::Listing => f.write_str("listing"),
            FetchKind::Detail => f.write_str("detail"),
        }
    }
}

// ── Raw listing item (stub) ───────────────────────────────────────────────────

/// One listing entry, keyed by the source's own field names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawListingItem {
    pub fields: BTreeMap<String, String>,
    /// Absolute URL of the detail page, if the entry links to one.
    pub detail_url: Option<String>,
    /// Visible text of the richest page seen for this item so far.
    pub text: String,
}

impl RawListingItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), ..Default::default() }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl AsRef<str>) {
        self.fields.insert(key.into(), value.as_ref().trim().to_string());
    }

    /// Non-empty value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .map(|v| v.as_str())
            .filter(|v| !v.is_empty())
    }

    /// Fold a detail payload in: non-empty detail values win, listing values
    /// survive where the detail page had nothing.
    pub fn merge(&mut self, detail: DetailPayload) {
        for (key, value) in detail.fields {
            if !value.trim().is_empty() {
                self.fields.insert(key, value.trim().to_string());
            }
        }
        if !detail.text.trim().is_empty() {
            self.text = detail.text;
        }
    }
}

// ── Detail payload ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailPayload {
    pub fields: BTreeMap<String, String>,
    pub text: String,
}

impl DetailPayload {
    pub fn is_empty(&self) -> bool {
        self.fields.values().all(|v| v.trim().is_empty()) && self.text.trim().is_empty()
    }
}

// ── Canonical schema ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    Name,
    Sector,
    Phone,
    Email,
    Website,
    Address,
    PostalCode,
    City,
    Province,
    Description,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 10] = [
        CanonicalField::Name,
        CanonicalField::Sector,
        CanonicalField::Phone,
        CanonicalField::Email,
        CanonicalField::Website,
        CanonicalField::Address,
        CanonicalField::PostalCode,
        CanonicalField::City,
        CanonicalField::Province,
        CanonicalField::Description,
    ];
}

/// Header row of the output sink, in column order.
pub const CSV_HEADER: [&str; 11] = [
    "Ragione Sociale",
    "Settore",
    "Telefono",
    "Email",
    "Sito Web",
    "Indirizzo",
    "CAP",
    "Città",
    "Provincia",
    "Descrizione",
    "Fonte",
];

/// The persisted unit. Every field is present; missing data is `""`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CanonicalContact {
    #[serde(rename = "Ragione Sociale")]
    pub name: String,
    #[serde(rename = "Settore")]
    pub sector: String,
    #[serde(rename = "Telefono")]
    pub phone: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Sito Web")]
    pub website: String,
    #[serde(rename = "Indirizzo")]
    pub address: String,
    #[serde(rename = "CAP")]
    pub postal_code: String,
    #[serde(rename = "Città")]
    pub city: String,
    #[serde(rename = "Provincia")]
    pub province: String,
    #[serde(rename = "Descrizione")]
    pub description: String,
    #[serde(rename = "Fonte")]
    pub source: String,
}

impl CanonicalContact {
    pub fn set(&mut self, field: CanonicalField, value: String) {
        let slot = match field {
            CanonicalField::Name => &mut self.name,
            CanonicalField::Sector => &mut self.sector,
            CanonicalField::Phone => &mut self.phone,
            CanonicalField::Email => &mut self.email,
            CanonicalField::Website => &mut self.website,
            CanonicalField::Address => &mut self.address,
            CanonicalField::PostalCode => &mut self.postal_code,
            CanonicalField::City => &mut self.city,
            CanonicalField::Province => &mut self.province,
            CanonicalField::Description => &mut self.description,
        };
        *slot = value;
    }
}

// ── Job spec ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobSpec {
    pub source: String,
    pub sector: String,
    #[serde(default)]
    pub locale: String,
    #[serde(alias = "maxPages", default = "default_max_pages")]
    pub max_pages: u32,
}

fn default_max_pages() -> u32 {
    3
}

impl JobSpec {
    pub fn new(source: &str, sector: &str, locale: &str, max_pages: u32) -> Self {
        Self {
            source: source.to_string(),
            sector: sector.to_string(),
            locale: locale.to_string(),
            max_pages,
        }
    }
}

impl fmt::Display for JobSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: '{}'", self.source, self.sector)?;
        if !self.locale.is_empty() {
            write!(f, " @ '{}'", self.locale)?;
        }
        write!(f, " ({} pages)", self.max_pages)
    }
}

// ── Run status ────────────────────────────────────────────────────────────────

/// Snapshot read by reporting layers. Updated per job, not per page.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct RunStatus {
    pub in_progress: bool,
    pub completed: bool,
    pub count: usize,
    pub error: Option<String>,
    pub jobs_completed: usize,
    pub jobs_total: usize,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}
