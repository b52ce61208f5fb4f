//! europages.it: company cards with a free-text address; phone and email
//! live on the company page.

use super::SiteAdapter;
use super::parsers::{self, CardLayout, FieldRule, ListingPage};
use crate::models::{CanonicalField, DetailPayload, JobSpec};
use crate::utils::path_segment;
use regex::Regex;
use std::sync::LazyLock;

/// "Via Roma 1, 20121 Milano, Italia" → CAP and city
static CAP_CITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{5})\s+([^,]+)").expect("cap/city pattern"));

const LISTING: CardLayout = CardLayout {
    entry: ".company",
    name: FieldRule::text("company-name", ".company-name"),
    fields: &[
        FieldRule::text("company-description", ".company-description"),
        FieldRule::text("company-address", ".company-address"),
    ],
    detail_link: Some(".company-name a"),
};

const DETAIL: &[FieldRule] = &[
    FieldRule::text("phone", ".phone"),
    FieldRule::text("email", ".email"),
    FieldRule::href("website", ".website"),
];

pub struct Europages {
    base_url: String,
}

impl Default for Europages {
    fn default() -> Self {
        Self { base_url: "https://www.europages.it".to_string() }
    }
}

impl SiteAdapter for Europages {
    fn id(&self) -> &str {
        "europages"
    }

    fn display_name(&self) -> &str {
        "Europages"
    }

    /// Europages is searched per country; an empty locale means Italy.
    fn listing_url(&self, job: &JobSpec, page: u32) -> String {
        let country = match job.locale.trim() {
            "" => "italia".to_string(),
            locale => path_segment(&locale.to_lowercase()),
        };
        format!(
            "{}/aziende/pg-{}/{}/{}.html",
            self.base_url,
            page,
            country,
            path_segment(&job.sector)
        )
    }

    fn takes_city_locale(&self) -> bool {
        false
    }

    fn parse_listing(&self, html: &str, page_url: &str) -> ListingPage {
        let mut page = parsers::listing_or_empty(self.id(), html, &LISTING, page_url);
        for item in &mut page.items {
            let parsed = item
                .get("company-address")
                .and_then(|a| CAP_CITY.captures(a))
                .map(|caps| (caps[1].to_string(), caps[2].trim().to_string()));
            let Some((cap, city)) = parsed else { continue };
            item.insert("cap", cap);
            item.insert("citta", city);
        }
        page
    }

    fn parse_detail(&self, html: &str) -> Option<DetailPayload> {
        parsers::detail_or_absent(self.id(), html, DETAIL)
    }

    fn field_keys(&self, field: CanonicalField) -> &'static [&'static str] {
        match field {
            CanonicalField::Name => &["company-name"],
            CanonicalField::Phone => &["phone"],
            CanonicalField::Email => &["email"],
            CanonicalField::Website => &["website"],
            CanonicalField::Address => &["company-address"],
            CanonicalField::PostalCode => &["cap"],
            CanonicalField::City => &["citta"],
            CanonicalField::Description => &["company-description"],
            CanonicalField::Sector | CanonicalField::Province => &[],
        }
    }
}
