//! registroimprese.it free-text search. Contacts are on the company page and
//! often only in running text, so the pattern fallback matters most here.

use super::SiteAdapter;
use super::parsers::{self, CardLayout, FieldRule, ListingPage};
use crate::models::{CanonicalField, DetailPayload, JobSpec};
use regex::Regex;
use std::sync::LazyLock;
use url::form_urlencoded;

/// "Corso Buenos Aires 10 - 20124 Milano (MI)"
static CAP_CITY_PROVINCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{5})\s+([^(]+)\s*\(([A-Z]{2})\)").expect("cap/city/province pattern")
});

const LISTING: CardLayout = CardLayout {
    entry: ".search-result-item",
    name: FieldRule::text("company-name", ".company-name"),
    fields: &[
        FieldRule::text("company-address", ".company-address"),
        FieldRule::text("company-sector", ".company-sector"),
    ],
    detail_link: Some("a.company-details"),
};

const DETAIL: &[FieldRule] = &[
    FieldRule::text("phone", ".phone"),
    FieldRule::text("email", ".email"),
    FieldRule::href("website", ".website"),
    FieldRule::text("company-description", ".company-description"),
];

pub struct RegistroImprese {
    base_url: String,
}

impl Default for RegistroImprese {
    fn default() -> Self {
        Self { base_url: "https://www.registroimprese.it".to_string() }
    }
}

impl SiteAdapter for RegistroImprese {
    fn id(&self) -> &str {
        "registro_imprese"
    }

    fn display_name(&self) -> &str {
        "Registro Imprese"
    }

    /// The sector is the search query; the locale, when set, is appended to it.
    fn listing_url(&self, job: &JobSpec, page: u32) -> String {
        let query = format!("{} {}", job.sector.trim(), job.locale.trim());
        let query: String = form_urlencoded::byte_serialize(query.trim().as_bytes()).collect();
        format!(
            "{}/ricerca-libera?p_p_id=ricercaportlet_WAR_ricercaRIportlet&index={}&q={}",
            self.base_url, page, query
        )
    }

    fn parse_listing(&self, html: &str, page_url: &str) -> ListingPage {
        let mut page = parsers::listing_or_empty(self.id(), html, &LISTING, page_url);
        for item in &mut page.items {
            let parsed = item
                .get("company-address")
                .and_then(|a| CAP_CITY_PROVINCE.captures(a))
                .map(|caps| (caps[1].to_string(), caps[2].trim().to_string(), caps[3].to_string()));
            let Some((cap, city, province)) = parsed else { continue };
            item.insert("cap", cap);
            item.insert("citta", city);
            item.insert("provincia", province);
        }
        page
    }

    fn parse_detail(&self, html: &str) -> Option<DetailPayload> {
        parsers::detail_or_absent(self.id(), html, DETAIL)
    }

    fn field_keys(&self, field: CanonicalField) -> &'static [&'static str] {
        match field {
            CanonicalField::Name => &["company-name"],
            CanonicalField::Sector => &["company-sector"],
            CanonicalField::Phone => &["phone"],
            CanonicalField::Email => &["email"],
            CanonicalField::Website => &["website"],
            CanonicalField::Address => &["company-address"],
            CanonicalField::PostalCode => &["cap"],
            CanonicalField::City => &["citta"],
            CanonicalField::Province => &["provincia"],
            CanonicalField::Description => &["company-description"],
        }
    }
}
