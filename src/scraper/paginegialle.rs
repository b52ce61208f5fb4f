//! paginegialle.it: hCard listing entries, email/website/description on the
//! detail page.

use super::SiteAdapter;
use super::parsers::{self, CardLayout, FieldRule, ListingPage};
use crate::models::{CanonicalField, DetailPayload, JobSpec};
use crate::utils::path_segment;

const LISTING: CardLayout = CardLayout {
    entry: ".vcard",
    name: FieldRule::text("org", ".org"),
    fields: &[
        FieldRule::text("street-address", ".street-address"),
        FieldRule::text("locality", ".locality"),
        FieldRule::text("postal-code", ".postal-code"),
        FieldRule::text("region", ".region"),
        FieldRule::text("phone-number", ".phone-number"),
    ],
    detail_link: Some("a.btn-details"),
};

const DETAIL: &[FieldRule] = &[
    FieldRule::text("email", ".email"),
    FieldRule::href("website", ".website a"),
    FieldRule::text("description", ".description"),
];

pub struct PagineGialle {
    base_url: String,
}

impl Default for PagineGialle {
    fn default() -> Self {
        Self { base_url: "https://www.paginegialle.it".to_string() }
    }
}

impl SiteAdapter for PagineGialle {
    fn id(&self) -> &str {
        "paginegialle"
    }

    fn display_name(&self) -> &str {
        "PagineGialle"
    }

    fn listing_url(&self, job: &JobSpec, page: u32) -> String {
        format!(
            "{}/ricerca/{}/{}/p-{}",
            self.base_url,
            path_segment(&job.sector),
            path_segment(&job.locale),
            page
        )
    }

    fn parse_listing(&self, html: &str, page_url: &str) -> ListingPage {
        parsers::listing_or_empty(self.id(), html, &LISTING, page_url)
    }

    fn parse_detail(&self, html: &str) -> Option<DetailPayload> {
        parsers::detail_or_absent(self.id(), html, DETAIL)
    }

    fn field_keys(&self, field: CanonicalField) -> &'static [&'static str] {
        match field {
            CanonicalField::Name => &["org"],
            CanonicalField::Phone => &["phone-number"],
            CanonicalField::Email => &["email"],
            CanonicalField::Website => &["website"],
            CanonicalField::Address => &["street-address"],
            CanonicalField::PostalCode => &["postal-code"],
            CanonicalField::City => &["locality"],
            CanonicalField::Province => &["region"],
            CanonicalField::Description => &["description"],
            CanonicalField::Sector => &[],
        }
    }
}
