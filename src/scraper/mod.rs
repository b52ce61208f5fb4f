pub mod enricher;
pub mod europages;
pub mod extractor;
pub mod http_client;
pub mod normalizer;
pub mod paginegialle;
pub mod parsers;
pub mod registro_imprese;

use crate::error::ConfigError;
use crate::models::{CanonicalField, DetailPayload, JobSpec};
use std::sync::Arc;

use self::europages::Europages;
use self::paginegialle::PagineGialle;
use self::parsers::ListingPage;
use self::registro_imprese::RegistroImprese;

// ── Adapter trait ─────────────────────────────────────────────────────────────

/// Everything that is specific to one remote directory.
///
/// Raw items are keyed by the adapter's own names; [`SiteAdapter::field_keys`]
/// tells the normalizer which of those feed each canonical field. A new source
/// is a new implementation of this trait, registered in [`AdapterRegistry`].
pub trait SiteAdapter: Send + Sync {
    /// Name used in job configuration.
    fn id(&self) -> &str;

    /// Name written to the `Fonte` column.
    fn display_name(&self) -> &str;

    fn listing_url(&self, job: &JobSpec, page: u32) -> String;

    /// Whether a job's locale is read as a city. Sources searched per
    /// country return `false` and get an empty locale from city-based input.
    fn takes_city_locale(&self) -> bool {
        true
    }

    /// Never fails: unparseable markup is an empty page.
    fn parse_listing(&self, html: &str, page_url: &str) -> ListingPage;

    fn parse_detail(&self, html: &str) -> Option<DetailPayload>;

    /// Raw keys that carry `field`, most specific first.
    fn field_keys(&self, field: CanonicalField) -> &'static [&'static str];
}

// ── Registry ──────────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: Vec<Arc<dyn SiteAdapter>>,
}

impl AdapterRegistry {
    pub fn builtin() -> Self {
        let mut registry = Self::default();
        registry.register(Arc::new(PagineGialle::default()));
        registry.register(Arc::new(Europages::default()));
        registry.register(Arc::new(RegistroImprese::default()));
        registry
    }

    pub fn register(&mut self, adapter: Arc<dyn SiteAdapter>) {
        self.adapters.push(adapter);
    }

    /// Case-insensitive; `-`, `_` and spaces are ignored.
    pub fn resolve(&self, source: &str) -> Result<Arc<dyn SiteAdapter>, ConfigError> {
        let wanted = canonical_id(source);
        self.adapters
            .iter()
            .find(|a| canonical_id(a.id()) == wanted)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownSource(source.to_string()))
    }

    pub fn adapters(&self) -> impl Iterator<Item = &Arc<dyn SiteAdapter>> {
        self.adapters.iter()
    }
}

fn canonical_id(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}
