use super::SiteAdapter;
use super::extractor::extract;
use crate::models::{CanonicalContact, CanonicalField, JobSpec, RawListingItem};

/// Map a merged item onto the canonical schema.
///
/// Returns `None` (dropped) when no name survives the mapping. Keys the
/// adapter does not list for any field are ignored. Pure: the same input
/// always yields the same record.
pub fn normalize(
    adapter: &dyn SiteAdapter,
    item: &RawListingItem,
    job: &JobSpec,
) -> Option<CanonicalContact> {
    let mut contact = CanonicalContact {
        source: adapter.display_name().to_string(),
        ..Default::default()
    };

    for field in CanonicalField::ALL {
        let structured = adapter
            .field_keys(field)
            .iter()
            .find_map(|key| item.get(key));
        contact.set(field, extract(field, structured, &item.text));
    }

    if contact.name.is_empty() {
        return None;
    }
    if contact.sector.is_empty() {
        contact.sector = job.sector.trim().to_string();
    }
    Some(contact)
}
