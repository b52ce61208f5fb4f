use super::SiteAdapter;
use super::http_client::PageFetcher;
use crate::models::{DetailPayload, FetchKind};
use tracing::debug;

/// Fetch and parse one detail page.
///
/// `None` when the fetch failed or the page had nothing usable; the owning
/// item then goes on with its listing fields only.
pub async fn enrich(
    fetcher: &dyn PageFetcher,
    adapter: &dyn SiteAdapter,
    detail_url: &str,
) -> Option<DetailPayload> {
    let page = fetcher.fetch(detail_url, FetchKind::Detail).await.ok()?;
    let payload = adapter.parse_detail(&page.body);
    if payload.is_none() {
        debug!("{}: nothing usable on {}", adapter.id(), detail_url);
    }
    payload
}
