//! Selector plumbing shared by the site adapters.
//!
//! Adapters describe their markup as [`CardLayout`] and [`FieldRule`] tables;
//! the functions here walk a document with those tables and produce raw,
//! source-keyed items.

use crate::models::{DetailPayload, RawListingItem};
use anyhow::{Result, anyhow};
use scraper::{ElementRef, Html, Selector};
use tracing::warn;
use url::Url;

// ── Layout tables ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub enum ValueSource {
    Text,
    Attr(&'static str),
}

/// `key` is filled from the first element matching `selector`.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub key: &'static str,
    pub selector: &'static str,
    pub source: ValueSource,
}

impl FieldRule {
    pub const fn text(key: &'static str, selector: &'static str) -> Self {
        Self { key, selector, source: ValueSource::Text }
    }

    pub const fn href(key: &'static str, selector: &'static str) -> Self {
        Self { key, selector, source: ValueSource::Attr("href") }
    }
}

/// Shape of one listing entry.
#[derive(Debug, Clone, Copy)]
pub struct CardLayout {
    pub entry: &'static str,
    /// Entries without this element are skipped.
    pub name: FieldRule,
    pub fields: &'static [FieldRule],
    pub detail_link: Option<&'static str>,
}

// ── Listing page ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingPage {
    pub items: Vec<RawListingItem>,
    /// False only when the page produced no items.
    pub has_more: bool,
}

impl ListingPage {
    pub fn new(items: Vec<RawListingItem>) -> Self {
        let has_more = !items.is_empty();
        Self { items, has_more }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("selector '{}': {:?}", css, e))
}

/// Element text with runs of whitespace collapsed to one space.
pub fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// All text a reader would see on the page: no script, style or noscript.
pub fn visible_text(doc: &Html) -> String {
    let mut out = String::new();
    for node in doc.root_element().descendants() {
        let Some(text) = node.value().as_text() else { continue };
        let hidden = node
            .parent()
            .and_then(|p| p.value().as_element())
            .map(|e| matches!(e.name(), "script" | "style" | "noscript"))
            .unwrap_or(false);
        if hidden {
            continue;
        }
        for word in text.split_whitespace() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(word);
        }
    }
    out
}

/// Resolve `href` against the page it was found on.
pub fn resolve_link(base: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
        return None;
    }
    let base = Url::parse(base).ok()?;
    base.join(href).ok().map(|u| u.to_string())
}

fn rule_value(scope: ElementRef<'_>, rule: &FieldRule) -> Result<Option<String>> {
    let sel = selector(rule.selector)?;
    let Some(el) = scope.select(&sel).next() else { return Ok(None) };
    Ok(match rule.source {
        ValueSource::Text => Some(element_text(el)),
        ValueSource::Attr(attr) => el.value().attr(attr).map(|v| v.trim().to_string()),
    })
}

// ── Cards → raw items ─────────────────────────────────────────────────────────

/// One raw item per entry that carries a name element.
pub fn parse_cards(html: &str, layout: &CardLayout, page_url: &str) -> Result<Vec<RawListingItem>> {
    let doc = Html::parse_document(html);
    let entry_sel = selector(layout.entry)?;
    let name_sel = selector(layout.name.selector)?;
    let link_sel = layout.detail_link.map(selector).transpose()?;

    let mut items = Vec::new();
    for card in doc.select(&entry_sel) {
        let Some(name_el) = card.select(&name_sel).next() else {
            continue;
        };

        let mut item = RawListingItem::new(element_text(card));
        item.insert(layout.name.key, element_text(name_el));

        for rule in layout.fields {
            if let Some(value) = rule_value(card, rule)? {
                item.insert(rule.key, value);
            }
        }

        item.detail_url = link_sel
            .as_ref()
            .and_then(|sel| card.select(sel).next())
            .and_then(|a| a.value().attr("href"))
            .and_then(|href| resolve_link(page_url, href));

        items.push(item);
    }

    Ok(items)
}

// ── Detail page → payload ─────────────────────────────────────────────────────

/// `None` when no rule matched and the page shows no text at all.
pub fn parse_detail_fields(html: &str, rules: &[FieldRule]) -> Result<Option<DetailPayload>> {
    let doc = Html::parse_document(html);
    let root = doc.root_element();

    let mut payload = DetailPayload { text: visible_text(&doc), ..Default::default() };
    for rule in rules {
        if let Some(value) = rule_value(root, rule)? {
            if !value.is_empty() {
                payload.fields.insert(rule.key.to_string(), value);
            }
        }
    }

    Ok(if payload.is_empty() { None } else { Some(payload) })
}

/// [`parse_cards`] with parse errors logged and turned into an empty page.
pub fn listing_or_empty(source: &str, html: &str, layout: &CardLayout, page_url: &str) -> ListingPage {
    match parse_cards(html, layout, page_url) {
        Ok(items) => ListingPage::new(items),
        Err(e) => {
            warn!("{}: unparseable listing {}: {:#}", source, page_url, e);
            ListingPage::empty()
        }
    }
}

/// [`parse_detail_fields`] with parse errors logged and treated as absent.
pub fn detail_or_absent(source: &str, html: &str, rules: &[FieldRule]) -> Option<DetailPayload> {
    parse_detail_fields(html, rules).unwrap_or_else(|e| {
        warn!("{}: unparseable detail page: {:#}", source, e);
        None
    })
}
