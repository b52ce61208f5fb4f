//! Append-only CSV sink for canonical contacts.
//!
//! The header row is written only when the file is new (or empty), so
//! re-running against an existing sink just adds rows.

use crate::error::SinkError;
use crate::models::{CSV_HEADER, CanonicalContact};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::info;

// ── Sink trait ────────────────────────────────────────────────────────────────

pub trait ContactSink: Send {
    fn append(&mut self, contact: &CanonicalContact) -> Result<(), SinkError>;
    fn flush(&mut self) -> Result<(), SinkError>;
}

/// In-memory sink; handy for callers that post-process results.
impl ContactSink for Vec<CanonicalContact> {
    fn append(&mut self, contact: &CanonicalContact) -> Result<(), SinkError> {
        self.push(contact.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

// ── CSV sink ──────────────────────────────────────────────────────────────────

pub struct CsvSink {
    writer: csv::Writer<File>,
    path: PathBuf,
    created: bool,
    rows: usize,
}

impl CsvSink {
    pub fn open(path: &Path) -> Result<Self, SinkError> {
        let open_err = |source| SinkError::Open { path: path.to_path_buf(), source };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(open_err)?;
        }

        let created = std::fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(open_err)?;

        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        if created {
            writer.write_record(CSV_HEADER)?;
            writer.flush()?;
            info!("Created sink {:?}", path);
        }

        Ok(Self { writer, path: path.to_path_buf(), created, rows: 0 })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether this open wrote the header row.
    pub fn created(&self) -> bool {
        self.created
    }

    /// Rows appended through this handle.
    pub fn rows(&self) -> usize {
        self.rows
    }
}

impl ContactSink for CsvSink {
    fn append(&mut self, contact: &CanonicalContact) -> Result<(), SinkError> {
        self.writer.serialize(contact)?;
        self.rows += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }
}

// ── Sink statistics ───────────────────────────────────────────────────────────

#[derive(Debug, Default, PartialEq)]
pub struct SinkStats {
    pub rows: usize,
    pub with_email: usize,
    pub with_phone: usize,
    pub with_website: usize,
    pub by_source: BTreeMap<String, usize>,
}

/// Read an existing sink back and count what it holds.
pub fn sink_stats(path: &Path) -> Result<SinkStats> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Cannot open sink {:?}", path))?;

    let mut stats = SinkStats::default();
    for (i, row) in reader.deserialize::<CanonicalContact>().enumerate() {
        let contact = row.with_context(|| format!("Row {} in {:?}", i + 1, path))?;
        stats.rows += 1;
        stats.with_email += usize::from(!contact.email.is_empty());
        stats.with_phone += usize::from(!contact.phone.is_empty());
        stats.with_website += usize::from(!contact.website.is_empty());
        *stats.by_source.entry(contact.source).or_default() += 1;
    }
    Ok(stats)
}
