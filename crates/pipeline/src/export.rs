use anyhow::{Context, Result};
use categorize::CategorizedEntity;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::summary::RunSummary;

pub const CATEGORIZED_STEM: &str = "entities_with_categories";
pub const SUMMARY_STEM: &str = "category_summary";

/// `<stem>_<YYYYMMDD>.<ext>` when a date is given, `<stem>.<ext>` otherwise.
pub fn output_name(stem: &str, extension: &str, date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => format!("{}_{}.{}", stem, date.format("%Y%m%d"), extension),
        None => format!("{}.{}", stem, extension),
    }
}

pub fn output_path(dir: &Path, stem: &str, extension: &str, date: Option<NaiveDate>) -> PathBuf {
    dir.join(output_name(stem, extension, date))
}

pub fn write_categorized(path: &Path, rows: &[CategorizedEntity]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .context(format!("Failed to create output file: {:?}", path))?;

    for row in rows {
        writer
            .serialize(row)
            .context(format!("Failed to write row for document {}", row.document_id))?;
    }
    writer.flush().context("Failed to flush categorized rows")?;

    info!(path = ?path, rows = rows.len(), "Wrote categorized entities");
    Ok(())
}

pub fn write_summary(path: &Path, summary: &RunSummary) -> Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, json).context(format!("Failed to write summary: {:?}", path))?;

    info!(path = ?path, "Wrote run summary");
    Ok(())
}
