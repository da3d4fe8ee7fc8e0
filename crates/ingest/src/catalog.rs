use anyhow::{Context, Result};
use categorize::VaccineCatalog;
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct TrackerRecord {
    #[serde(rename = "Product Category")]
    category: String,
    #[serde(rename = "Product Description", default)]
    product: Option<String>,
}

/// Builds the vaccine catalog from a vaccine tracker export.
pub fn parse_catalog(content: &str, delimiter: u8) -> Result<VaccineCatalog> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(Trim::Headers)
        .from_reader(content.as_bytes());

    let mut records = Vec::new();
    for (idx, record) in reader.deserialize::<TrackerRecord>().enumerate() {
        let record = record.context(format!("Invalid catalog row at line {}", idx + 2))?;
        if let Some(product) = record.product {
            records.push((record.category, product));
        }
    }

    Ok(VaccineCatalog::from_records(records))
}
