use anyhow::{Context, Result};
use categorize::Entity;
use csv::{ReaderBuilder, Trim};

/// Parses an extracted-entity table.
///
/// Headers may be `document_id,entity_text,coarse_class` or the extractor's
/// own `System_ID,Entity,Class`. The optional `Doc` (or `document`) column is
/// kept; other columns are ignored. A blank entity cell becomes an empty string.
pub fn parse_entities(content: &str, delimiter: u8) -> Result<Vec<Entity>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(Trim::Headers)
        .from_reader(content.as_bytes());

    let mut entities = Vec::new();
    for (idx, record) in reader.deserialize::<Entity>().enumerate() {
        // header is line 1
        let entity = record.context(format!("Invalid entity row at line {}", idx + 2))?;
        entities.push(entity);
    }

    Ok(entities)
}
