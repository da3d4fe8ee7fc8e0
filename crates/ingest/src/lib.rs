pub mod catalog;
pub mod reader;
pub mod table;

pub use catalog::parse_catalog;
pub use reader::FileReader;
pub use table::parse_entities;

use anyhow::{Context, Result};
use categorize::{Entity, VaccineCatalog};
use std::path::Path;
use tracing::info;

/// Load one entity table file.
pub async fn ingest_file(file_path: &Path) -> Result<Vec<Entity>> {
    let content = FileReader::read_file(file_path).await?;
    parse_entities(&content, FileReader::delimiter(file_path))
        .context(format!("Failed to parse entity table: {:?}", file_path))
}

/// Load and concatenate every entity table in a directory.
pub async fn ingest_directory(dir_path: &Path) -> Result<Vec<Entity>> {
    let files = FileReader::read_directory(dir_path).await?;
    if files.is_empty() {
        anyhow::bail!("No .csv or .tsv files found in {:?}", dir_path);
    }

    let mut all_entities = Vec::new();
    for (path, content) in files {
        let entities = parse_entities(&content, FileReader::delimiter(&path))
            .context(format!("Failed to parse entity table: {:?}", path))?;
        info!(file = %path.display(), entities = entities.len(), "Entity table loaded");
        all_entities.extend(entities);
    }

    Ok(all_entities)
}

/// Load entities from a file or a directory of files.
pub async fn ingest_entities(path: &Path) -> Result<Vec<Entity>> {
    if path.is_dir() {
        ingest_directory(path).await
    } else {
        ingest_file(path).await
    }
}

/// Load the vaccine reference catalog.
pub async fn load_catalog(path: &Path) -> Result<VaccineCatalog> {
    let content = FileReader::read_file(path).await?;
    let catalog = parse_catalog(&content, FileReader::delimiter(path))
        .context(format!("Failed to parse vaccine catalog: {:?}", path))?;

    info!(products = catalog.product_count(), "Vaccine catalog loaded");
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ingest_directory_concatenates_in_path_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("batch_2.csv"),
            "System_ID,Entity,Class\n2,ELISA,assay\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("batch_1.csv"),
            "System_ID,Entity,Class\n1,ferrets,animal\n",
        )
        .unwrap();

        let entities = ingest_entities(dir.path()).await.unwrap();

        assert_eq!(
            entities,
            vec![
                Entity::new("1", "ferrets", "animal"),
                Entity::new("2", "ELISA", "assay"),
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ingest_entities(dir.path()).await.is_err());
    }

    #[tokio::test]
    async fn test_load_catalog_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tracker.csv");
        std::fs::write(
            &path,
            "Product Category,Product Description\nDNA-based,INO-4800\n",
        )
        .unwrap();

        let catalog = load_catalog(&path).await.unwrap();
        assert_eq!(catalog.product_count(), 1);
    }
}
