use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

pub struct FileReader;

impl FileReader {
    pub fn is_supported(path: &Path) -> bool {
        matches!(Self::extension(path), "csv" | "tsv")
    }

    /// Field delimiter implied by the file extension.
    pub fn delimiter(path: &Path) -> u8 {
        match Self::extension(path) {
            "tsv" => b'\t',
            _ => b',',
        }
    }

    fn extension(path: &Path) -> &str {
        path.extension().and_then(|e| e.to_str()).unwrap_or("")
    }

    pub async fn read_file(path: &Path) -> Result<String> {
        if !Self::is_supported(path) {
            anyhow::bail!("Unsupported file format: {:?}", path);
        }

        fs::read_to_string(path)
            .await
            .context(format!("Failed to read file: {:?}", path))
    }

    /// Every supported file directly inside `dir`, sorted by path.
    pub async fn read_directory(dir: &Path) -> Result<Vec<(PathBuf, String)>> {
        let mut paths = Vec::new();

        let mut entries = fs::read_dir(dir)
            .await
            .context(format!("Failed to list directory: {:?}", dir))?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.is_file() && Self::is_supported(&path) {
                paths.push(path);
            }
        }
        paths.sort();

        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            let content = Self::read_file(&path).await?;
            files.push((path, content));
        }

        Ok(files)
    }
}
