use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::types::SearchableItem;

/// Accepted top-level shapes of a catalog file.
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    List(Vec<SearchableItem>),
    Wrapped { items: Vec<SearchableItem> },
    Single(SearchableItem),
}

/// Reads catalog snapshots (JSON exports of the product listing endpoint) from
/// a file or a directory tree.
#[derive(Debug, Default)]
pub struct CatalogLoader;

impl CatalogLoader {
    pub fn new() -> Self { Self }

    /// Loads a single `.json` file, or every `.json` file below a directory.
    pub fn load_path(&self, path: &Path) -> Result<Vec<SearchableItem>> {
        if path.is_dir() { self.load_directory(path) } else { self.read_file(path) }
    }

    pub fn load_directory(&self, data_dir: &Path) -> Result<Vec<SearchableItem>> {
        self.load_directory_limited(data_dir, usize::MAX)
    }

    pub fn load_directory_limited(&self, data_dir: &Path, limit: usize) -> Result<Vec<SearchableItem>> {
        let mut files = self.list_json_files(data_dir);
        if files.is_empty() {
            info!("No .json files found under {}", data_dir.display());
            return Ok(vec![]);
        }
        if files.len() > limit {
            files.truncate(limit);
            info!("Limited to first {} files", limit);
        }
        let mut all_items = Vec::new();
        for (file_index, file_path) in files.iter().enumerate() {
            debug!("Loading file {}/{}: {}", file_index + 1, files.len(), file_path.display());
            all_items.extend(self.read_file(file_path)?);
        }
        info!("Loaded {} files into {} items", files.len(), all_items.len());
        Ok(all_items)
    }

    fn read_file(&self, file_path: &Path) -> Result<Vec<SearchableItem>> {
        let raw = fs::read(file_path).with_context(|| format!("Failed to read {}", file_path.display()))?;
        let parsed: CatalogFile = serde_json::from_slice(&raw)
            .with_context(|| format!("Failed to parse catalog file {}", file_path.display()))?;
        Ok(match parsed {
            CatalogFile::List(items) | CatalogFile::Wrapped { items } => items,
            CatalogFile::Single(item) => vec![item],
        })
    }

    fn list_json_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut json_files: Vec<PathBuf> = walkdir::WalkDir::new(root)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().is_file())
            .map(walkdir::DirEntry::into_path)
            .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("json"))
            .collect();
        json_files.sort();
        json_files
    }
}
