//! Registry tree walking and provider document loading

use crate::{CollectorError, Result};
use registry_openapi_common::{ProviderEntry, ProviderId};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// A provider file that was found but not loaded
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of walking a registry tree
#[derive(Debug, Clone, Default)]
pub struct Collection {
    /// Loaded providers, in directory walk order
    pub providers: Vec<ProviderEntry>,

    /// Files under numeric directories that could not be loaded
    pub skipped: Vec<SkippedFile>,
}

/// Finds provider documents under a registry root
pub struct ProviderCollector {
    root: PathBuf,
}

impl ProviderCollector {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Walk the tree and load every `.yml`/`.yaml` file whose parent
    /// directory name is a provider ID
    ///
    /// Only a missing or unreadable root fails the run. A malformed file, or one
    /// without an `endpoints` list, is skipped with a warning.
    pub fn collect(&self) -> Result<Collection> {
        if !fs::metadata(&self.root)?.is_dir() {
            return Err(CollectorError::NotADirectory(self.root.clone()));
        }

        let mut collection = Collection::default();

        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => return Err(e.into()),
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable registry entry");
                    continue;
                }
            };

            if !entry.file_type().is_file() || !is_yaml(entry.path()) {
                continue;
            }
            let Some(id) = provider_id(entry.path()) else {
                continue;
            };

            match load_provider(id, entry.path()) {
                Ok(provider) => {
                    debug!(
                        provider = %id,
                        path = %entry.path().display(),
                        endpoints = provider.endpoints.len(),
                        "Loaded provider document"
                    );
                    collection.providers.push(provider);
                }
                Err(reason) => {
                    warn!(path = %entry.path().display(), %reason, "Skipping provider document");
                    collection.skipped.push(SkippedFile {
                        path: entry.path().to_path_buf(),
                        reason,
                    });
                }
            }
        }

        Ok(collection)
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yml" | "yaml")
    )
}

/// Provider ID from the file's parent directory name, if numeric
fn provider_id(path: &Path) -> Option<ProviderId> {
    path.parent()?.file_name()?.to_str()?.parse().ok()
}

fn load_provider(id: ProviderId, path: &Path) -> std::result::Result<ProviderEntry, String> {
    let content = fs::read_to_string(path).map_err(|e| format!("unreadable: {}", e))?;
    let document: Value =
        serde_yaml::from_str(&content).map_err(|e| format!("invalid YAML: {}", e))?;

    let endpoints = match document.get("endpoints") {
        Some(Value::Array(endpoints)) => endpoints.clone(),
        Some(_) => return Err("`endpoints` is not a list".to_string()),
        None => return Err("missing `endpoints`".to_string()),
    };
    let text = |key: &str| document.get(key).and_then(Value::as_str).map(String::from);

    Ok(ProviderEntry {
        id,
        base_url: text("baseUrl").unwrap_or_default(),
        name: text("name"),
        description: text("description"),
        endpoints,
    })
}
