//! On-disk example lookup
//!
//! Curated examples live at `<root>/<id>/examples/<dir>/request.json` and
//! `response.json`, where `<dir>` follows one of several naming conventions
//! used across the registry over time.

use registry_openapi_common::model::ROOT_EXAMPLE_DIR;
use registry_openapi_common::{ExampleKind, ExampleSource, ProviderId};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Example directory names to try for an endpoint path, most specific first
///
/// For `/twitter/post-id` this yields `twitter/post-id`, `twitter_post-id`,
/// `twitter-post-id`, `twitter/post_id`, and `twitter_post_id`. Duplicates
/// are removed. The root path `/` maps to `root`.
pub fn candidate_directories(endpoint_path: &str) -> Vec<String> {
    let clean = endpoint_path.trim_start_matches('/');
    if clean.is_empty() {
        return vec![ROOT_EXAMPLE_DIR.to_string()];
    }
    let candidates = [
        clean.to_string(),
        clean.replace('/', "_"),
        clean.replace('/', "-"),
        clean.replace('-', "_"),
        clean.replace('-', "/").replace('/', "_"),
    ];

    let mut unique: Vec<String> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !candidate.is_empty() && !unique.contains(&candidate) {
            unique.push(candidate);
        }
    }
    unique
}

/// [`ExampleSource`] backed by the registry tree
pub struct DirectoryExampleSource {
    root: PathBuf,
}

impl DirectoryExampleSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ExampleSource for DirectoryExampleSource {
    fn load_example(
        &self,
        provider: ProviderId,
        endpoint_path: &str,
        kind: ExampleKind,
    ) -> Option<Value> {
        let examples_dir = self.root.join(provider.to_string()).join("examples");

        for dir_name in candidate_directories(endpoint_path) {
            let file = examples_dir.join(&dir_name).join(kind.file_name());
            let Ok(content) = fs::read_to_string(&file) else {
                continue;
            };

            match serde_json::from_str(&content) {
                Ok(example) => {
                    debug!(provider = %provider, path = endpoint_path, file = %file.display(), "Loaded example");
                    return Some(example);
                }
                Err(e) => {
                    warn!(file = %file.display(), error = %e, "Ignoring example with invalid JSON");
                }
            }
        }

        None
    }
}
