//! Provider directory output for imported OpenAPI documents

use registry_openapi_common::{ExampleKind, ProviderId, RegistryError, Result};
use registry_openapi_parser::ImportedProvider;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name of a provider document inside its directory
pub const PROVIDER_FILE: &str = "api.yml";

/// Directory holding per-endpoint example fixtures
pub const EXAMPLES_DIR: &str = "examples";

/// Writes imported providers into the registry tree
///
/// Layout:
/// ```text
/// <root>/<id>/api.yml
/// <root>/<id>/examples/<endpoint>/request.json
/// <root>/<id>/examples/<endpoint>/response.json
/// ```
pub struct ProviderWriter {
    root: PathBuf,
}

impl ProviderWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Write the provider document and every fixture, returning the provider
    /// directory
    ///
    /// Existing files with the same names are overwritten. Example lookup is
    /// keyed by path alone, so when several methods share a path only the
    /// first endpoint's fixtures are written.
    pub fn write(&self, id: ProviderId, imported: &ImportedProvider) -> Result<PathBuf> {
        let provider_dir = self.root.join(id.to_string());
        let examples_dir = provider_dir.join(EXAMPLES_DIR);
        create_dir(&examples_dir)?;

        let yaml = serde_yaml::to_string(&imported.document)?;
        write_file(&provider_dir.join(PROVIDER_FILE), yaml)?;

        let mut written = HashSet::new();
        for fixture in &imported.fixtures {
            if !written.insert(fixture.directory.as_str()) {
                warn!(
                    provider = %id,
                    directory = %fixture.directory,
                    "Example directory already written by another endpoint, skipping"
                );
                continue;
            }

            let endpoint_dir = examples_dir.join(&fixture.directory);
            create_dir(&endpoint_dir)?;
            write_json(
                &endpoint_dir.join(ExampleKind::Request.file_name()),
                &fixture.request,
            )?;
            write_json(
                &endpoint_dir.join(ExampleKind::Response.file_name()),
                &fixture.response,
            )?;
            debug!(directory = %endpoint_dir.display(), "Wrote example fixtures");
        }

        Ok(provider_dir)
    }
}

fn create_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| {
        RegistryError::Generation(format!("Failed to create directory {:?}: {}", dir, e))
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    write_file(path, json)
}

fn write_file(path: &Path, content: String) -> Result<()> {
    fs::write(path, content)
        .map_err(|e| RegistryError::Generation(format!("Failed to write {:?}: {}", path, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use registry_openapi_common::{EndpointDescriptor, HttpMethod, ProviderDocument};
    use registry_openapi_parser::EndpointFixture;
    use serde_json::json;
    use tempfile::TempDir;

    fn imported() -> ImportedProvider {
        ImportedProvider {
            document: ProviderDocument {
                base_url: "https://api.example.com".to_string(),
                name: None,
                description: None,
                endpoints: vec![EndpointDescriptor::new("/twitter/user", HttpMethod::Get)],
            },
            fixtures: vec![EndpointFixture {
                directory: "twitter-user".to_string(),
                request: json!({"user": "elonmusk"}),
                response: json!({"success": true}),
            }],
        }
    }

    #[test]
    fn test_write_provider_tree() {
        let temp_dir = TempDir::new().unwrap();
        let writer = ProviderWriter::new(temp_dir.path());

        let provider_dir = writer.write(ProviderId(22), &imported()).unwrap();
        assert_eq!(provider_dir, temp_dir.path().join("22"));

        let yaml = fs::read_to_string(provider_dir.join("api.yml")).unwrap();
        let document: ProviderDocument = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(document, imported().document);

        let request: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(provider_dir.join("examples/twitter-user/request.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(request, json!({"user": "elonmusk"}));
        assert!(provider_dir
            .join("examples/twitter-user/response.json")
            .exists());
    }

    #[test]
    fn test_shared_directory_keeps_first_fixture() {
        let temp_dir = TempDir::new().unwrap();
        let writer = ProviderWriter::new(temp_dir.path());

        let mut provider = imported();
        provider
            .document
            .endpoints
            .push(EndpointDescriptor::new("/twitter/user", HttpMethod::Post));
        provider.fixtures.push(EndpointFixture {
            directory: "twitter-user".to_string(),
            request: json!({"user": "jack"}),
            response: json!({"created": true}),
        });

        let provider_dir = writer.write(ProviderId(4), &provider).unwrap();
        let request: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(provider_dir.join("examples/twitter-user/request.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(request, json!({"user": "elonmusk"}));
    }

    #[test]
    fn test_write_overwrites_existing_files() {
        let temp_dir = TempDir::new().unwrap();
        let writer = ProviderWriter::new(temp_dir.path());
        writer.write(ProviderId(1), &imported()).unwrap();

        let mut updated = imported();
        updated.fixtures[0].response = json!({"count": 3});
        let provider_dir = writer.write(ProviderId(1), &updated).unwrap();

        let response =
            fs::read_to_string(provider_dir.join("examples/twitter-user/response.json")).unwrap();
        assert!(response.contains("\"count\": 3"));
    }
}
