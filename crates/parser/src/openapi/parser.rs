//! OpenAPI document loader

use super::converter::{convert_openapi_to_provider, ImportedProvider};
use super::paths::PathMap;
use registry_openapi_common::schema::ExampleSynthesizer;
use registry_openapi_common::{OpenApiDocument, RegistryError, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// OpenAPI document parser
///
/// Reads an OpenAPI 3.0 document from a file, a string, or a URL and imports
/// it as a registry provider.
pub struct OpenApiParser {
    /// Loaded OpenAPI document
    document: OpenApiDocument,

    /// Fragment replacements for internal paths
    path_map: PathMap,
}

impl OpenApiParser {
    /// Load from a URL when `source` starts with `http`, else from a file
    pub fn from_source(source: &str) -> Result<Self> {
        if source.starts_with("http") {
            Self::from_url(source)
        } else {
            Self::from_file(source)
        }
    }

    /// Load OpenAPI document from file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        debug!(path = %path.as_ref().display(), "Loading OpenAPI document from file");
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RegistryError::Parse(format!(
                "Failed to read OpenAPI file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_json(&content)
    }

    /// Fetch OpenAPI document over HTTP
    ///
    /// A single blocking request; transport errors and non-2xx statuses fail.
    pub fn from_url(url: &str) -> Result<Self> {
        debug!(url, "Fetching OpenAPI document");
        let response = reqwest::blocking::get(url)
            .and_then(|r| r.error_for_status())
            .map_err(|e| RegistryError::Fetch(format!("Failed to fetch {}: {}", url, e)))?;
        let content = response
            .text()
            .map_err(|e| RegistryError::Fetch(format!("Failed to read body of {}: {}", url, e)))?;

        Self::from_json(&content)
    }

    /// Parse OpenAPI document from a JSON string
    ///
    /// YAML documents are accepted too.
    pub fn from_json(json: &str) -> Result<Self> {
        let document: OpenApiDocument = match serde_json::from_str(json) {
            Ok(document) => document,
            Err(json_err) => serde_yaml::from_str(json).map_err(|_| {
                RegistryError::Parse(format!("Failed to parse OpenAPI JSON: {}", json_err))
            })?,
        };

        Ok(Self::from_document(document))
    }

    /// Wrap an already parsed document
    pub fn from_document(document: OpenApiDocument) -> Self {
        Self {
            document,
            path_map: PathMap::default(),
        }
    }

    /// Set fragment replacements for internal paths
    pub fn with_path_map(mut self, path_map: PathMap) -> Self {
        self.path_map = path_map;
        self
    }

    /// Import the document as a provider description with example fixtures
    pub fn parse(&self) -> ImportedProvider {
        convert_openapi_to_provider(&self.document, &self.path_map, &ExampleSynthesizer::new())
    }

    /// Get reference to the underlying OpenAPI document
    pub fn document(&self) -> &OpenApiDocument {
        &self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_minimal_openapi() {
        let openapi_json = r#"{
            "openapi": "3.0.0",
            "info": {
                "title": "Test API",
                "version": "1.0.0"
            },
            "paths": {}
        }"#;

        let parser = OpenApiParser::from_json(openapi_json).unwrap();
        assert_eq!(parser.document().openapi, "3.0.0");
        assert_eq!(parser.document().info.title, "Test API");
        assert!(parser.parse().document.endpoints.is_empty());
    }

    #[test]
    fn test_parse_yaml_document() {
        let yaml = "openapi: 3.0.1\ninfo:\n  title: Yaml API\n  version: '2'\npaths: {}\n";
        let parser = OpenApiParser::from_json(yaml).unwrap();
        assert_eq!(parser.document().info.title, "Yaml API");
    }

    #[test]
    fn test_invalid_document_is_error() {
        let result = OpenApiParser::from_json("[1, 2");
        assert!(matches!(result, Err(RegistryError::Parse(_))));
    }

    #[test]
    fn test_from_source_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"openapi": "3.0.0", "info": {{"title": "File API", "version": "1"}}, "paths": {{}}}}"#
        )
        .unwrap();

        let parser = OpenApiParser::from_source(file.path().to_str().unwrap()).unwrap();
        assert_eq!(parser.document().info.title, "File API");
    }
}
