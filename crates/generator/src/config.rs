//! Document header configuration
//!
//! Everything the aggregated document says about itself rather than about
//! the providers: title, version, servers, and the global security scheme.

use registry_openapi_common::openapi::{Info, SecurityScheme, Server};
use registry_openapi_common::{RegistryError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Header settings for the generated OpenAPI document
///
/// Every field has a default, so a YAML file only needs the fields it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocsConfig {
    pub title: String,
    pub version: String,
    pub description: String,

    /// Server URLs, in the order they are listed
    pub servers: Vec<String>,

    /// Key of the scheme under `components.securitySchemes`
    pub security_scheme_name: String,

    /// Scheme applied as global security
    pub security_scheme: SecurityScheme,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            title: "Bitmind API Oracle Docs".to_string(),
            version: "v1".to_string(),
            description: "Bitmind Oracle API Documentation.".to_string(),
            servers: vec![
                "https://api.bitmind.ai/oracle/v1".to_string(),
                "https://staging-api.bitmind.ai/oracle/v1".to_string(),
                "http://localhost:3000/prod/oracle/v1".to_string(),
                "http://localhost:3000/staging/oracle/v1".to_string(),
            ],
            security_scheme_name: "bearerAuth".to_string(),
            security_scheme: SecurityScheme::http_bearer(
                Some("apiKey"),
                Some("API Key in Bearer format"),
            ),
        }
    }
}

impl DocsConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            RegistryError::Parse(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        serde_yaml::from_str(&content).map_err(|e| {
            RegistryError::Parse(format!("Failed to parse config YAML from {:?}: {}", path, e))
        })
    }

    pub(crate) fn info(&self) -> Info {
        Info {
            title: self.title.clone(),
            version: self.version.clone(),
            description: Some(self.description.clone()),
        }
    }

    pub(crate) fn server_list(&self) -> Vec<Server> {
        self.servers
            .iter()
            .map(|url| Server {
                url: url.clone(),
                description: None,
            })
            .collect()
    }

    /// `[{<scheme name>: []}]`
    pub(crate) fn security_requirement(&self) -> Vec<BTreeMap<String, Vec<String>>> {
        vec![BTreeMap::from([(
            self.security_scheme_name.clone(),
            Vec::new(),
        )])]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = DocsConfig::default();
        assert_eq!(config.title, "Bitmind API Oracle Docs");
        assert_eq!(config.servers.len(), 4);
        assert_eq!(config.security_scheme.scheme.as_deref(), Some("bearer"));
        assert_eq!(config.security_scheme.bearer_format.as_deref(), Some("apiKey"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "title: Registry Docs\nservers:\n  - https://example.com/v2").unwrap();

        let config = DocsConfig::from_file(file.path()).unwrap();
        assert_eq!(config.title, "Registry Docs");
        assert_eq!(config.servers, vec!["https://example.com/v2".to_string()]);
        assert_eq!(config.version, "v1");
        assert_eq!(config.security_scheme_name, "bearerAuth");
    }

    #[test]
    fn test_missing_file_is_error() {
        let result = DocsConfig::from_file(Path::new("/nonexistent/docs.yml"));
        assert!(matches!(result, Err(RegistryError::Parse(_))));
    }
}
