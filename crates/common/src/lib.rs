//! Common types and utilities for the subnet registry OpenAPI tooling
//!
//! This crate contains the provider data model, the OpenAPI document model,
//! error types, and the schema engine (reference resolution, normalization,
//! and example synthesis) shared by the forward and reverse converters.

pub mod model;
pub mod openapi;
pub mod schema;

pub use model::{
    AuthDescriptor, EndpointDescriptor, ExampleKind, ExampleSource, HttpMethod, ParamLocation,
    ParamType, Parameter, ProviderDocument, ProviderEntry, ProviderId,
};
pub use openapi::OpenApiDocument;

use thiserror::Error;

/// Errors that can occur while converting between provider documents and OpenAPI
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RegistryError::Parse("missing endpoints".to_string());
        assert_eq!(err.to_string(), "Parse error: missing endpoints");
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: RegistryError = json_err.into();
        assert!(matches!(err, RegistryError::Json(_)));
    }
}
