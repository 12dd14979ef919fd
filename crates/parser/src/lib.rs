//! OpenAPI import for the subnet registry
//!
//! This crate converts an externally published OpenAPI 3.0 document into the
//! registry's own provider description (`api.yml`) plus synthesized example
//! request and response payloads for every endpoint.
//!
//! ## Import Strategy
//!
//! For each path and operation:
//! - `{param}` placeholders are stripped into a canonical internal path
//!   (`/twitter/{id}` → `/twitter/id`), then an optional path map is applied
//! - request and response schemas are resolved against
//!   `components.schemas` and normalized
//! - auth is inferred once from `components.securitySchemes` and copied onto
//!   every endpoint
//! - query parameters are kept for GET operations only

pub mod openapi;

pub use openapi::{
    infer_auth, to_internal_path, EndpointFixture, ImportedProvider, OpenApiParser, PathMap,
};

use registry_openapi_common::Result;

/// Load an OpenAPI document from a URL or file path and import it
///
/// # Arguments
/// * `source` - URL (anything starting with `http`) or local file path
/// * `path_map` - fragment replacements applied to internal paths
///
/// # Returns
/// * `ImportedProvider` - the provider document and per-endpoint fixtures
pub fn import_openapi(source: &str, path_map: PathMap) -> Result<ImportedProvider> {
    let parser = OpenApiParser::from_source(source)?.with_path_map(path_map);
    Ok(parser.parse())
}
