//! OpenAPI 3.0 document import
//!
//! ## Usage
//! ```rust,ignore
//! use registry_openapi_parser::openapi::{OpenApiParser, PathMap};
//!
//! let parser = OpenApiParser::from_source("https://apis.datura.ai/openapi.json")?
//!     .with_path_map(PathMap::from_json(r#"{"desearch/ai/search": "search"}"#)?);
//! let imported = parser.parse();
//! ```

mod auth;
mod converter;
mod parser;
mod paths;

pub use auth::infer_auth;
pub use converter::{convert_openapi_to_provider, EndpointFixture, ImportedProvider};
pub use parser::OpenApiParser;
pub use paths::{to_internal_path, PathMap};
