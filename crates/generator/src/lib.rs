//! OpenAPI document generation for the subnet registry
//!
//! This crate turns collected provider documents into one aggregated
//! OpenAPI 3.0 document, and writes imported providers back out as registry
//! directories.

mod assembler;
mod config;
mod writer;

pub use assembler::DocumentGenerator;
pub use config::DocsConfig;
pub use writer::{ProviderWriter, EXAMPLES_DIR, PROVIDER_FILE};

use registry_openapi_common::{ExampleSource, OpenApiDocument, ProviderEntry, Result};
use std::fs;
use std::path::Path;

/// Assemble the document and write it as pretty-printed JSON
///
/// # Arguments
/// * `providers` - collected provider documents, in any order
/// * `examples` - lookup for curated request/response examples
/// * `config` - document header settings
/// * `output` - destination file
pub fn generate_to_file(
    providers: &[ProviderEntry],
    examples: &dyn ExampleSource,
    config: DocsConfig,
    output: &Path,
) -> Result<OpenApiDocument> {
    let document = DocumentGenerator::new(config).generate(providers, examples);

    let mut json = serde_json::to_string_pretty(&document)?;
    json.push('\n');
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, json)?;

    Ok(document)
}
