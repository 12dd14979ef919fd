//! Provider discovery for the subnet registry
//!
//! Walks a registry tree laid out as `<root>/<id>/api.yml`, loads every
//! provider document found under a numeric directory, and looks up the
//! human-curated examples stored next to it.
//!
//! # Examples
//!
//! ```no_run
//! use registry_openapi_collector::{DirectoryExampleSource, ProviderCollector};
//!
//! let collection = ProviderCollector::new("./subnets").collect().expect("Walk failed");
//! let examples = DirectoryExampleSource::new("./subnets");
//!
//! println!("Found {} providers", collection.providers.len());
//! ```

mod collector;
mod examples;

pub use collector::{Collection, ProviderCollector, SkippedFile};
pub use examples::{candidate_directories, DirectoryExampleSource};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a collection run
///
/// Problems with individual files are not errors; they are reported as
/// [`SkippedFile`]s.
#[derive(Debug, Error)]
pub enum CollectorError {
    #[error("Failed to read registry directory: {0}")]
    DirectoryRead(#[from] std::io::Error),

    #[error("Failed to walk registry directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Registry root is not a directory: {0}")]
    NotADirectory(PathBuf),
}

pub type Result<T> = std::result::Result<T, CollectorError>;
