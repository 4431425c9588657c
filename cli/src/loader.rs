//! Loading flag catalogs from YAML or JSON files.

use std::fs;
use std::path::{Path, PathBuf};

use argtally_core::FlagCatalog;
use thiserror::Error;
use tracing::debug;

/// Errors from reading a catalog file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid JSON catalog '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid YAML catalog '{}': {source}", path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

/// Returns `true` if the path has a `.yaml` or `.yml` extension.
fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
}

/// Reads a catalog file. YAML is chosen by extension, anything else is
/// read as JSON. The catalog is not validated here.
pub fn load_catalog(path: &Path) -> Result<FlagCatalog, LoadError> {
    let raw = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let catalog: FlagCatalog = if is_yaml(path) {
        serde_yaml::from_str(&raw).map_err(|source| LoadError::Yaml {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        serde_json::from_str(&raw).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })?
    };

    debug!(path = %path.display(), definitions = catalog.len(), "Loaded flag catalog");
    Ok(catalog)
}
