//! Capability table discovery and loading.
//!
//! The shared table lives in the plugin directory as `sdkgate.yml`. A
//! sibling `sdkgate.local.yml` (or `<stem>.local.yml` for an explicit table
//! path) is layered on top when present.

use crate::config::merger::merge_layers;
use crate::config::schema::CapabilityTable;
use crate::error::{Result, SdkgateError};
use std::fs;
use std::path::{Path, PathBuf};

/// Default table file name.
pub const TABLE_FILE_NAME: &str = "sdkgate.yml";

/// Table files for one resolve, in merge order.
#[derive(Debug, Clone, PartialEq)]
pub struct TablePaths {
    /// Shared table.
    pub table: PathBuf,

    /// Machine-local overrides, if present.
    pub local: Option<PathBuf>,
}

impl TablePaths {
    /// Discover the table for a plugin directory, or use an explicit path.
    pub fn discover(plugin_dir: &Path, explicit: Option<&Path>) -> Self {
        let table = match explicit {
            Some(path) if path.is_absolute() => path.to_path_buf(),
            Some(path) => plugin_dir.join(path),
            None => plugin_dir.join(TABLE_FILE_NAME),
        };
        let local = Some(local_override_path(&table)).filter(|p| p.is_file());

        Self { table, local }
    }

    /// All existing table files in merge order.
    pub fn all_existing(&self) -> Vec<&PathBuf> {
        std::iter::once(&self.table)
            .filter(|p| p.is_file())
            .chain(self.local.iter())
            .collect()
    }
}

/// `dir/name.yml` → `dir/name.local.yml`
fn local_override_path(table: &Path) -> PathBuf {
    let stem = table
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = table
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "yml".to_string());
    table.with_file_name(format!("{}.local.{}", stem, extension))
}

/// Parse YAML content into a capability table.
pub fn parse_table(content: &str, source_path: &Path) -> Result<CapabilityTable> {
    serde_yaml::from_str(content).map_err(|e| SdkgateError::TableParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load a table file as a raw YAML value (for merging).
pub fn load_table_value(path: &Path) -> Result<serde_yaml::Value> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SdkgateError::TableNotFound {
                path: path.to_path_buf(),
            }
        } else {
            SdkgateError::Io(e)
        }
    })?;

    let value: serde_yaml::Value =
        serde_yaml::from_str(&content).map_err(|e| SdkgateError::TableParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    // An empty file parses as null; treat it as an empty table.
    Ok(if value.is_null() {
        serde_yaml::Value::Mapping(Default::default())
    } else {
        value
    })
}

/// Load a single table file without overlays.
pub fn load_table_file(path: &Path) -> Result<CapabilityTable> {
    let value = load_table_value(path)?;
    serde_yaml::from_value(value).map_err(|e| SdkgateError::TableParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load the shared table and apply the local overlay, if any.
///
/// # Errors
///
/// Returns `TableNotFound` if the shared table does not exist and
/// `TableParseError` if any layer is invalid.
pub fn load_merged_table(paths: &TablePaths) -> Result<CapabilityTable> {
    if !paths.table.is_file() {
        return Err(SdkgateError::TableNotFound {
            path: paths.table.clone(),
        });
    }

    let mut layers = Vec::new();
    for path in paths.all_existing() {
        tracing::debug!("Loading capability table layer {}", path.display());
        layers.push(load_table_value(path)?);
    }

    let merged = merge_layers(&layers);
    serde_yaml::from_value(merged).map_err(|e| SdkgateError::TableParseError {
        path: paths.table.clone(),
        message: e.to_string(),
    })
}
