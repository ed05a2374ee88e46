//! Third-party module discovery.
//!
//! The [`ModuleScanner`] walks a vendor source tree looking for descriptor
//! files whose name starts with a given prefix, and reads the module
//! identifier each one declares. Vendor trees do not spell SDK names
//! consistently, so callers usually query several prefix variants through
//! [`ModuleScanner::scan_variants`] and get the union back.
//!
//! # Example
//!
//! ```
//! use sdkgate::scanner::ModuleScanner;
//! use std::fs;
//! use tempfile::TempDir;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(
//!     temp.path().join("FooBar.Build.cs"),
//!     "public class FooBar : ModuleRules {}",
//! )
//! .unwrap();
//!
//! let modules = ModuleScanner::new().scan(temp.path(), "Foo");
//! assert_eq!(modules[0].name, "FooBar");
//! ```

pub mod descriptor;

pub use descriptor::{
    extract_module_name, match_declaration, ModuleDescriptor, DEFAULT_DESCRIPTOR_SUFFIX,
};

use std::collections::BTreeMap;
use std::path::Path;

use walkdir::WalkDir;

/// Scans vendor trees for module descriptor files.
#[derive(Debug, Clone)]
pub struct ModuleScanner {
    suffix: String,
}

impl Default for ModuleScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleScanner {
    /// Create a scanner for the default `.Build.cs` descriptor suffix.
    pub fn new() -> Self {
        Self::with_suffix(DEFAULT_DESCRIPTOR_SUFFIX)
    }

    /// Create a scanner for a custom descriptor suffix.
    pub fn with_suffix(suffix: &str) -> Self {
        Self {
            suffix: suffix.to_string(),
        }
    }

    /// The descriptor suffix this scanner matches.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Find every module declared under `root` by descriptors named `<prefix>*<suffix>`.
    ///
    /// An empty or nonexistent root yields no modules. Results are sorted by
    /// name with duplicates collapsed.
    pub fn scan(&self, root: &Path, prefix: &str) -> Vec<ModuleDescriptor> {
        let mut found = BTreeMap::new();
        self.collect(root, prefix, &mut found);
        found.into_values().collect()
    }

    /// Run [`scan`](Self::scan) once per prefix and union the results.
    pub fn scan_variants<S: AsRef<str>>(
        &self,
        root: &Path,
        prefixes: &[S],
    ) -> Vec<ModuleDescriptor> {
        let mut found = BTreeMap::new();
        for prefix in prefixes {
            self.collect(root, prefix.as_ref(), &mut found);
        }
        found.into_values().collect()
    }

    fn collect(
        &self,
        root: &Path,
        prefix: &str,
        found: &mut BTreeMap<String, ModuleDescriptor>,
    ) {
        if root.as_os_str().is_empty() || !root.is_dir() {
            tracing::debug!("Module root {} not present, nothing to scan", root.display());
            return;
        }

        let descriptors = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| self.is_descriptor(&entry.file_name().to_string_lossy(), prefix));

        for entry in descriptors {
            let Some(name) = extract_module_name(entry.path()) else {
                continue;
            };
            tracing::debug!("Found module {} in {}", name, entry.path().display());
            found.entry(name.clone()).or_insert_with(|| ModuleDescriptor {
                name,
                source_path: entry.path().to_path_buf(),
            });
        }
    }

    fn is_descriptor(&self, file_name: &str, prefix: &str) -> bool {
        file_name.starts_with(prefix) && file_name.ends_with(&self.suffix)
    }
}

/// Names of a set of descriptors, in order.
pub fn module_names(modules: &[ModuleDescriptor]) -> Vec<String> {
    modules.iter().map(|m| m.name.clone()).collect()
}
