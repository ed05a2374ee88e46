//! Module descriptor files and declaration extraction.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Suffix of build-module descriptor files in vendor trees.
pub const DEFAULT_DESCRIPTOR_SUFFIX: &str = ".Build.cs";

/// Matches `class <Identifier> : ModuleRules`, with optional leading modifiers.
///
/// Modifiers such as `public` or `sealed` are accepted on purpose, wider than
/// a bare `class` line, since vendor descriptors usually carry them.
static DECLARATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?:(?:public|internal|sealed|partial|abstract)\s+)*class\s+([A-Za-z0-9_]+)\s*:\s*ModuleRules\b",
    )
    .expect("DECLARATION_REGEX must compile")
});

/// A build module declared by a descriptor file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleDescriptor {
    /// Declared module identifier.
    pub name: String,
    /// Descriptor file the declaration was read from.
    pub source_path: PathBuf,
}

/// Extract the module identifier declared on a single line, if any.
pub fn match_declaration(line: &str) -> Option<&str> {
    DECLARATION_REGEX
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Read a descriptor file and return its first declared module name.
///
/// Files that cannot be read, or that contain no declaration, yield `None`.
pub fn extract_module_name(path: &Path) -> Option<String> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            tracing::debug!("Skipping unreadable descriptor {}: {}", path.display(), e);
            return None;
        }
    };

    for line in BufReader::new(file).lines() {
        let Ok(line) = line else {
            tracing::debug!("Stopped reading non-text descriptor {}", path.display());
            return None;
        };
        if let Some(name) = match_declaration(&line) {
            return Some(name.to_string());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn matches_plain_declaration() {
        assert_eq!(
            match_declaration("class OpenEXR : ModuleRules"),
            Some("OpenEXR")
        );
    }

    #[test]
    fn matches_with_modifiers_and_indentation() {
        assert_eq!(
            match_declaration("    public class Imath_3 : ModuleRules"),
            Some("Imath_3")
        );
    }

    #[test]
    fn ignores_other_base_types() {
        assert_eq!(match_declaration("class Foo : TargetRules"), None);
        assert_eq!(match_declaration("class Foo : ModuleRulesHelper"), None);
    }

    #[test]
    fn ignores_commented_declarations() {
        assert_eq!(match_declaration("// class Foo : ModuleRules"), None);
    }

    #[test]
    fn extract_returns_first_match() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("OpenEXR.Build.cs");
        fs::write(
            &path,
            "using UnrealBuildTool;\n\npublic class OpenEXR : ModuleRules\n{\n}\nclass Second : ModuleRules {}\n",
        )
        .unwrap();

        assert_eq!(extract_module_name(&path), Some("OpenEXR".to_string()));
    }

    #[test]
    fn extract_without_declaration_is_none() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Empty.Build.cs");
        fs::write(&path, "// nothing to see here\n").unwrap();

        assert_eq!(extract_module_name(&path), None);
    }

    #[test]
    fn extract_missing_file_is_none() {
        let temp = TempDir::new().unwrap();
        assert_eq!(extract_module_name(&temp.path().join("nope.Build.cs")), None);
    }
}
