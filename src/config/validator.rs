//! Capability table validation.
//!
//! A malformed table is a bug in the calling build system, so every problem
//! is collected up front and the resolve fails before any probing happens:
//! - Capability ids must be present and unique
//! - Definition names must be valid C identifiers and unique across the table
//! - Constant definitions must be 0 or 1
//! - Platform names must be known and name each platform once
//! - Every capability must have something to probe
//! - Import library names need candidate directories
//! - Staging needs a source and at least one destination
//! - Every `${var}` must reference a builtin or a declared variable

use crate::config::interpolation::extract_variables;
use crate::config::schema::{CapabilityDef, CapabilityTable};
use crate::error::{Result, SdkgateError};
use crate::platform::PlatformId;
use regex::Regex;
use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

/// Builtin variable names available to every table.
pub const BUILTIN_VARIABLES: &[&str] = &["sdk_root", "plugin_dir", "project_dir", "platform"];

static IDENTIFIER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("IDENTIFIER_REGEX must compile")
});

/// Validation error with context.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
    /// Capability id if the error is capability-specific
    pub capability: Option<String>,
}

impl ValidationError {
    fn table(rule: &str, message: String) -> Self {
        Self {
            rule: rule.to_string(),
            message,
            capability: None,
        }
    }

    fn capability(rule: &str, capability: &str, message: String) -> Self {
        Self {
            rule: rule.to_string(),
            message,
            capability: Some(capability.to_string()),
        }
    }
}

/// Validate a table and return all errors.
pub fn validate_table(table: &CapabilityTable) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    errors.extend(validate_definitions(table));
    errors.extend(validate_platforms(table));
    errors.extend(validate_capabilities(table));
    errors.extend(validate_variables(table));

    errors
}

/// Validate a table, failing with every error joined into one message.
///
/// # Errors
///
/// Returns `InvalidTable` when any rule is violated.
pub fn validate(table: &CapabilityTable) -> Result<()> {
    let errors = validate_table(table);
    if errors.is_empty() {
        return Ok(());
    }

    let message = errors
        .iter()
        .map(|e| format!("[{}] {}", e.rule, e.message))
        .collect::<Vec<_>>()
        .join("; ");
    Err(SdkgateError::InvalidTable { message })
}

fn validate_definitions(table: &CapabilityTable) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (name, value) in &table.definitions {
        check_definition_name(name, None, &mut seen, &mut errors);
        if *value > 1 {
            errors.push(ValidationError::table(
                "invalid-definition-value",
                format!("Definition '{}' must be 0 or 1, got {}", name, value),
            ));
        }
    }

    for capability in &table.capabilities {
        for name in capability.definition_names() {
            check_definition_name(name, Some(&capability.id), &mut seen, &mut errors);
        }
    }

    errors
}

fn check_definition_name<'a>(
    name: &'a str,
    capability: Option<&str>,
    seen: &mut HashSet<&'a str>,
    errors: &mut Vec<ValidationError>,
) {
    let error = |rule: &str, message: String| match capability {
        Some(id) => ValidationError::capability(rule, id, message),
        None => ValidationError::table(rule, message),
    };

    if !IDENTIFIER_REGEX.is_match(name) {
        errors.push(error(
            "invalid-definition-name",
            format!("'{}' is not a valid definition name", name),
        ));
    } else if !seen.insert(name) {
        errors.push(error(
            "duplicate-definition",
            format!("Definition '{}' is declared more than once", name),
        ));
    }
}

fn validate_platforms(table: &CapabilityTable) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let mut sections = BTreeSet::new();
    for name in table.platforms.keys() {
        match name.parse::<PlatformId>() {
            Ok(platform) if !sections.insert(platform) => {
                errors.push(ValidationError::table(
                    "duplicate-platform",
                    format!(
                        "Platform section '{}' repeats platform '{}' under another name",
                        name, platform
                    ),
                ));
            }
            Ok(_) => {}
            Err(_) => errors.push(ValidationError::table(
                "unknown-platform",
                format!("Platform section '{}' does not name a known platform", name),
            )),
        }
    }

    for capability in &table.capabilities {
        let mut owners = BTreeSet::new();
        for name in &capability.platforms {
            match name.parse::<PlatformId>() {
                Ok(platform) if !owners.insert(platform) => {
                    errors.push(ValidationError::capability(
                        "duplicate-platform",
                        &capability.id,
                        format!(
                            "Capability '{}' lists platform '{}' more than once",
                            capability.id, platform
                        ),
                    ));
                }
                Ok(_) => {}
                Err(_) => errors.push(ValidationError::capability(
                    "unknown-platform",
                    &capability.id,
                    format!(
                        "Capability '{}' names unknown platform '{}'",
                        capability.id, name
                    ),
                )),
            }
        }
    }

    errors
}

fn validate_capabilities(table: &CapabilityTable) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut ids = HashSet::new();

    for (index, capability) in table.capabilities.iter().enumerate() {
        if capability.id.trim().is_empty() {
            errors.push(ValidationError::table(
                "missing-id",
                format!("Capability #{} has no id", index + 1),
            ));
            continue;
        }
        if !ids.insert(capability.id.as_str()) {
            errors.push(ValidationError::capability(
                "duplicate-capability",
                &capability.id,
                format!("Capability id '{}' is used more than once", capability.id),
            ));
        }
        errors.extend(validate_capability(capability));
    }

    errors
}

fn validate_capability(capability: &CapabilityDef) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let id = capability.id.as_str();

    let has_mandatory = capability.artifacts.iter().any(|a| a.mandatory);
    if !has_mandatory && capability.modules.is_none() {
        errors.push(ValidationError::capability(
            "nothing-to-probe",
            id,
            format!(
                "Capability '{}' needs at least one mandatory artifact or a modules section",
                id
            ),
        ));
    }

    for artifact in &capability.artifacts {
        if artifact.path.trim().is_empty() {
            errors.push(ValidationError::capability(
                "empty-artifact-path",
                id,
                format!(
                    "Artifact '{}' of capability '{}' has no path",
                    artifact.description, id
                ),
            ));
        }
    }

    if let Some(modules) = &capability.modules {
        if modules.prefixes.is_empty() {
            errors.push(ValidationError::capability(
                "empty-module-prefixes",
                id,
                format!("Capability '{}' scans for modules without any prefix", id),
            ));
        }
        let blank = modules
            .prefixes
            .iter()
            .chain(&modules.companions)
            .any(|p| p.trim().is_empty());
        if blank {
            errors.push(ValidationError::capability(
                "empty-module-prefixes",
                id,
                format!(
                    "Capability '{}' has an empty module prefix, which matches every descriptor",
                    id
                ),
            ));
        }
    }

    if let Some(import) = &capability.import_libraries {
        if !import.names.is_empty() && import.candidates.is_empty() {
            errors.push(ValidationError::capability(
                "missing-library-candidates",
                id,
                format!(
                    "Capability '{}' lists import libraries but no candidate directories",
                    id
                ),
            ));
        }
    }

    if let Some(stage) = &capability.stage {
        if stage.source.trim().is_empty() || stage.destinations.is_empty() {
            errors.push(ValidationError::capability(
                "incomplete-stage",
                id,
                format!(
                    "Capability '{}' stages a library without a source or destinations",
                    id
                ),
            ));
        }
    }

    errors
}

/// Every template string in the table.
fn templates(table: &CapabilityTable) -> Vec<(Option<&str>, &str)> {
    let mut out: Vec<(Option<&str>, &str)> = Vec::new();

    for value in table.variables.values() {
        out.push((None, value.as_str()));
    }
    for extras in table.platforms.values() {
        out.extend(extras.ensure_directories.iter().map(|s| (None, s.as_str())));
    }

    for capability in &table.capabilities {
        let id = Some(capability.id.as_str());
        out.extend(capability.artifacts.iter().map(|a| (id, a.path.as_str())));
        if let Some(modules) = &capability.modules {
            out.push((id, modules.root_template()));
        }
        for list in [
            &capability.include_paths,
            &capability.libraries,
            &capability.runtime_dependencies,
        ] {
            out.extend(list.iter().map(|s| (id, s.as_str())));
        }
        if let Some(import) = &capability.import_libraries {
            out.extend(import.candidates.iter().map(|s| (id, s.as_str())));
        }
        if let Some(stage) = &capability.stage {
            out.push((id, stage.source.as_str()));
            out.extend(stage.destinations.iter().map(|s| (id, s.as_str())));
        }
    }

    out
}

fn validate_variables(table: &CapabilityTable) -> Vec<ValidationError> {
    let known: HashSet<&str> = BUILTIN_VARIABLES
        .iter()
        .copied()
        .chain(table.variables.keys().map(String::as_str))
        .collect();

    let mut reported = BTreeSet::new();
    let mut errors = Vec::new();

    for (capability, template) in templates(table) {
        for name in extract_variables(template) {
            if known.contains(name.as_str()) || !reported.insert(name.clone()) {
                continue;
            }
            let message = format!("Unknown variable '${{{}}}' in '{}'", name, template);
            errors.push(match capability {
                Some(id) => ValidationError::capability("unknown-variable", id, message),
                None => ValidationError::table("unknown-variable", message),
            });
        }
    }

    errors
}
