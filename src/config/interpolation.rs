//! Path templates with `${variable}` interpolation.
//!
//! Every path in a capability table may reference builtin variables of the
//! resolve pass or user variables declared under `variables:`.
//!
//! # Syntax
//!
//! - `${variable_name}` - replaced with variable value
//! - `$${escaped}` - produces literal `${escaped}` in output
//! - anything else, including `$(PluginDir)`, passes through verbatim
//!
//! # Builtins
//!
//! - `sdk_root` - third-party SDK tree (empty when not supplied)
//! - `plugin_dir` - plugin directory
//! - `project_dir` - host project directory (empty when not supplied)
//! - `platform` - target platform name

use crate::error::{Result, SdkgateError};
use std::collections::{BTreeMap, HashMap, HashSet};

/// A segment of an interpolated string.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Literal text
    Literal(String),
    /// Variable reference: ${name}
    Variable(String),
}

/// Parse a string containing ${var} interpolations.
pub fn parse_interpolation(input: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut chars = input.chars().peekable();
    let mut current_literal = String::new();

    while let Some(c) = chars.next() {
        if c != '$' {
            current_literal.push(c);
            continue;
        }

        match chars.peek() {
            Some('$') => {
                chars.next();
                if chars.peek() == Some(&'{') {
                    // $${...} -> literal ${...}
                    chars.next();
                    current_literal.push_str("${");
                    for c in chars.by_ref() {
                        current_literal.push(c);
                        if c == '}' {
                            break;
                        }
                    }
                } else {
                    current_literal.push('$');
                }
            }
            Some('{') => {
                chars.next();

                if !current_literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut current_literal)));
                }

                let mut var_name = String::new();
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                    var_name.push(c);
                }

                segments.push(Segment::Variable(var_name.trim().to_string()));
            }
            _ => current_literal.push(c),
        }
    }

    if !current_literal.is_empty() {
        segments.push(Segment::Literal(current_literal));
    }

    segments
}

/// Extract all variable names from an interpolated string.
pub fn extract_variables(input: &str) -> HashSet<String> {
    parse_interpolation(input)
        .into_iter()
        .filter_map(|seg| match seg {
            Segment::Variable(name) => Some(name),
            _ => None,
        })
        .collect()
}

/// Variables available while expanding path templates.
///
/// User variables shadow builtins of the same name.
#[derive(Debug, Default, Clone)]
pub struct InterpolationContext {
    /// Values supplied by the resolve pass (sdk_root, plugin_dir, ...).
    pub builtins: HashMap<String, String>,

    /// Expanded user variables from the capability table.
    pub variables: HashMap<String, String>,

    /// User variables whose expansion went through an empty builtin.
    pub unset: HashSet<String>,
}

impl InterpolationContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a builtin variable.
    pub fn with_builtin(mut self, name: &str, value: &str) -> Self {
        self.builtins.insert(name.to_string(), value.to_string());
        self
    }

    /// Resolve a variable name to its value.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.variables
            .get(name)
            .or_else(|| self.builtins.get(name))
            .map(String::as_str)
    }

    /// Whether a name is known to this context.
    pub fn is_defined(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// Expand the table's user variables, which may reference builtins and
    /// each other in any order.
    ///
    /// # Errors
    ///
    /// Returns `UnknownVariable` for references nobody defines and
    /// `InvalidTable` for circular references.
    pub fn with_variables(mut self, definitions: &BTreeMap<String, String>) -> Result<Self> {
        let mut expansion = Expansion::default();
        for name in definitions.keys() {
            let mut stack = Vec::new();
            expand_variable(name, definitions, &self, &mut expansion, &mut stack)?;
        }
        self.variables = expansion.values;
        self.unset = expansion.unset;
        Ok(self)
    }
}

#[derive(Default)]
struct Expansion {
    values: HashMap<String, String>,
    unset: HashSet<String>,
}

fn expand_variable(
    name: &str,
    definitions: &BTreeMap<String, String>,
    context: &InterpolationContext,
    expansion: &mut Expansion,
    stack: &mut Vec<String>,
) -> Result<String> {
    if let Some(value) = expansion.values.get(name) {
        return Ok(value.clone());
    }

    if stack.iter().any(|s| s == name) {
        stack.push(name.to_string());
        return Err(SdkgateError::InvalidTable {
            message: format!("circular variable reference: {}", stack.join(" → ")),
        });
    }

    let Some(template) = definitions.get(name) else {
        return context
            .builtins
            .get(name)
            .cloned()
            .ok_or_else(|| SdkgateError::UnknownVariable {
                name: name.to_string(),
                input: stack
                    .last()
                    .and_then(|s| definitions.get(s))
                    .cloned()
                    .unwrap_or_default(),
            });
    };

    stack.push(name.to_string());
    let mut value = String::new();
    let mut unset = false;
    for segment in parse_interpolation(template) {
        match segment {
            Segment::Literal(text) => value.push_str(&text),
            Segment::Variable(var) => {
                let part = expand_variable(&var, definitions, context, expansion, stack)?;
                if definitions.contains_key(&var) {
                    unset |= expansion.unset.contains(&var);
                } else {
                    unset |= part.is_empty();
                }
                value.push_str(&part);
            }
        }
    }
    stack.pop();

    if unset {
        expansion.unset.insert(name.to_string());
    }
    expansion.values.insert(name.to_string(), value.clone());
    Ok(value)
}

/// Resolve all variables in an interpolated string.
///
/// # Errors
///
/// Returns `UnknownVariable` if any variable is not found in the context.
pub fn resolve_string(input: &str, context: &InterpolationContext) -> Result<String> {
    let mut result = String::new();

    for segment in parse_interpolation(input) {
        match segment {
            Segment::Literal(text) => result.push_str(&text),
            Segment::Variable(name) => {
                let value = context
                    .resolve(&name)
                    .ok_or_else(|| SdkgateError::UnknownVariable {
                        name: name.clone(),
                        input: input.to_string(),
                    })?;
                result.push_str(value);
            }
        }
    }

    Ok(result)
}

/// Whether a template depends on a variable that is defined but empty,
/// directly or through a user variable built on one.
///
/// Output directories built on an unset builtin (no project directory, no
/// SDK root) would land in the filesystem root, so callers skip them.
pub fn references_unset(input: &str, context: &InterpolationContext) -> bool {
    parse_interpolation(input).iter().any(|seg| match seg {
        Segment::Variable(name) => {
            context.unset.contains(name) || context.resolve(name).is_some_and(str::is_empty)
        }
        Segment::Literal(_) => false,
    })
}
