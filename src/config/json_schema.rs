//! JSON Schema for the capability table.
//!
//! Draft-07, so editors with YAML language servers can complete and check
//! `sdkgate.yml` files.

use serde_json::{json, Value};

/// Generates JSON Schema for capability tables.
pub struct SchemaGenerator;

impl SchemaGenerator {
    /// Create a new schema generator.
    pub fn new() -> Self {
        Self
    }

    /// Generate the complete JSON Schema for sdkgate.yml.
    pub fn generate(&self) -> Value {
        json!({
            "$schema": "http://json-schema.org/draft-07/schema#",
            "title": "sdkgate capability table",
            "description": "Optional third-party capabilities of a native plugin",
            "type": "object",
            "properties": {
                "plugin": {
                    "type": "string",
                    "description": "Plugin name used in diagnostics"
                },
                "descriptor_suffix": {
                    "type": "string",
                    "default": ".Build.cs",
                    "description": "File name suffix of module descriptors"
                },
                "variables": {
                    "type": "object",
                    "description": "Path variables usable as ${name}",
                    "additionalProperties": { "type": "string" }
                },
                "definitions": {
                    "type": "object",
                    "description": "Definitions emitted with a fixed value",
                    "additionalProperties": { "type": "integer", "enum": [0, 1] }
                },
                "platforms": self.platforms_schema(),
                "capabilities": self.capabilities_schema()
            },
            "additionalProperties": false
        })
    }

    fn platform_names(&self) -> Value {
        json!(["win64", "linux", "linuxarm64", "mac"])
    }

    fn string_list(&self, description: &str) -> Value {
        json!({
            "type": "array",
            "items": { "type": "string" },
            "description": description
        })
    }

    /// Unconditional per-platform extras.
    fn platforms_schema(&self) -> Value {
        json!({
            "type": "object",
            "description": "Dependencies every build for a platform receives",
            "propertyNames": { "enum": self.platform_names() },
            "additionalProperties": {
                "type": "object",
                "properties": {
                    "dependencies": self.string_list("Extra module dependencies"),
                    "system_libraries": self.string_list("System libraries to link"),
                    "ensure_directories": self.string_list("Directories created before linking")
                },
                "additionalProperties": false
            }
        })
    }

    fn capabilities_schema(&self) -> Value {
        json!({
            "type": "array",
            "description": "Optional capabilities, in priority order",
            "items": {
                "type": "object",
                "required": ["id", "definition"],
                "properties": {
                    "id": { "type": "string", "description": "Unique identifier" },
                    "definition": {
                        "type": "string",
                        "pattern": "^[A-Za-z_][A-Za-z0-9_]*$",
                        "description": "Compile-time definition set to 1 or 0"
                    },
                    "also_define": self.string_list("Definitions that follow the same verdict"),
                    "description": { "type": "string" },
                    "platforms": {
                        "type": "array",
                        "items": { "enum": self.platform_names() },
                        "description": "Owning platforms (all when omitted)"
                    },
                    "artifacts": self.artifacts_schema(),
                    "modules": {
                        "type": "object",
                        "required": ["prefixes"],
                        "properties": {
                            "root": {
                                "type": "string",
                                "default": "${sdk_root}",
                                "description": "Tree to scan for descriptors"
                            },
                            "prefixes": self.string_list("Descriptor name prefixes"),
                            "companions": self.string_list("Modules added only when enabled")
                        },
                        "additionalProperties": false
                    },
                    "dependencies": self.string_list("Module dependencies when enabled"),
                    "include_paths": self.string_list("Include paths when enabled"),
                    "libraries": self.string_list("Libraries linked when enabled"),
                    "delay_load": self.string_list("Shared libraries to delay-load"),
                    "runtime_dependencies": self.string_list("Files shipped with the binary"),
                    "import_libraries": {
                        "type": "object",
                        "properties": {
                            "candidates": self.string_list("Directories searched in order"),
                            "names": self.string_list("Library file names")
                        },
                        "additionalProperties": false
                    },
                    "stage": {
                        "type": "object",
                        "required": ["source", "destinations"],
                        "properties": {
                            "source": { "type": "string" },
                            "destinations": self.string_list("Directories the source is copied into")
                        },
                        "additionalProperties": false
                    }
                },
                "additionalProperties": false
            }
        })
    }

    fn artifacts_schema(&self) -> Value {
        json!({
            "type": "array",
            "description": "Artifacts that must exist for the capability",
            "items": {
                "type": "object",
                "required": ["kind", "path", "description"],
                "properties": {
                    "kind": { "type": "string", "enum": ["directory", "file"] },
                    "path": { "type": "string" },
                    "description": { "type": "string" },
                    "mandatory": { "type": "boolean", "default": true }
                },
                "additionalProperties": false
            }
        })
    }
}

impl Default for SchemaGenerator {
    fn default() -> Self {
        Self::new()
    }
}
