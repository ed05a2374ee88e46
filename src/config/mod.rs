//! Capability table loading, parsing, and validation.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Deep merging of the local overlay in [`merger`]
//! - Validation in [`validator`]
//! - Path variable interpolation in [`interpolation`]
//! - Editor schema in [`json_schema`]
//!
//! # Example
//!
//! ```
//! use sdkgate::config::{load_merged_table, validate, TablePaths};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(
//!     temp.path().join("sdkgate.yml"),
//!     "capabilities:\n  - id: foo\n    definition: WITH_FOO\n    modules:\n      prefixes: [Foo]\n",
//! )
//! .unwrap();
//!
//! let table = load_merged_table(&TablePaths::discover(temp.path(), None)).unwrap();
//! validate(&table).unwrap();
//! assert_eq!(table.capabilities[0].definition, "WITH_FOO");
//! ```

pub mod interpolation;
pub mod json_schema;
pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

pub use interpolation::{
    extract_variables, parse_interpolation, references_unset, resolve_string,
    InterpolationContext, Segment,
};
pub use json_schema::SchemaGenerator;
pub use loader::{
    load_merged_table, load_table_file, load_table_value, parse_table, TablePaths,
    TABLE_FILE_NAME,
};
pub use merger::{deep_merge, merge_layers};
pub use schema::{
    ArtifactDef, CapabilityDef, CapabilityTable, ImportLibrariesDef, ModuleSourceDef,
    PlatformExtras, StageDef,
};
pub use validator::{validate, validate_table, ValidationError, BUILTIN_VARIABLES};
