//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. All output goes through a
//! [`UserInterface`](crate::ui::UserInterface), so commands run unchanged
//! against [`MockUI`](crate::ui::MockUI) in tests.

pub mod check;
pub mod completions;
pub mod dispatcher;
pub mod resolve;
pub mod scan;
pub mod schema;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
