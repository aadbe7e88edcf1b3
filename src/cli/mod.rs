//! Interactive shell and script runner around the estimate wizard.

pub mod commands;
pub mod core;
pub mod help;
pub mod io;
pub mod output;
pub mod registry;
mod shell;
pub mod wizard_runner;

pub use shell::{run_cli, SCRIPT_ENV};
