//! Core application functionality
//!
//! This module contains the application plumbing around the generator:
//! - CLI parsing and validation
//! - The JSON settings file
//! - The error taxonomy
//! - Running variants and compiling fonts

pub mod cli;
pub mod config_file;
pub mod errors;
pub mod platform;
pub mod runner;

// Re-export commonly used items
pub use cli::CliArgs;
pub use config_file::ConfigFile;
pub use errors::{GenerationError, Result};
pub use runner::run_app;
