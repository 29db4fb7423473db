//! Core application functionality
//!
//! This module contains the application plumbing around the pipeline:
//! - CLI parsing and validation
//! - Error types
//! - Platform-specific error reporting

pub mod cli;
pub mod errors;
pub mod platform;

// Re-export commonly used items
pub use cli::CliArgs;
pub use errors::{PipelineError, PipelineResult};
