//! deadbind-core: unused-binding cleanup for JavaScript and TypeScript.
//!
//! Finds imports, variables, functions and parameters that are never
//! referenced in a file and removes or annotates them with minimal text
//! edits, leaving every other byte of the file as it was.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use deadbind_core::prelude::*;
//!
//! let tree = parse_source(source, FileKind::Tsx)?;
//! if let Some(cleaned) = remove_unused_imports(&tree)? {
//!     std::fs::write(path, cleaned)?;
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`parse`]: swc parsing and span-to-offset mapping
//! - [`usage`]: declaration sites and the used-name set
//! - [`imports`]: import decomposition and removal planning
//! - [`unused`]: unused variables, parameters and functions
//! - [`params`]: parameter trimming
//! - [`fix`]: edit spans, plans and text transformations
//! - [`engine`]: the remove-imports, handle-variables and clean-all operations
//! - [`builder`]: fluent builder for running over files on disk
//! - [`scan`]: parallel file discovery
//! - [`error`]: typed error handling

pub mod builder;
pub mod config;
pub mod engine;
pub mod error;
pub mod fix;
pub mod imports;
pub mod logging;
pub mod params;
pub mod parse;
pub mod prelude;
pub mod report;
pub mod scan;
pub mod unused;
pub mod usage;

// Error types
pub use error::{DeadbindError, DeadbindResult, IoResultExt};

// Parsing
pub use parse::{parse_file, parse_named, parse_source, FileKind, SyntaxTree};

// Operations
pub use engine::{
    analyze, analyze_source, clean_all, handle_unused_variables, plan_unused_variables,
    remove_unused_imports, BindingKind, Finding, Operation,
};

// Edits
pub use fix::{collapse_blank_lines, comment_out, EditPlan, EditSpan, FUNCTION_MARKER, VARIABLE_MARKER};

// Configuration
pub use config::{load_config, DeadbindConfig, EngineOptions, OutputConfig, UnusedVariableAction, CONFIG_FILE};

// Builder API
pub use builder::{CheckResult, Deadbind, FileFindings, FileOutcome, FileStatus, RunResult};

// Logging
pub use logging::{init_structured_logging, log_file_error, log_info, log_warn};

// Reporting
pub use report::{format_findings, print_check_plain, print_json, print_run_plain};

// File scanning
pub use scan::{gather_source_files, gather_source_files_with_excludes};

#[cfg(test)]
mod tests;
