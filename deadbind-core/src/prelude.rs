//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use deadbind_core::prelude::*;
//! ```

// Core types
pub use crate::error::{DeadbindError, DeadbindResult};
pub use crate::parse::{parse_file, parse_source, FileKind, SyntaxTree};

// Operations
pub use crate::engine::{
    analyze, clean_all, handle_unused_variables, remove_unused_imports, Finding, Operation,
};
pub use crate::fix::{EditPlan, EditSpan};

// Configuration
pub use crate::config::{load_config, DeadbindConfig, EngineOptions, UnusedVariableAction};

// Builder API
pub use crate::builder::{CheckResult, Deadbind, RunResult};
