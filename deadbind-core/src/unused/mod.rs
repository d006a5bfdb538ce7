//! Unused variable, parameter and function detection.
//!
//! # Components
//!
//! - `finder`: unused variable declarators and per-function parameter groups
//! - `exports`: names the module exports, which are always treated as used
//! - `heuristics`: predicates that keep functions called by a framework
//! - `functions`: unused top-level function declarations

pub mod exports;
pub mod finder;
pub mod functions;
pub mod heuristics;

pub use exports::ExportedNames;
pub use finder::{
    find_unused_declarations, is_unused_name, FunctionParams, ParamBinding, ParamSlot,
    UnusedDeclarations, UnusedVariable,
};
pub use functions::{find_unused_functions, find_unused_functions_with, UnusedFunction};
pub use heuristics::{default_exclusions, ComponentHeuristic, FunctionExclusion, HandlerHeuristic};
