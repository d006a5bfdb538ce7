//! The host-facing operations.
//!
//! Each operation is a pure function of (source text, syntax tree, options)
//! and returns the rewritten text, or `None` when nothing needs to change.

use std::fmt;
use std::ops::Range;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{EngineOptions, UnusedVariableAction};
use crate::error::{DeadbindError, DeadbindResult};
use crate::fix::{comment_out, EditPlan, EditSpan, FUNCTION_MARKER, VARIABLE_MARKER};
use crate::imports::{is_import_used, top_level_imports, ImportDescriptor};
use crate::params::trim_parameters;
use crate::parse::{parse_named, FileKind, SyntaxTree};
use crate::unused::{find_unused_declarations, find_unused_functions};
use crate::usage::UsedNameSet;

pub use crate::imports::remove_unused_imports;

/// One of the three logical operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    RemoveImports,
    HandleVariables,
    CleanAll,
}

impl Operation {
    pub const ALL: [Operation; 3] = [Self::RemoveImports, Self::HandleVariables, Self::CleanAll];

    /// Human-readable title, used for editor code actions.
    pub fn title(self) -> &'static str {
        match self {
            Self::RemoveImports => "Remove unused imports",
            Self::HandleVariables => "Handle unused variables",
            Self::CleanAll => "Clean all unused code",
        }
    }

    /// Runs the operation on `source`, parsing it first.
    pub fn run(
        self,
        source: &str,
        kind: FileKind,
        path: &Path,
        options: &EngineOptions,
    ) -> DeadbindResult<Option<String>> {
        match self {
            Self::RemoveImports => remove_unused_imports(&parse_named(source, kind, path)?),
            Self::HandleVariables => {
                handle_unused_variables(&parse_named(source, kind, path)?, options)
            }
            Self::CleanAll => clean_all(source, kind, path, options),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RemoveImports => write!(f, "remove-imports"),
            Self::HandleVariables => write!(f, "handle-variables"),
            Self::CleanAll => write!(f, "clean-all"),
        }
    }
}

impl FromStr for Operation {
    type Err = DeadbindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.to_string() == s)
            .ok_or_else(|| DeadbindError::invalid(format!("unknown operation '{s}'")))
    }
}

/// Plans edits for unused variables, functions and parameters.
pub fn plan_unused_variables(tree: &SyntaxTree, options: &EngineOptions) -> EditPlan {
    let source = tree.source();
    let used = UsedNameSet::collect(tree);
    let found = find_unused_declarations(tree, &used);
    let functions = match options.unused_variable_action {
        UnusedVariableAction::Ignore => Vec::new(),
        _ => find_unused_functions(tree, &used),
    };

    let mut plan = EditPlan::default();
    let mut commented: Vec<Range<usize>> = Vec::new();

    match options.unused_variable_action {
        UnusedVariableAction::Comment => {
            for function in &functions {
                plan.push(comment_out(source, function.range.clone(), FUNCTION_MARKER));
                commented.push(function.range.clone());
            }
            for variable in &found.variables {
                let Some(statement) = &variable.statement else {
                    debug!(name = %variable.name, "declaration is not a whole statement, leaving it");
                    continue;
                };
                if commented.iter().any(|outer| outer.start <= statement.start && statement.end <= outer.end) {
                    continue;
                }
                plan.push(comment_out(source, statement.clone(), VARIABLE_MARKER));
                commented.push(statement.clone());
            }
        }
        UnusedVariableAction::Prefix => {
            plan.extend(found.variables.iter().map(|v| EditSpan::insert(v.ident.start, "_")));
            plan.extend(functions.iter().map(|f| EditSpan::insert(f.ident.start, "_")));
        }
        UnusedVariableAction::Ignore => {}
    }

    for group in &found.parameters {
        plan.extend(trim_parameters(source, group, options.remove_trailing_parameters));
    }

    plan.drop_within(&commented);
    plan
}

/// Handles unused variables, functions and parameters per `options`.
pub fn handle_unused_variables(
    tree: &SyntaxTree,
    options: &EngineOptions,
) -> DeadbindResult<Option<String>> {
    let plan = plan_unused_variables(tree, options);
    if plan.is_empty() {
        return Ok(None);
    }
    let text = plan.apply(tree.source())?;
    if text == tree.source() {
        return Ok(None);
    }
    info!(
        edits = plan.len(),
        action = %options.unused_variable_action,
        "handled unused variables"
    );
    Ok(Some(text))
}

/// Import removal followed by variable handling on the result.
///
/// A failure in one step is logged and does not prevent the other.
pub fn clean_all(
    source: &str,
    kind: FileKind,
    path: &Path,
    options: &EngineOptions,
) -> DeadbindResult<Option<String>> {
    let tree = parse_named(source, kind, path)?;

    let (tree, changed) = match remove_unused_imports(&tree) {
        Ok(Some(text)) => match parse_named(&text, kind, path) {
            Ok(reparsed) => (reparsed, true),
            Err(e) => {
                warn!(error = %e, "import cleanup produced unparsable text, discarding it");
                (tree, false)
            }
        },
        Ok(None) => (tree, false),
        Err(e) => {
            warn!(error = %e, "import cleanup failed");
            (tree, false)
        }
    };

    match handle_unused_variables(&tree, options) {
        Ok(Some(text)) => Ok(Some(text)),
        Ok(None) => Ok(changed.then(|| tree.source().to_string())),
        Err(e) => {
            warn!(error = %e, "variable handling failed");
            Ok(changed.then(|| tree.source().to_string()))
        }
    }
}

/// Kind of an unused binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingKind {
    Import,
    Variable,
    Parameter,
    Function,
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Import => write!(f, "import"),
            Self::Variable => write!(f, "variable"),
            Self::Parameter => write!(f, "parameter"),
            Self::Function => write!(f, "function"),
        }
    }
}

/// An unused binding with its location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub kind: BindingKind,
    pub name: String,
    /// 1-indexed
    pub line: usize,
    /// 1-indexed, in characters
    pub column: usize,
    pub start: usize,
    pub end: usize,
}

impl Finding {
    fn new(tree: &SyntaxTree, kind: BindingKind, name: &str, range: Range<usize>) -> Self {
        let (line, column) = tree.line_col(range.start);
        Self {
            kind,
            name: name.to_string(),
            line,
            column,
            start: range.start,
            end: range.end,
        }
    }

    pub fn message(&self) -> String {
        format!("'{}' is an unused {}", self.name, self.kind)
    }
}

/// Every unused binding in the file, in source order.
pub fn analyze(tree: &SyntaxTree) -> Vec<Finding> {
    let used = UsedNameSet::collect(tree);
    let mut findings = Vec::new();

    for decl in top_level_imports(tree) {
        match ImportDescriptor::from_decl(tree, decl) {
            Ok(Some(desc)) => findings.extend(
                desc.local_names()
                    .filter(|(name, _)| !is_import_used(&used, name))
                    .map(|(name, range)| Finding::new(tree, BindingKind::Import, name, range.clone())),
            ),
            Ok(None) => {}
            Err(e) => debug!(error = %e, "skipping import declaration"),
        }
    }

    let found = find_unused_declarations(tree, &used);
    findings.extend(
        found
            .variables
            .iter()
            .map(|v| Finding::new(tree, BindingKind::Variable, &v.name, v.ident.clone())),
    );
    findings.extend(found.parameters.iter().flat_map(|group| group.unused()).map(|b| {
        Finding::new(
            tree,
            BindingKind::Parameter,
            &b.name,
            b.ident_start..b.ident_start + b.name.len(),
        )
    }));
    findings.extend(
        find_unused_functions(tree, &used)
            .iter()
            .map(|f| Finding::new(tree, BindingKind::Function, &f.name, f.ident.clone())),
    );

    findings.sort_by_key(|f| (f.start, f.end));
    findings
}

/// Parses `source` and reports its unused bindings.
pub fn analyze_source(source: &str, kind: FileKind, path: &Path) -> DeadbindResult<Vec<Finding>> {
    Ok(analyze(&parse_named(source, kind, path)?))
}
