//! Unused top-level function declarations.

use std::collections::HashSet;
use std::ops::Range;

use swc_ecma_ast::{Decl, FnDecl, ModuleItem, Program, Stmt};
use tracing::debug;

use crate::parse::SyntaxTree;
use crate::unused::exports::ExportedNames;
use crate::unused::finder::is_unused_name;
use crate::unused::heuristics::{default_exclusions, FunctionExclusion};
use crate::usage::UsedNameSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnusedFunction {
    pub name: String,
    pub ident: Range<usize>,
    /// From `function` (or `async`) through the closing brace.
    pub range: Range<usize>,
}

/// Unused top-level functions, with exports and the default heuristics
/// filtered out.
pub fn find_unused_functions(tree: &SyntaxTree, used: &UsedNameSet) -> Vec<UnusedFunction> {
    let exported = ExportedNames::collect(tree);
    find_unused_functions_with(tree, used, &exported, &default_exclusions())
}

pub fn find_unused_functions_with(
    tree: &SyntaxTree,
    used: &UsedNameSet,
    exported: &ExportedNames,
    exclusions: &[Box<dyn FunctionExclusion>],
) -> Vec<UnusedFunction> {
    let functions = top_level_functions(tree);

    // Overload signatures share the implementation's name; leave the group alone.
    let overloaded: HashSet<&str> = functions
        .iter()
        .copied()
        .filter(|f| f.function.body.is_none())
        .map(|f| &*f.ident.sym)
        .collect();

    functions
        .into_iter()
        .filter(|f| !f.declare && f.function.body.is_some())
        .filter(|f| {
            let name = &*f.ident.sym;
            is_unused_name(used, name) && !exported.contains(name) && !overloaded.contains(name)
        })
        .filter(|f| {
            let name = &*f.ident.sym;
            match exclusions.iter().find(|e| e.excludes(name, &f.function)) {
                Some(exclusion) => {
                    debug!(function = name, heuristic = exclusion.name(), "keeping function");
                    false
                }
                None => true,
            }
        })
        .map(|f| UnusedFunction {
            name: f.ident.sym.to_string(),
            ident: tree.range(f.ident.span),
            range: tree.range(f.function.span),
        })
        .collect()
}

fn top_level_functions(tree: &SyntaxTree) -> Vec<&FnDecl> {
    let stmts: Box<dyn Iterator<Item = &Stmt>> = match tree.program() {
        Program::Module(module) => Box::new(module.body.iter().filter_map(|item| match item {
            ModuleItem::Stmt(stmt) => Some(stmt),
            ModuleItem::ModuleDecl(_) => None,
        })),
        Program::Script(script) => Box::new(script.body.iter()),
    };
    stmts
        .filter_map(|stmt| match stmt {
            Stmt::Decl(Decl::Fn(f)) => Some(f),
            _ => None,
        })
        .collect()
}
