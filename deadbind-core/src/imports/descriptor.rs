//! Import declaration decomposition.
//!
//! Splits one `import` declaration into its default binding, namespace
//! binding and named specifiers, each with the exact byte range it occupies
//! in the source so the planner can cut or rebuild individual segments.

use std::ops::Range;

use swc_ecma_ast::{ImportDecl, ImportSpecifier, ModuleDecl, ModuleExportName, ModuleItem, Program};

use crate::error::{DeadbindError, DeadbindResult};
use crate::fix::include_semicolon;
use crate::parse::SyntaxTree;

/// A default (`React`) or namespace (`* as utils`) binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBinding {
    pub local: String,
    /// For a namespace import this starts at the `*`.
    pub range: Range<usize>,
}

/// One entry of a `{ ... }` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedSpecifier {
    pub local: String,
    /// The exported name when the specifier is aliased (`source as local`).
    pub imported: Option<String>,
    pub range: Range<usize>,
}

impl NamedSpecifier {
    /// Original specifier text, alias form and `type` modifier included.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.range.clone()]
    }
}

/// The braces segment of an import clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedImports {
    /// From `{` through `}` inclusive.
    pub braces: Range<usize>,
    pub specifiers: Vec<NamedSpecifier>,
}

/// An import declaration that has a clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDescriptor {
    /// Whole declaration, including a trailing `;` when present.
    pub range: Range<usize>,
    /// The module specifier literal, quotes included.
    pub source_range: Range<usize>,
    pub type_only: bool,
    pub default: Option<ImportBinding>,
    pub namespace: Option<ImportBinding>,
    pub named: Option<NamedImports>,
}

impl ImportDescriptor {
    /// Decomposes `decl`. Returns `Ok(None)` for side-effect-only imports
    /// (`import './polyfill'`), which are never touched.
    pub fn from_decl(tree: &SyntaxTree, decl: &ImportDecl) -> DeadbindResult<Option<Self>> {
        let source = tree.source();
        let range = include_semicolon(source, tree.range(decl.span));
        let source_range = tree.range(decl.src.span);
        if source_range.start < range.start || source_range.end > range.end {
            return Err(DeadbindError::range(format!(
                "module specifier at {}..{} lies outside its declaration",
                source_range.start, source_range.end
            )));
        }
        let clause = range.start..source_range.start;

        let mut default = None;
        let mut namespace = None;
        let mut specifiers = Vec::new();

        for spec in &decl.specifiers {
            match spec {
                ImportSpecifier::Default(d) => {
                    default = Some(ImportBinding {
                        local: d.local.sym.to_string(),
                        range: tree.range(d.local.span),
                    });
                }
                ImportSpecifier::Namespace(ns) => {
                    let local = tree.range(ns.local.span);
                    let star = source[clause.start..local.start]
                        .rfind('*')
                        .map(|i| clause.start + i)
                        .ok_or_else(|| {
                            DeadbindError::range(format!(
                                "no `*` before namespace binding `{}`",
                                ns.local.sym
                            ))
                        })?;
                    namespace = Some(ImportBinding {
                        local: ns.local.sym.to_string(),
                        range: star..local.end,
                    });
                }
                ImportSpecifier::Named(named) => {
                    let mut spec_range = tree.range(named.span);
                    if named.is_type_only && !source[spec_range.clone()].starts_with("type") {
                        if let Some(i) = source[clause.start..spec_range.start].rfind("type") {
                            spec_range.start = clause.start + i;
                        }
                    }
                    specifiers.push(NamedSpecifier {
                        local: named.local.sym.to_string(),
                        imported: named.imported.as_ref().map(|name| match name {
                            ModuleExportName::Ident(ident) => ident.sym.to_string(),
                            ModuleExportName::Str(lit) => tree.slice(lit.span).to_string(),
                        }),
                        range: spec_range,
                    });
                }
            }
        }

        let named = match find_braces(source, &clause) {
            Some(braces) => Some(NamedImports { braces, specifiers }),
            None if specifiers.is_empty() => None,
            None => {
                return Err(DeadbindError::range(format!(
                    "named specifiers without braces in import at {}..{}",
                    range.start, range.end
                )))
            }
        };

        if default.is_none() && namespace.is_none() && named.is_none() {
            return Ok(None);
        }

        Ok(Some(Self {
            range,
            source_range,
            type_only: decl.type_only,
            default,
            namespace,
            named,
        }))
    }

    /// Every local name this declaration binds.
    pub fn local_names(&self) -> impl Iterator<Item = (&str, &Range<usize>)> {
        self.default
            .iter()
            .chain(self.namespace.iter())
            .map(|b| (b.local.as_str(), &b.range))
            .chain(
                self.named
                    .iter()
                    .flat_map(|n| n.specifiers.iter())
                    .map(|s| (s.local.as_str(), &s.range)),
            )
    }
}

/// Locates `{ ... }` inside an import clause.
fn find_braces(source: &str, clause: &Range<usize>) -> Option<Range<usize>> {
    let text = &source[clause.clone()];
    let open = text.find('{')?;
    let close = text[open..].find('}')? + open;
    Some(clause.start + open..clause.start + close + 1)
}

/// Top-level import declarations in source order.
pub fn top_level_imports(tree: &SyntaxTree) -> Vec<&ImportDecl> {
    match tree.program() {
        Program::Module(module) => module
            .body
            .iter()
            .filter_map(|item| match item {
                ModuleItem::ModuleDecl(ModuleDecl::Import(decl)) => Some(decl),
                _ => None,
            })
            .collect(),
        Program::Script(_) => Vec::new(),
    }
}
