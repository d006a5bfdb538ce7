//! Unused declaration finder.
//!
//! A variable declarator or parameter is unused when its name is absent
//! from the [`UsedNameSet`] and does not start with `_`. Nesting depth does
//! not matter.

use std::collections::HashSet;
use std::ops::Range;

use swc_common::{Span, Spanned};
use swc_ecma_ast::{
    ArrowExpr, BlockStmt, ClassMethod, Constructor, Decl, ExportDecl, Function, Ident, MethodKind,
    ModuleDecl, ModuleItem, ParamOrTsParamProp, Pat, PrivateMethod, Stmt, TsModuleDecl, VarDecl,
};
use swc_ecma_visit::{Visit, VisitWith};

use crate::fix::include_semicolon;
use crate::parse::SyntaxTree;
use crate::usage::UsedNameSet;

/// Underscore-prefixed names are intentionally unused.
pub fn is_unused_name(used: &UsedNameSet, name: &str) -> bool {
    !name.starts_with('_') && !used.contains(name)
}

/// A flagged variable declarator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnusedVariable {
    pub name: String,
    pub ident: Range<usize>,
    /// The enclosing declaration statement, keyword through `;`. Only set
    /// when the declaration is a statement and every declarator in it is
    /// flagged, so commenting it out removes nothing live.
    pub statement: Option<Range<usize>>,
}

/// One parameter position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSlot {
    /// Full parameter text: decorators, pattern, type annotation, default.
    pub range: Range<usize>,
    /// `None` for parameters that are never flagged (destructuring, `this`,
    /// parameter properties).
    pub binding: Option<ParamBinding>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamBinding {
    pub name: String,
    pub ident_start: usize,
    pub unused: bool,
}

impl ParamSlot {
    pub fn is_unused(&self) -> bool {
        self.binding.as_ref().is_some_and(|b| b.unused)
    }
}

/// The parameters of one function that has at least one unused parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionParams {
    pub function: Range<usize>,
    pub params: Vec<ParamSlot>,
}

impl FunctionParams {
    /// Index of the last parameter that is not unused.
    pub fn last_used_index(&self) -> Option<usize> {
        self.params.iter().rposition(|slot| !slot.is_unused())
    }

    pub fn unused(&self) -> impl Iterator<Item = &ParamBinding> {
        self.params
            .iter()
            .filter_map(|slot| slot.binding.as_ref().filter(|b| b.unused))
    }
}

#[derive(Debug, Clone, Default)]
pub struct UnusedDeclarations {
    pub variables: Vec<UnusedVariable>,
    pub parameters: Vec<FunctionParams>,
}

impl UnusedDeclarations {
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty() && self.parameters.is_empty()
    }
}

pub fn find_unused_declarations(tree: &SyntaxTree, used: &UsedNameSet) -> UnusedDeclarations {
    let mut finder = Finder {
        tree,
        used,
        statement_vars: HashSet::new(),
        exported_vars: HashSet::new(),
        setters: HashSet::new(),
        out: UnusedDeclarations::default(),
    };
    tree.program().visit_with(&mut finder);
    finder.out
}

struct Finder<'a> {
    tree: &'a SyntaxTree,
    used: &'a UsedNameSet,
    /// Var declarations that sit directly in a statement list. A declaration
    /// that is the body of `if`, a loop or a label is not one of them.
    statement_vars: HashSet<Span>,
    exported_vars: HashSet<Span>,
    /// Function nodes of setters, whose single parameter is mandatory.
    setters: HashSet<Span>,
    out: UnusedDeclarations,
}

impl Finder<'_> {
    fn flag_var_decl(&mut self, decl: &VarDecl) {
        if decl.declare || self.exported_vars.contains(&decl.span) {
            return;
        }

        let flagged: Vec<(String, Range<usize>)> = decl
            .decls
            .iter()
            .filter_map(|d| match &d.name {
                Pat::Ident(binding) if is_unused_name(self.used, &binding.id.sym) => {
                    Some((binding.id.sym.to_string(), self.tree.range(binding.id.span)))
                }
                _ => None,
            })
            .collect();
        if flagged.is_empty() {
            return;
        }

        let statement = (self.statement_vars.contains(&decl.span) && flagged.len() == decl.decls.len())
            .then(|| include_semicolon(self.tree.source(), self.tree.range(decl.span)));

        self.out
            .variables
            .extend(flagged.into_iter().map(|(name, ident)| UnusedVariable {
                name,
                ident,
                statement: statement.clone(),
            }));
    }

    fn slot(&self, outer: Span, pat: &Pat) -> ParamSlot {
        let mut range = self.tree.range(outer);
        let extent = self.pat_extent(pat);
        range.start = range.start.min(extent.start);
        range.end = range.end.max(extent.end);

        let binding = flaggable_ident(pat).map(|ident| ParamBinding {
            name: ident.sym.to_string(),
            ident_start: self.tree.range(ident.span).start,
            unused: is_unused_name(self.used, &ident.sym),
        });
        ParamSlot { range, binding }
    }

    /// Pattern span widened over its type annotation.
    fn pat_extent(&self, pat: &Pat) -> Range<usize> {
        let mut range = self.tree.range(pat.span());
        let type_ann = match pat {
            Pat::Ident(binding) => binding.type_ann.as_ref(),
            Pat::Rest(rest) => rest.type_ann.as_ref(),
            Pat::Array(array) => array.type_ann.as_ref(),
            Pat::Object(object) => object.type_ann.as_ref(),
            _ => None,
        };
        if let Some(ann) = type_ann {
            range.end = range.end.max(self.tree.range(ann.span).end);
        }
        range
    }

    fn record(&mut self, function: Span, params: Vec<ParamSlot>) {
        if params.iter().any(ParamSlot::is_unused) {
            self.out.parameters.push(FunctionParams {
                function: self.tree.range(function),
                params,
            });
        }
    }
}

/// The identifier a parameter binds, when the parameter may be flagged.
fn flaggable_ident(pat: &Pat) -> Option<&Ident> {
    let ident = match pat {
        Pat::Ident(binding) => &binding.id,
        Pat::Assign(assign) => match &*assign.left {
            Pat::Ident(binding) => &binding.id,
            _ => return None,
        },
        Pat::Rest(rest) => match &*rest.arg {
            Pat::Ident(binding) => &binding.id,
            _ => return None,
        },
        _ => return None,
    };
    (&*ident.sym != "this").then_some(ident)
}

impl Visit for Finder<'_> {
    fn visit_stmts(&mut self, n: &[Stmt]) {
        for stmt in n {
            if let Stmt::Decl(Decl::Var(var)) = stmt {
                self.statement_vars.insert(var.span);
            }
            stmt.visit_with(self);
        }
    }

    fn visit_module_items(&mut self, n: &[ModuleItem]) {
        for item in n {
            if let ModuleItem::Stmt(Stmt::Decl(Decl::Var(var))) = item {
                self.statement_vars.insert(var.span);
            }
            item.visit_with(self);
        }
    }

    fn visit_module_decl(&mut self, n: &ModuleDecl) {
        if let ModuleDecl::ExportDecl(ExportDecl {
            decl: Decl::Var(var),
            ..
        }) = n
        {
            self.exported_vars.insert(var.span);
        }
        n.visit_children_with(self);
    }

    fn visit_ts_module_decl(&mut self, n: &TsModuleDecl) {
        // Ambient declarations have no runtime bindings to clean.
        if !n.declare {
            n.visit_children_with(self);
        }
    }

    fn visit_var_decl(&mut self, n: &VarDecl) {
        self.flag_var_decl(n);
        n.visit_children_with(self);
    }

    fn visit_class_method(&mut self, n: &ClassMethod) {
        if n.kind == MethodKind::Setter {
            self.setters.insert(n.function.span);
        }
        n.visit_children_with(self);
    }

    fn visit_private_method(&mut self, n: &PrivateMethod) {
        if n.kind == MethodKind::Setter {
            self.setters.insert(n.function.span);
        }
        n.visit_children_with(self);
    }

    fn visit_function(&mut self, n: &Function) {
        if let Some(body) = &n.body {
            if !self.setters.contains(&n.span) && !uses_arguments(body) {
                let params = n.params.iter().map(|p| self.slot(p.span, &p.pat)).collect();
                self.record(n.span, params);
            }
        }
        n.visit_children_with(self);
    }

    fn visit_arrow_expr(&mut self, n: &ArrowExpr) {
        let params = n.params.iter().map(|p| self.slot(p.span(), p)).collect();
        self.record(n.span, params);
        n.visit_children_with(self);
    }

    fn visit_constructor(&mut self, n: &Constructor) {
        if let Some(body) = &n.body {
            if !uses_arguments(body) {
                let params = n
                    .params
                    .iter()
                    .map(|p| match p {
                        ParamOrTsParamProp::Param(param) => self.slot(param.span, &param.pat),
                        ParamOrTsParamProp::TsParamProp(prop) => ParamSlot {
                            range: self.tree.range(prop.span),
                            binding: None,
                        },
                    })
                    .collect();
                self.record(n.span, params);
            }
        }
        n.visit_children_with(self);
    }
}

/// Whether a function body reads `arguments`, which makes every parameter
/// position observable. Arrow functions share the enclosing `arguments`;
/// nested functions do not.
fn uses_arguments(body: &BlockStmt) -> bool {
    let mut finder = ArgumentsFinder(false);
    body.visit_with(&mut finder);
    finder.0
}

struct ArgumentsFinder(bool);

impl Visit for ArgumentsFinder {
    fn visit_ident(&mut self, n: &Ident) {
        if &*n.sym == "arguments" {
            self.0 = true;
        }
    }

    fn visit_function(&mut self, _: &Function) {}

    fn visit_constructor(&mut self, _: &Constructor) {}
}
