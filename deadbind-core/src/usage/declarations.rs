//! Declaration-site detection.
//!
//! Variable-declarator names, parameter names and function-declaration names
//! are declarations. Every other identifier occurrence is a usage.

use std::collections::HashSet;

use swc_common::Span;
use swc_ecma_ast::{
    ArrowExpr, FnDecl, Ident, ImportDecl, ObjectPatProp, Param, Pat, SetterProp, TsParamProp,
    TsParamPropParam, VarDeclarator,
};
use swc_ecma_visit::{Visit, VisitWith};

use crate::parse::SyntaxTree;

/// Identifiers (by span) that name a declaration.
#[derive(Debug, Default)]
pub struct DeclarationSites {
    spans: HashSet<Span>,
}

impl DeclarationSites {
    /// Walks the whole tree once, skipping import declarations.
    pub fn collect(tree: &SyntaxTree) -> Self {
        let mut visitor = DeclarationVisitor::default();
        tree.program().visit_with(&mut visitor);
        Self {
            spans: visitor.spans,
        }
    }

    pub fn contains(&self, ident: &Ident) -> bool {
        self.spans.contains(&ident.span)
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

/// Collects every identifier a pattern binds, in source order.
///
/// Default values and computed keys are not bindings and are not descended.
pub fn binding_idents<'a>(pat: &'a Pat, out: &mut Vec<&'a Ident>) {
    match pat {
        Pat::Ident(binding) => out.push(&binding.id),
        Pat::Array(array) => {
            for elem in array.elems.iter().flatten() {
                binding_idents(elem, out);
            }
        }
        Pat::Rest(rest) => binding_idents(&rest.arg, out),
        Pat::Object(object) => {
            for prop in &object.props {
                match prop {
                    ObjectPatProp::KeyValue(kv) => binding_idents(&kv.value, out),
                    ObjectPatProp::Assign(assign) => out.push(&assign.key.id),
                    ObjectPatProp::Rest(rest) => binding_idents(&rest.arg, out),
                }
            }
        }
        Pat::Assign(assign) => binding_idents(&assign.left, out),
        Pat::Invalid(_) | Pat::Expr(_) => {}
    }
}

#[derive(Default)]
struct DeclarationVisitor {
    spans: HashSet<Span>,
}

impl DeclarationVisitor {
    fn record_pat(&mut self, pat: &Pat) {
        let mut idents = Vec::new();
        binding_idents(pat, &mut idents);
        self.spans.extend(idents.into_iter().map(|ident| ident.span));
    }
}

impl Visit for DeclarationVisitor {
    fn visit_import_decl(&mut self, _: &ImportDecl) {}

    fn visit_var_declarator(&mut self, n: &VarDeclarator) {
        self.record_pat(&n.name);
        n.visit_children_with(self);
    }

    fn visit_param(&mut self, n: &Param) {
        self.record_pat(&n.pat);
        n.visit_children_with(self);
    }

    fn visit_arrow_expr(&mut self, n: &ArrowExpr) {
        for pat in &n.params {
            self.record_pat(pat);
        }
        n.visit_children_with(self);
    }

    fn visit_setter_prop(&mut self, n: &SetterProp) {
        self.record_pat(&n.param);
        n.visit_children_with(self);
    }

    fn visit_ts_param_prop(&mut self, n: &TsParamProp) {
        match &n.param {
            TsParamPropParam::Ident(binding) => {
                self.spans.insert(binding.id.span);
            }
            TsParamPropParam::Assign(assign) => self.record_pat(&assign.left),
        }
        n.visit_children_with(self);
    }

    fn visit_fn_decl(&mut self, n: &FnDecl) {
        self.spans.insert(n.ident.span);
        n.visit_children_with(self);
    }
}
