//! Used-name collection.
//!
//! Walks the tree a second time, after declaration sites are known, and
//! records the text of every identifier that is not a declaration site and
//! does not sit inside an import declaration. Property names, JSX attribute
//! names and object keys are recorded as well.

use std::collections::HashSet;

use swc_ecma_ast::{Ident, IdentName, ImportDecl};
use swc_ecma_visit::{Visit, VisitWith};

use crate::parse::SyntaxTree;
use crate::usage::declarations::DeclarationSites;

/// Names referenced somewhere in the file.
#[derive(Debug, Clone, Default)]
pub struct UsedNameSet {
    names: HashSet<String>,
}

impl UsedNameSet {
    /// Runs the declaration walk and the usage walk over `tree`.
    pub fn collect(tree: &SyntaxTree) -> Self {
        let sites = DeclarationSites::collect(tree);
        Self::collect_with(tree, &sites)
    }

    pub fn collect_with(tree: &SyntaxTree, sites: &DeclarationSites) -> Self {
        let mut visitor = UsageVisitor {
            sites,
            names: HashSet::with_capacity(64),
        };
        tree.program().visit_with(&mut visitor);
        Self {
            names: visitor.names,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn insert(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for UsedNameSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

struct UsageVisitor<'a> {
    sites: &'a DeclarationSites,
    names: HashSet<String>,
}

impl Visit for UsageVisitor<'_> {
    fn visit_import_decl(&mut self, _: &ImportDecl) {}

    fn visit_ident(&mut self, n: &Ident) {
        if !self.sites.contains(n) {
            self.names.insert(n.sym.to_string());
        }
    }

    fn visit_ident_name(&mut self, n: &IdentName) {
        self.names.insert(n.sym.to_string());
    }
}
