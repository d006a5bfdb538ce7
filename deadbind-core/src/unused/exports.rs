//! Exported-name collection.
//!
//! Cross-file reachability is not checked: anything the module exports is
//! assumed to be used elsewhere.

use std::collections::HashSet;

use swc_ecma_ast::{
    Decl, DefaultDecl, ExportSpecifier, Ident, ModuleDecl, ModuleExportName, ModuleItem, Program,
};
use swc_ecma_visit::{Visit, VisitWith};

use crate::parse::SyntaxTree;
use crate::usage::binding_idents;

#[derive(Debug, Clone, Default)]
pub struct ExportedNames {
    names: HashSet<String>,
}

impl ExportedNames {
    pub fn collect(tree: &SyntaxTree) -> Self {
        let mut names = HashSet::new();
        let Program::Module(module) = tree.program() else {
            return Self { names };
        };

        for item in &module.body {
            let ModuleItem::ModuleDecl(decl) = item else {
                continue;
            };
            match decl {
                // `export { a } from './b'` re-exports, it binds nothing local.
                ModuleDecl::ExportNamed(named) if named.src.is_none() => {
                    for spec in &named.specifiers {
                        if let ExportSpecifier::Named(spec) = spec {
                            if let ModuleExportName::Ident(orig) = &spec.orig {
                                names.insert(orig.sym.to_string());
                            }
                        }
                    }
                }
                ModuleDecl::ExportDecl(export) => match &export.decl {
                    Decl::Fn(f) => {
                        names.insert(f.ident.sym.to_string());
                    }
                    Decl::Class(c) => {
                        names.insert(c.ident.sym.to_string());
                    }
                    Decl::Var(var) => {
                        let mut idents = Vec::new();
                        for declarator in &var.decls {
                            binding_idents(&declarator.name, &mut idents);
                        }
                        names.extend(idents.into_iter().map(|ident| ident.sym.to_string()));
                    }
                    _ => {}
                },
                ModuleDecl::ExportDefaultDecl(default) => match &default.decl {
                    DefaultDecl::Fn(f) => {
                        if let Some(ident) = &f.ident {
                            names.insert(ident.sym.to_string());
                        }
                    }
                    DefaultDecl::Class(c) => {
                        if let Some(ident) = &c.ident {
                            names.insert(ident.sym.to_string());
                        }
                    }
                    DefaultDecl::TsInterfaceDecl(_) => {}
                },
                ModuleDecl::ExportDefaultExpr(default) => {
                    default.expr.visit_with(&mut IdentNames(&mut names));
                }
                ModuleDecl::TsExportAssignment(assign) => {
                    assign.expr.visit_with(&mut IdentNames(&mut names));
                }
                _ => {}
            }
        }
        Self { names }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Every identifier referenced by a default-export expression.
struct IdentNames<'a>(&'a mut HashSet<String>);

impl Visit for IdentNames<'_> {
    fn visit_ident(&mut self, n: &Ident) {
        self.0.insert(n.sym.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{parse_source, FileKind};

    fn exported(src: &str) -> ExportedNames {
        ExportedNames::collect(&parse_source(src, FileKind::Ts).unwrap())
    }

    #[test]
    fn test_export_forms() {
        let names = exported(
            "function a() {}\nfunction b() {}\nexport { a, b as bee };\nexport function c() {}\nexport const d = 1, { e } = o;\nexport default withRouter(App);\n",
        );
        for name in ["a", "b", "c", "d", "e", "withRouter", "App"] {
            assert!(names.contains(name), "missing {name}");
        }
        assert!(!names.contains("bee"));
    }

    #[test]
    fn test_default_function_declaration() {
        assert!(exported("export default function main() {}\n").contains("main"));
    }

    #[test]
    fn test_reexports_bind_nothing() {
        assert!(exported("export { x } from './x';\n").is_empty());
    }

    #[test]
    fn test_export_assignment() {
        assert!(exported("function handler() {}\nexport = handler;\n").contains("handler"));
    }

    #[test]
    fn test_script_has_no_exports() {
        let tree = parse_source("function f() {}\n", FileKind::Js).unwrap();
        assert!(ExportedNames::collect(&tree).is_empty());
    }
}
