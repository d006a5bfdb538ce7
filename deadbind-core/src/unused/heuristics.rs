//! Function exclusion heuristics.
//!
//! Functions a framework calls by convention look unused to a name-based
//! analysis. Each heuristic is a predicate behind [`FunctionExclusion`]; a
//! function matched by any of them is kept. Keeping a dead function is
//! preferred over deleting a live one.

use std::sync::OnceLock;

use regex::Regex;
use swc_ecma_ast::{Function, JSXElement, JSXFragment};
use swc_ecma_visit::{Visit, VisitWith};

/// Decides whether a candidate function must be kept.
pub trait FunctionExclusion: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn excludes(&self, name: &str, function: &Function) -> bool;
}

/// Capitalized functions that render JSX are components.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentHeuristic;

impl FunctionExclusion for ComponentHeuristic {
    fn name(&self) -> &'static str {
        "component"
    }

    fn excludes(&self, name: &str, function: &Function) -> bool {
        if !name.chars().next().is_some_and(char::is_uppercase) {
            return false;
        }
        let mut finder = JsxFinder(false);
        function.body.visit_with(&mut finder);
        finder.0
    }
}

struct JsxFinder(bool);

impl Visit for JsxFinder {
    fn visit_jsx_element(&mut self, _: &JSXElement) {
        self.0 = true;
    }

    fn visit_jsx_fragment(&mut self, _: &JSXFragment) {
        self.0 = true;
    }
}

/// `onSomething` / `handleSomething` event handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct HandlerHeuristic;

fn handler_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    // SAFETY: This regex pattern is hardcoded and covered by the tests below.
    REGEX.get_or_init(|| Regex::new(r"^(?:on|handle)[A-Z]").expect("Hardcoded regex pattern is valid"))
}

impl FunctionExclusion for HandlerHeuristic {
    fn name(&self) -> &'static str {
        "handler"
    }

    fn excludes(&self, name: &str, _: &Function) -> bool {
        handler_regex().is_match(name)
    }
}

pub fn default_exclusions() -> Vec<Box<dyn FunctionExclusion>> {
    vec![Box::new(ComponentHeuristic), Box::new(HandlerHeuristic)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{parse_source, FileKind};
    use swc_ecma_ast::{Decl, ModuleItem, Program, Stmt};

    fn first_function(src: &str) -> Function {
        let tree = parse_source(src, FileKind::Tsx).unwrap();
        let Program::Module(module) = tree.program() else {
            panic!("expected module");
        };
        match &module.body[0] {
            ModuleItem::Stmt(Stmt::Decl(Decl::Fn(f))) => (*f.function).clone(),
            other => panic!("expected function, got {other:?}"),
        }
    }

    #[test]
    fn test_component_needs_capital_and_jsx() {
        let jsx = first_function("function Card() { return <div />; }");
        assert!(ComponentHeuristic.excludes("Card", &jsx));
        assert!(!ComponentHeuristic.excludes("card", &jsx));

        let fragment = first_function("function List() { return cond ? <></> : null; }");
        assert!(ComponentHeuristic.excludes("List", &fragment));

        let plain = first_function("function Build() { return 1; }");
        assert!(!ComponentHeuristic.excludes("Build", &plain));
    }

    #[test]
    fn test_handler_names() {
        let f = first_function("function x() {}");
        assert!(HandlerHeuristic.excludes("onClick", &f));
        assert!(HandlerHeuristic.excludes("handleSubmit", &f));
        assert!(!HandlerHeuristic.excludes("online", &f));
        assert!(!HandlerHeuristic.excludes("handler", &f));
        assert!(!HandlerHeuristic.excludes("doHandleX", &f));
    }

    #[test]
    fn test_default_exclusions() {
        let names: Vec<_> = default_exclusions().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["component", "handler"]);
    }
}
