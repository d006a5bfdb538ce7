//! Per-declaration import edit planning.

use std::ops::Range;

use tracing::{debug, warn};

use crate::fix::{whole_lines, EditPlan, EditSpan};
use crate::imports::descriptor::{top_level_imports, ImportDescriptor, NamedImports, NamedSpecifier};
use crate::parse::SyntaxTree;
use crate::usage::UsedNameSet;

/// Default-import names that are kept even when never referenced.
///
/// The classic JSX transform compiles `<div/>` into `React.createElement`,
/// so the binding is live although no identifier names it.
pub const IMPLICIT_IMPORT_NAMES: &[&str] = &["React"];

pub fn is_import_used(used: &UsedNameSet, name: &str) -> bool {
    used.contains(name) || IMPLICIT_IMPORT_NAMES.contains(&name)
}

/// Plans edits for every top-level import in `tree`.
///
/// A declaration whose clause cannot be located exactly is skipped; the
/// rest of the file is still planned.
pub fn plan_unused_imports(tree: &SyntaxTree, used: &UsedNameSet) -> EditPlan {
    let mut plan = EditPlan::default();
    for decl in top_level_imports(tree) {
        match ImportDescriptor::from_decl(tree, decl) {
            Ok(Some(desc)) => plan.extend(plan_import_edits(tree.source(), &desc, used)),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "skipping import declaration"),
        }
    }
    plan
}

/// Edits for a single declaration. Empty when every binding is used.
pub fn plan_import_edits(source: &str, desc: &ImportDescriptor, used: &UsedNameSet) -> Vec<EditSpan> {
    let default_used = desc
        .default
        .as_ref()
        .map_or(true, |d| is_import_used(used, &d.local));
    let erase_declaration = || EditSpan::delete(whole_lines(source, desc.range.clone()));

    if let Some(named) = &desc.named {
        let kept: Vec<&NamedSpecifier> = named
            .specifiers
            .iter()
            .filter(|spec| is_import_used(used, &spec.local))
            .collect();

        if kept.is_empty() {
            return match &desc.default {
                Some(default) if default_used => {
                    vec![EditSpan::delete(default.range.end..named.braces.end)]
                }
                Some(_) => vec![erase_declaration()],
                // `import {} from 'm'` loads the module for its side effects.
                None if named.specifiers.is_empty() => Vec::new(),
                None => vec![erase_declaration()],
            };
        }

        if kept.len() < named.specifiers.len() {
            let braces = rebuild_braces(source, named, &kept);
            return if default_used {
                vec![EditSpan::replace(named.braces.clone(), braces)]
            } else {
                vec![EditSpan::replace(
                    desc.range.clone(),
                    rebuild_declaration(source, desc, &braces),
                )]
            };
        }

        if !default_used {
            let braces = &source[named.braces.clone()];
            return vec![EditSpan::replace(
                desc.range.clone(),
                rebuild_declaration(source, desc, braces),
            )];
        }
        return Vec::new();
    }

    if let Some(namespace) = &desc.namespace {
        let namespace_used = is_import_used(used, &namespace.local);
        return match (&desc.default, namespace_used) {
            (Some(default), false) if default_used => {
                vec![EditSpan::delete(default.range.end..namespace.range.end)]
            }
            (_, false) => vec![erase_declaration()],
            (Some(default), true) if !default_used => {
                vec![EditSpan::delete(default.range.start..namespace.range.start)]
            }
            _ => Vec::new(),
        };
    }

    if !default_used {
        debug!(range = ?desc.range, "unused default import");
        return vec![erase_declaration()];
    }
    Vec::new()
}

/// Joins the kept specifiers' original text into a new `{ ... }` segment,
/// following the original's padding and line layout.
fn rebuild_braces(source: &str, named: &NamedImports, kept: &[&NamedSpecifier]) -> String {
    let inner = &source[named.braces.start + 1..named.braces.end - 1];
    let texts: Vec<&str> = kept.iter().map(|spec| spec.text(source)).collect();

    if inner.contains('\n') {
        let indent = kept
            .first()
            .map_or("  ", |spec| line_indent(source, spec.range.clone()));
        let closing = line_indent(source, named.braces.end - 1..named.braces.end);
        let trailing_comma = named
            .specifiers
            .last()
            .map_or(false, |last| source[last.range.end..named.braces.end - 1].trim_start().starts_with(','));

        let mut out = String::from("{\n");
        for (i, text) in texts.iter().enumerate() {
            out.push_str(indent);
            out.push_str(text);
            if i + 1 < texts.len() || trailing_comma {
                out.push(',');
            }
            out.push('\n');
        }
        out.push_str(closing);
        out.push('}');
        return out;
    }

    if inner.starts_with(char::is_whitespace) {
        format!("{{ {} }}", texts.join(", "))
    } else {
        format!("{{{}}}", texts.join(", "))
    }
}

/// A declaration with only the named clause. Everything from the module
/// specifier on, including attributes and the semicolon, is copied.
fn rebuild_declaration(source: &str, desc: &ImportDescriptor, braces: &str) -> String {
    let keyword = if desc.type_only { "import type " } else { "import " };
    format!(
        "{keyword}{braces} from {}",
        &source[desc.source_range.start..desc.range.end]
    )
}

/// Leading whitespace of the line `range` starts on, or `""` when code
/// precedes it on that line.
fn line_indent(source: &str, range: Range<usize>) -> &str {
    let line_start = source[..range.start].rfind('\n').map_or(0, |i| i + 1);
    let prefix = &source[line_start..range.start];
    if prefix.trim().is_empty() {
        prefix
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{parse_source, FileKind};

    fn plan(src: &str, used: &[&str]) -> String {
        let tree = parse_source(src, FileKind::Ts).unwrap();
        let used: UsedNameSet = used.iter().copied().collect();
        plan_unused_imports(&tree, &used).apply(src).unwrap()
    }

    #[test]
    fn test_all_named_unused_default_used() {
        assert_eq!(
            plan("import D, { a, b } from 'm';\n", &["D"]),
            "import D from 'm';\n"
        );
    }

    #[test]
    fn test_all_named_unused_default_unused() {
        assert_eq!(plan("import D, { a } from 'm';\nx;\n", &[]), "x;\n");
    }

    #[test]
    fn test_some_named_used_keeps_alias_form_and_order() {
        assert_eq!(
            plan("import { a, b as bee, c } from 'm';\n", &["c", "bee"]),
            "import { b as bee, c } from 'm';\n"
        );
    }

    #[test]
    fn test_unpadded_braces_stay_unpadded() {
        assert_eq!(plan("import {a, b} from 'm';\n", &["b"]), "import {b} from 'm';\n");
    }

    #[test]
    fn test_default_unused_drops_default_from_rebuilt_declaration() {
        assert_eq!(
            plan("import D, { a, b } from \"m\";\n", &["b"]),
            "import { b } from \"m\";\n"
        );
        assert_eq!(
            plan("import D, { a, b } from 'm'\n", &["a", "b"]),
            "import { a, b } from 'm'\n"
        );
    }

    #[test]
    fn test_multiline_named_list() {
        let src = "import {\n  a,\n  b,\n  c,\n} from 'm';\n";
        assert_eq!(plan(src, &["a", "c"]), "import {\n  a,\n  c,\n} from 'm';\n");
    }

    #[test]
    fn test_namespace_cases() {
        assert_eq!(plan("import * as ns from 'm';\n", &[]), "");
        assert_eq!(plan("import D, * as ns from 'm';\n", &["D"]), "import D from 'm';\n");
        assert_eq!(plan("import D, * as ns from 'm';\n", &["ns"]), "import * as ns from 'm';\n");
        assert_eq!(plan("import D, * as ns from 'm';\n", &["D", "ns"]), "import D, * as ns from 'm';\n");
    }

    #[test]
    fn test_default_only() {
        assert_eq!(plan("import D from 'm';\nD();\n", &["D"]), "import D from 'm';\nD();\n");
        assert_eq!(plan("import D from 'm';\n", &[]), "");
    }

    #[test]
    fn test_react_default_is_implicitly_used() {
        assert_eq!(
            plan("import React, { useState } from 'react';\n", &[]),
            "import React from 'react';\n"
        );
    }

    #[test]
    fn test_type_only_import_keeps_type_keyword() {
        assert_eq!(
            plan("import type { A, B } from './t';\n", &["B"]),
            "import type { B } from './t';\n"
        );
    }

    #[test]
    fn test_empty_braces_without_default_untouched() {
        assert_eq!(plan("import {} from 'm';\n", &[]), "import {} from 'm';\n");
    }

    #[test]
    fn test_declaration_sharing_a_line_is_cut_exactly() {
        assert_eq!(
            plan("import a from 'a'; import b from 'b';\n", &["b"]),
            " import b from 'b';\n"
        );
    }
}
