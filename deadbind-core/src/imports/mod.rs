//! Unused import removal.
//!
//! Each top-level import declaration is decomposed into default, namespace
//! and named segments; the planner then cuts only the segments whose names
//! are unused, copying the module specifier verbatim.
//!
//! # Components
//!
//! - `descriptor`: decomposition of one declaration with exact byte ranges
//! - `planner`: the per-declaration edit decisions

pub mod descriptor;
pub mod planner;

pub use descriptor::{top_level_imports, ImportBinding, ImportDescriptor, NamedImports, NamedSpecifier};
pub use planner::{is_import_used, plan_import_edits, plan_unused_imports, IMPLICIT_IMPORT_NAMES};

use tracing::info;

use crate::error::DeadbindResult;
use crate::fix::collapse_blank_lines;
use crate::parse::SyntaxTree;
use crate::usage::UsedNameSet;

/// Removes unused import bindings from `tree`'s source.
///
/// Returns `Ok(None)` when nothing needs to change.
pub fn remove_unused_imports(tree: &SyntaxTree) -> DeadbindResult<Option<String>> {
    let used = UsedNameSet::collect(tree);
    let plan = plan_unused_imports(tree, &used);
    if plan.is_empty() {
        return Ok(None);
    }

    let patched = plan.apply(tree.source())?;
    let text = collapse_blank_lines(&patched).into_owned();
    if text == tree.source() {
        return Ok(None);
    }
    info!(edits = plan.len(), "removed unused imports");
    Ok(Some(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{parse_source, FileKind};

    fn run(src: &str) -> Option<String> {
        let tree = parse_source(src, FileKind::Tsx).unwrap();
        remove_unused_imports(&tree).unwrap()
    }

    #[test]
    fn test_no_change_returns_none() {
        assert_eq!(run("import { a } from 'a';\na();\n"), None);
    }

    #[test]
    fn test_removes_whole_line_and_collapses_blank_runs() {
        let src = "import { a } from 'a';\n\nimport { b } from 'b';\n\n\nb();\n";
        assert_eq!(run(src).unwrap(), "\nimport { b } from 'b';\n\nb();\n");
    }

    #[test]
    fn test_side_effect_import_survives() {
        let src = "import './styles.css';\nimport { x } from 'x';\nrun();\n";
        assert_eq!(run(src).unwrap(), "import './styles.css';\nrun();\n");
    }

    #[test]
    fn test_second_pass_is_idempotent() {
        let src = "import React, { useState, useMemo } from 'react';\nexport const v = useState;\n";
        let once = run(src).unwrap();
        assert_eq!(once, "import React, { useState } from 'react';\nexport const v = useState;\n");
        assert_eq!(run(&once), None);
    }
}
