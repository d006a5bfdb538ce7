//! End-to-end tests over source text and over files on disk.

use crate::prelude::*;
use crate::{BindingKind, FileStatus};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

fn write_file(file: &Path, content: &str) {
    fs::create_dir_all(file.parent().unwrap()).unwrap();
    fs::write(file, content).unwrap();
}

fn setup_temp_project() -> PathBuf {
    let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir()
        .join("deadbind_tests")
        .join(format!("{}_{}", timestamp, id));

    if dir.exists() {
        fs::remove_dir_all(&dir).ok();
    }
    fs::create_dir_all(dir.join("src")).unwrap();
    dir
}

fn imports(src: &str, kind: FileKind) -> Option<String> {
    remove_unused_imports(&parse_source(src, kind).unwrap()).unwrap()
}

fn variables(src: &str, options: EngineOptions) -> Option<String> {
    handle_unused_variables(&parse_source(src, FileKind::Js).unwrap(), &options).unwrap()
}

fn with_trailing(remove: bool) -> EngineOptions {
    EngineOptions {
        remove_trailing_parameters: remove,
        ..EngineOptions::default()
    }
}

const REACT_COMPONENT: &str = "import React, { useState, useEffect, useContext } from 'react';
import { useNavigate } from 'react-router-dom';
import * as utils from './utils';

function C() {
  const [c, s] = useState(0);
  return c;
}
";

#[test]
fn test_scenario_react_imports() {
    assert_eq!(
        imports(REACT_COMPONENT, FileKind::Jsx).unwrap(),
        "import React, { useState } from 'react';

function C() {
  const [c, s] = useState(0);
  return c;
}
"
    );
}

#[test]
fn test_scenario_comment_unused_variable() {
    let src = "function f(){ const data = fetchData(); const config = getConfig(); console.log(data); return data; }\nf();\n";
    assert_eq!(
        variables(src, EngineOptions::default()).unwrap(),
        "function f(){ const data = fetchData(); // TODO: Unused variable\n// const config = getConfig();\nconsole.log(data); return data; }\nf();\n"
    );
}

const PROCESS_USER: &str = "function processUser(userId, userName, userRole, userAge){ console.log(userName); }\nprocessUser();\n";

#[test]
fn test_scenario_trailing_parameters_removed() {
    assert_eq!(
        variables(PROCESS_USER, with_trailing(true)).unwrap(),
        "function processUser(_userId, userName){ console.log(userName); }\nprocessUser();\n"
    );
}

#[test]
fn test_scenario_trailing_parameters_prefixed() {
    assert_eq!(
        variables(PROCESS_USER, with_trailing(false)).unwrap(),
        "function processUser(_userId, userName, _userRole, _userAge){ console.log(userName); }\nprocessUser();\n"
    );
}

// The scenario inputs below are taken verbatim. Their enclosing function is
// itself never called, so under the comment action it is commented out whole
// and the nested edits are dropped.

const DATA_CONFIG: &str = "function f(){ const data = fetchData(); const config = getConfig(); console.log(data); return data; }";

const PROCESS_USER_ALONE: &str = "function processUser(userId, userName, userRole, userAge){ console.log(userName); }";

fn ignoring(remove_trailing: bool) -> EngineOptions {
    EngineOptions {
        unused_variable_action: UnusedVariableAction::Ignore,
        remove_trailing_parameters: remove_trailing,
    }
}

#[test]
fn test_uncalled_function_is_commented_whole() {
    assert_eq!(
        variables(DATA_CONFIG, EngineOptions::default()).unwrap(),
        "// TODO: Unused function\n// function f(){ const data = fetchData(); const config = getConfig(); console.log(data); return data; }"
    );
    assert_eq!(
        variables(PROCESS_USER_ALONE, with_trailing(true)).unwrap(),
        "// TODO: Unused function\n// function processUser(userId, userName, userRole, userAge){ console.log(userName); }"
    );
}

#[test]
fn test_uncalled_function_parameters_under_ignore() {
    assert_eq!(
        variables(PROCESS_USER_ALONE, ignoring(true)).unwrap(),
        "function processUser(_userId, userName){ console.log(userName); }"
    );
    assert_eq!(
        variables(PROCESS_USER_ALONE, ignoring(false)).unwrap(),
        "function processUser(_userId, userName, _userRole, _userAge){ console.log(userName); }"
    );
    // Nothing to do for `config` without the comment action.
    assert_eq!(variables(DATA_CONFIG, ignoring(true)), None);
}

#[test]
fn test_byte_order_mark_survives_import_removal() {
    assert_eq!(
        imports("\u{feff}import { a, b } from 'm';\na();\n", FileKind::Js).unwrap(),
        "\u{feff}import { a } from 'm';\na();\n"
    );
    assert_eq!(
        imports("\u{feff}import gone from 'gone';\nimport kept from 'kept';\nkept();\n", FileKind::Js).unwrap(),
        "\u{feff}import kept from 'kept';\nkept();\n"
    );
}

#[test]
fn test_byte_order_mark_survives_parameter_trimming() {
    assert_eq!(
        variables("\u{feff}function f(a, b) { return a; }\nf();\n", with_trailing(true)).unwrap(),
        "\u{feff}function f(a) { return a; }\nf();\n"
    );
}

#[test]
fn test_remove_imports_is_idempotent() {
    let once = imports(REACT_COMPONENT, FileKind::Jsx).unwrap();
    assert_eq!(imports(&once, FileKind::Jsx), None);
}

#[test]
fn test_surviving_imports_keep_their_order() {
    let src = "import z from 'z';\nimport { gone } from 'gone';\nimport a from 'a';\nimport { m, n } from 'm';\nuse(z, a, n);\n";
    assert_eq!(
        imports(src, FileKind::Js).unwrap(),
        "import z from 'z';\nimport a from 'a';\nimport { n } from 'm';\nuse(z, a, n);\n"
    );
}

#[test]
fn test_exported_bindings_are_never_touched() {
    let src = "export function api(a) { return a; }\nexport const VERSION = 1;\nfunction internal() {}\nexport { internal };\nexport default function main() {}\n";
    assert_eq!(variables(src, EngineOptions::default()), None);
}

#[test]
fn test_underscore_names_are_never_touched() {
    let src = "const _unused = 1;\nfunction _helper() {}\nfunction g(_event, value) { return value; }\ng();\n";
    for action in [UnusedVariableAction::Comment, UnusedVariableAction::Prefix] {
        let options = EngineOptions {
            unused_variable_action: action,
            remove_trailing_parameters: true,
        };
        assert_eq!(variables(src, options), None, "action {action}");
    }
}

#[test]
fn test_name_collision_hides_unused_variable() {
    // `value` in `a` is dead, but `b` reads a parameter with the same name,
    // and usage is tracked by name.
    let src = "function a() { const value = 1; }\nfunction b(value) { return value; }\na(); b();\n";
    assert_eq!(variables(src, EngineOptions::default()), None);
}

#[test]
fn test_overlapping_plan_applies_nothing() {
    let src = "const first = 1; const second = 2;";
    let plan = EditPlan::new(vec![
        EditSpan::delete(0..16),
        EditSpan::replace(6..11, "renamed"),
    ]);
    let err = plan.apply(src).unwrap_err();
    assert!(matches!(err, DeadbindError::OverlappingEdits { .. }));
    assert!(plan.validate(src).is_err());
}

#[test]
fn test_clean_all_on_component_file() {
    let src = "import React, { useState, useMemo } from 'react';
import { format } from './format';

export function Counter({ start }) {
  const [count, setCount] = useState(start);
  const label = format(count);
  const unused = 42;
  function onClick(event) {
    setCount(count + 1);
  }
  return <button onClick={onClick}>{count}</button>;
}
";
    let out = clean_all(src, FileKind::Jsx, Path::new("Counter.jsx"), &EngineOptions::default())
        .unwrap()
        .unwrap();
    assert_eq!(
        out,
        "import React, { useState } from 'react';
import { format } from './format';

export function Counter({ start }) {
  const [count, setCount] = useState(start);
  // TODO: Unused variable
  // const label = format(count);
  // TODO: Unused variable
  // const unused = 42;
  function onClick(_event) {
    setCount(count + 1);
  }
  return <button onClick={onClick}>{count}</button>;
}
"
    );
}

#[test]
fn test_findings_report() {
    let tree = parse_source(REACT_COMPONENT, FileKind::Jsx).unwrap();
    let findings = analyze(&tree);
    let names: Vec<(BindingKind, &str)> = findings.iter().map(|f| (f.kind, f.name.as_str())).collect();
    assert_eq!(
        names,
        vec![
            (BindingKind::Import, "useEffect"),
            (BindingKind::Import, "useContext"),
            (BindingKind::Import, "useNavigate"),
            (BindingKind::Import, "utils"),
            (BindingKind::Function, "C"),
        ]
    );
}

#[test]
fn test_builder_dry_run_leaves_files() {
    let dir = setup_temp_project();
    let file = dir.join("src/app.ts");
    let original = "import { a, b } from './ab';\na();\n";
    write_file(&file, original);
    write_file(&dir.join("src/clean.js"), "export const x = 1;\n");

    let result = Deadbind::new(&dir)
        .operation(Operation::RemoveImports)
        .dry_run(true)
        .run()
        .unwrap();

    assert_eq!(result.files.len(), 2);
    assert_eq!(result.changed_count(), 1);
    assert_eq!(fs::read_to_string(&file).unwrap(), original);
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_builder_writes_changes() {
    let dir = setup_temp_project();
    let file = dir.join("src/app.ts");
    write_file(&file, "import { a, b } from './ab';\na();\n");

    let result = Deadbind::new(&dir).operation(Operation::RemoveImports).run().unwrap();

    assert_eq!(result.changed_count(), 1);
    assert_eq!(fs::read_to_string(&file).unwrap(), "import { a } from './ab';\na();\n");
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_builder_reports_parse_failures_and_continues() {
    let dir = setup_temp_project();
    write_file(&dir.join("src/broken.js"), "const = ;\n");
    write_file(&dir.join("src/ok.js"), "import x from 'x';\n");

    let result = Deadbind::new(&dir).dry_run(true).run().unwrap();

    assert_eq!(result.failed_count(), 1);
    assert_eq!(result.changed_count(), 1);
    let broken = result.files.iter().find(|f| f.path.ends_with("broken.js")).unwrap();
    assert!(matches!(broken.status, FileStatus::Failed(_)));
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_builder_check_and_ignore_patterns() {
    let dir = setup_temp_project();
    write_file(&dir.join("src/a.js"), "import x from 'x';\n");
    write_file(&dir.join("src/generated/b.js"), "import y from 'y';\n");
    write_file(&dir.join("node_modules/pkg/index.js"), "import z from 'z';\n");

    let result = Deadbind::new(&dir).ignore_patterns(["generated"]).check().unwrap();

    assert_eq!(result.files.len(), 1);
    assert_eq!(result.total_findings(), 1);
    assert!(result.files[0].path.ends_with("a.js"));
    assert_eq!(result.files[0].findings[0].name, "x");
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_builder_uses_config_file() {
    let dir = setup_temp_project();
    write_file(
        &dir.join("deadbind.toml"),
        "unused_variable_action = \"prefix\"\nremove_trailing_parameters = false\n",
    );
    let file = dir.join("src/util.js");
    write_file(&file, "function f(a, b) { const t = 1; return a; }\nf();\n");

    let config = load_config(&dir).unwrap().unwrap();
    Deadbind::new(&dir)
        .with_config(&config)
        .operation(Operation::HandleVariables)
        .run()
        .unwrap();

    assert_eq!(
        fs::read_to_string(&file).unwrap(),
        "function f(a, _b) { const _t = 1; return a; }\nf();\n"
    );
    fs::remove_dir_all(&dir).ok();
}
