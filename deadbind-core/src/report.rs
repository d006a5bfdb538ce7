//! Output formatting - plaintext and JSON.

use std::path::Path;

use serde::Serialize;
use serde_json::json;

use crate::builder::{CheckResult, FileStatus, RunResult};
use crate::engine::Finding;

/// `path:line:column: kind 'name'`, one finding per line.
pub fn format_findings(path: &Path, findings: &[Finding]) -> String {
    findings
        .iter()
        .map(|f| format!("{}:{}:{}: unused {} '{}'", path.display(), f.line, f.column, f.kind, f.name))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prints a check result in plain text format.
pub fn print_check_plain(result: &CheckResult) {
    if result.files.is_empty() {
        println!("No unused bindings found.");
    } else {
        for file in &result.files {
            println!("{}", format_findings(&file.path, &file.findings));
        }
        println!(
            "\n{} unused binding(s) in {} file(s).",
            result.total_findings(),
            result.files.len()
        );
    }
    for failure in &result.failures {
        if let FileStatus::Failed(error) = &failure.status {
            eprintln!("[WARN] {}: {}", failure.path.display(), error);
        }
    }
}

/// Prints a run result in plain text format.
pub fn print_run_plain(result: &RunResult, dry_run: bool) {
    let verb = if dry_run { "would change" } else { "changed" };
    if result.changed_count() == 0 {
        println!("No files {verb}.");
    } else {
        println!("FILES {} ({}):", verb.to_uppercase(), result.changed_count());
        for file in result.changed() {
            println!("- {}", file.path.display());
        }
    }
    for file in &result.files {
        if let FileStatus::Failed(error) = &file.status {
            eprintln!("[WARN] {}: {}", file.path.display(), error);
        }
    }
}

/// Prints any serializable result in JSON format.
///
/// Falls back to a minimal object if serialization fails.
pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("[WARN] JSON serialization failed: {}", e);
            println!("{}", json!({ "error": e.to_string() }));
        }
    }
}
