//! deadbind CLI - remove unused imports and bindings from JS/TS files.
//!
//! Features:
//! - Directory scanning with node_modules/.git/dist/build/target pruning
//! - Rayon-powered parallel processing, one independent pass per file
//! - `--check` mode for CI, `--dry-run` to preview, `--json` for tooling
//! - `--stdin` mode for editor integrations

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::io::Read;
use std::path::{Path, PathBuf};

use deadbind_core::{
    init_structured_logging, load_config, log_info, log_warn, print_check_plain, print_json,
    print_run_plain, Deadbind, DeadbindConfig, EngineOptions, FileKind, Operation,
    UnusedVariableAction,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Remove unused imports, variables, functions and parameters from JS/TS files")]
pub struct Cli {
    /// Files or directories to process
    #[arg(default_value = ".")]
    paths: Vec<PathBuf>,

    /// Only remove unused imports
    #[arg(long, conflicts_with = "variables")]
    imports: bool,

    /// Only handle unused variables, functions and parameters
    #[arg(long)]
    variables: bool,

    /// What to do with unused variables and functions: comment, prefix or ignore
    #[arg(long, value_name = "ACTION")]
    action: Option<UnusedVariableAction>,

    /// Prefix unused trailing parameters instead of removing them
    #[arg(long)]
    keep_trailing_params: bool,

    /// Report unused bindings without changing files; exit 1 if any are found
    #[arg(long, conflicts_with = "dry_run")]
    check: bool,

    /// Show which files would change without writing them
    #[arg(long)]
    dry_run: bool,

    /// Output results in JSON format
    #[arg(long)]
    json: bool,

    /// Path substrings to skip
    #[arg(long, num_args = 1..)]
    ignore: Vec<String>,

    /// Extra directory names to prune while scanning
    #[arg(long, num_args = 1..)]
    exclude_dir: Vec<String>,

    /// Read source from stdin and write the result to stdout; the value is
    /// the file extension (js, jsx, ts, tsx)
    #[arg(long, value_name = "EXT", conflicts_with_all = ["check", "dry_run"])]
    stdin: Option<String>,
}

impl Cli {
    fn operation(&self) -> Operation {
        match (self.imports, self.variables) {
            (true, false) => Operation::RemoveImports,
            (false, true) => Operation::HandleVariables,
            _ => Operation::CleanAll,
        }
    }

    /// Config file values, overridden by flags.
    fn engine_options(&self, config: &DeadbindConfig) -> EngineOptions {
        let mut options = config.engine_options();
        if let Some(action) = self.action {
            options.unused_variable_action = action;
        }
        if self.keep_trailing_params {
            options.remove_trailing_parameters = false;
        }
        options
    }
}

/// Directory whose deadbind.toml applies to `path`.
fn config_root(path: &Path) -> &Path {
    if path.is_dir() {
        path
    } else {
        path.parent().unwrap_or(Path::new("."))
    }
}

fn run_stdin(ext: &str, operation: Operation, options: &EngineOptions) -> Result<()> {
    let kind = FileKind::from_extension(ext.trim_start_matches('.'))
        .ok_or_else(|| anyhow!("Unsupported extension '{}', expected js, jsx, ts or tsx", ext))?;
    let mut source = String::new();
    std::io::stdin()
        .read_to_string(&mut source)
        .context("Failed to read stdin")?;

    let path = PathBuf::from(format!("<stdin>.{ext}"));
    let result = operation
        .run(&source, kind, &path, options)
        .context("Failed to process stdin")?;
    print!("{}", result.as_deref().unwrap_or(&source));
    Ok(())
}

fn main() -> Result<()> {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("[PANIC] deadbind internal error: {}", info);
        eprintln!("[PANIC] No file was left partially written.");
        std::process::exit(2);
    }));

    init_structured_logging();

    let cli = Cli::parse();

    let root = cli.paths.first().map_or(Path::new("."), |p| config_root(p));
    let config = match load_config(root) {
        Ok(Some(cfg)) => cfg,
        Ok(None) => DeadbindConfig::default(),
        Err(e) => {
            log_warn(&format!("Ignoring config: {:#}", e));
            DeadbindConfig::default()
        }
    };
    let options = cli.engine_options(&config);
    let json = cli.json || config.wants_json();

    if let Some(ext) = &cli.stdin {
        return run_stdin(ext, cli.operation(), &options);
    }

    let (first, rest) = match cli.paths.split_first() {
        Some((first, rest)) => (first.clone(), rest),
        None => (PathBuf::from("."), &[][..]),
    };
    let mut builder = rest
        .iter()
        .fold(Deadbind::new(first), |builder, path| builder.add_path(path))
        .with_config(&config)
        .options(options)
        .ignore_patterns(cli.ignore.iter().cloned())
        .exclude_dirs(cli.exclude_dir.iter().cloned());

    if cli.check {
        let result = builder.check()?;
        if json {
            print_json(&result);
        } else {
            print_check_plain(&result);
        }
        if result.has_findings() {
            std::process::exit(1);
        }
        return Ok(());
    }

    builder = builder.operation(cli.operation()).dry_run(cli.dry_run);
    let result = builder.run()?;
    log_info(&format!(
        "{} of {} files {}",
        result.changed_count(),
        result.files.len(),
        if cli.dry_run { "would change" } else { "changed" }
    ));

    if json {
        print_json(&result);
    } else {
        print_run_plain(&result, cli.dry_run);
    }
    Ok(())
}
