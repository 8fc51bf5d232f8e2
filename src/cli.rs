//! Command-line interface for codescope.

use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::analysis::{self, AnalysisResult, AnalyzeConfig};
use crate::compare::compare;
use crate::config::FileConfig;
use crate::report;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Directories never descended into during a directory scan.
const SKIPPED_DIRS: &[&str] = &[".git", "__pycache__", "venv", "env", "node_modules"];

/// Structural analysis and complexity metrics for Python source code.
///
/// Codescope parses Python files into a structural model (imports,
/// functions, classes, globals) with line statistics and cyclomatic
/// complexity, and can diff two such models field by field.
#[derive(Parser)]
#[command(name = "codescope")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a Python file, or every Python file under a directory
    #[command(visible_alias = "scan")]
    Analyze(AnalyzeArgs),
    /// Compare two Python files metric by metric
    #[command(visible_alias = "diff")]
    Compare(CompareArgs),
}

/// Arguments for the analyze command.
#[derive(Parser)]
pub struct AnalyzeArgs {
    /// Path to analyze (file or directory)
    pub path: PathBuf,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Arguments for the compare command.
#[derive(Parser)]
pub struct CompareArgs {
    /// First file
    pub first: PathBuf,

    /// Second file
    pub second: PathBuf,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Run the analyze command.
pub fn run_analyze(args: &AnalyzeArgs) -> anyhow::Result<i32> {
    check_format(&args.format)?;

    let base = config_base(&args.path);
    let file_config = FileConfig::load_or_discover(args.config.as_deref(), &base)?;
    let analyze_config = file_config.analyze_config();

    if args.path.is_dir() {
        run_batch(args, &file_config, &analyze_config)
    } else {
        run_single(args, &analyze_config)
    }
}

fn run_single(args: &AnalyzeArgs, config: &AnalyzeConfig) -> anyhow::Result<i32> {
    let key = args.path.display().to_string();
    let source =
        fs::read(&args.path).with_context(|| format!("failed to read {key}"))?;

    match analysis::analyze_with_config(&source, &key, config) {
        Ok(result) => {
            print_result(&result, &args.format)?;
            Ok(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("{e}");
            Ok(EXIT_FAILED)
        }
    }
}

fn run_batch(
    args: &AnalyzeArgs,
    file_config: &FileConfig,
    config: &AnalyzeConfig,
) -> anyhow::Result<i32> {
    let exclude = file_config.exclude_matcher()?;
    let files = collect_python_files(&args.path, &exclude);

    if files.is_empty() {
        println!("no Python files found under {}", args.path.display());
        return Ok(EXIT_SUCCESS);
    }

    let bar = ProgressBar::new(files.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("  analyzing {pos}/{len} {wide_bar}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    // Per-file analyses are independent pure computations; fan out and
    // collect into a path-keyed map for deterministic output order.
    let outcomes: Vec<(String, Result<AnalysisResult, String>)> = files
        .par_iter()
        .map(|path| {
            let key = path.display().to_string();
            let outcome = fs::read(path)
                .map_err(|e| format!("{key}: {e}"))
                .and_then(|bytes| {
                    analysis::analyze_with_config(&bytes, &key, config)
                        .map_err(|e| e.to_string())
                });
            bar.inc(1);
            (key, outcome)
        })
        .collect();
    bar.finish_and_clear();

    let ordered: BTreeMap<String, Result<AnalysisResult, String>> =
        outcomes.into_iter().collect();

    let mut failures = 0usize;
    if args.format == "json" {
        let results: Vec<&AnalysisResult> = ordered
            .values()
            .filter_map(|outcome| outcome.as_ref().ok())
            .collect();
        println!("{}", serde_json::to_string_pretty(&results)?);
        for outcome in ordered.values() {
            if let Err(message) = outcome {
                eprintln!("{message}");
                failures += 1;
            }
        }
    } else {
        for outcome in ordered.values() {
            match outcome {
                Ok(result) => print!("{}", report::render_pretty(result)),
                Err(message) => {
                    eprintln!("{message}");
                    failures += 1;
                }
            }
        }
        println!(
            "\n  Analyzed {} of {} files.",
            ordered.len() - failures,
            ordered.len()
        );
    }

    if failures > 0 {
        Ok(EXIT_FAILED)
    } else {
        Ok(EXIT_SUCCESS)
    }
}

/// Run the compare command.
pub fn run_compare(args: &CompareArgs) -> anyhow::Result<i32> {
    check_format(&args.format)?;

    let base = config_base(&args.first);
    let file_config = FileConfig::load_or_discover(args.config.as_deref(), &base)?;
    let config = file_config.analyze_config();

    let first = match analyze_file(&args.first, &config)? {
        Ok(result) => result,
        Err(message) => {
            eprintln!("{message}");
            return Ok(EXIT_FAILED);
        }
    };
    let second = match analyze_file(&args.second, &config)? {
        Ok(result) => result,
        Err(message) => {
            eprintln!("{message}");
            return Ok(EXIT_FAILED);
        }
    };

    let delta = compare(&first, &second);
    if args.format == "json" {
        println!("{}", report::render_delta_json(&delta)?);
    } else {
        print!("{}", report::render_delta_pretty(&delta));
    }
    Ok(EXIT_SUCCESS)
}

/// Read and analyze one file. The outer error is environmental (unreadable
/// file); the inner one is an analysis failure to report and survive.
fn analyze_file(
    path: &Path,
    config: &AnalyzeConfig,
) -> anyhow::Result<Result<AnalysisResult, String>> {
    let key = path.display().to_string();
    let source = fs::read(path).with_context(|| format!("failed to read {key}"))?;
    Ok(analysis::analyze_with_config(&source, &key, config).map_err(|e| e.to_string()))
}

fn print_result(result: &AnalysisResult, format: &str) -> anyhow::Result<()> {
    if format == "json" {
        println!("{}", report::render_json(result)?);
    } else {
        print!("{}", report::render_pretty(result));
    }
    Ok(())
}

fn check_format(format: &str) -> anyhow::Result<()> {
    match format {
        "pretty" | "json" => Ok(()),
        other => anyhow::bail!("unknown format {other:?} (expected pretty or json)"),
    }
}

fn config_base(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.to_path_buf()
    } else {
        path.parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Collect `*.py` files under `root`, skipping well-known non-code
/// directories and user-configured exclude patterns. Sorted for
/// deterministic processing.
fn collect_python_files(root: &Path, exclude: &globset::GlobSet) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| !is_skipped_dir(entry))
        .flatten()
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().map(|e| e == "py").unwrap_or(false))
        .filter(|path| !exclude.is_match(path))
        .collect();
    files.sort();
    files
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| SKIPPED_DIRS.contains(&name))
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn no_excludes() -> globset::GlobSet {
        globset::GlobSetBuilder::new().build().unwrap()
    }

    #[test]
    fn test_collect_skips_known_directories() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("main.py"), "x = 1\n").unwrap();
        fs::create_dir(temp.path().join("__pycache__")).unwrap();
        fs::write(temp.path().join("__pycache__/main.py"), "x = 1\n").unwrap();
        fs::create_dir(temp.path().join("venv")).unwrap();
        fs::write(temp.path().join("venv/setup.py"), "x = 1\n").unwrap();
        fs::write(temp.path().join("notes.txt"), "not python").unwrap();

        let files = collect_python_files(temp.path(), &no_excludes());
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("main.py"));
    }

    #[test]
    fn test_collect_applies_exclude_patterns() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("gen")).unwrap();
        fs::write(temp.path().join("gen/auto.py"), "x = 1\n").unwrap();
        fs::write(temp.path().join("kept.py"), "x = 1\n").unwrap();

        let mut builder = globset::GlobSetBuilder::new();
        builder.add(globset::Glob::new("**/gen/**").unwrap());
        let exclude = builder.build().unwrap();

        let files = collect_python_files(temp.path(), &exclude);
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("kept.py"));
    }

    #[test]
    fn test_collect_is_sorted() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("b.py"), "x = 1\n").unwrap();
        fs::write(temp.path().join("a.py"), "x = 1\n").unwrap();

        let files = collect_python_files(temp.path(), &no_excludes());
        assert!(files[0].ends_with("a.py"));
        assert!(files[1].ends_with("b.py"));
    }

    #[test]
    fn test_check_format() {
        assert!(check_format("pretty").is_ok());
        assert!(check_format("json").is_ok());
        assert!(check_format("sarif").is_err());
    }
}
