//! Output formatting for analysis results and comparisons.
//!
//! Two formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption

use colored::*;
use std::fmt::Write as _;

use crate::analysis::{AnalysisResult, Rating};
use crate::compare::Delta;

/// Truncation limits for the pretty summary.
const DOCSTRING_PREVIEW: usize = 100;
const IMPORT_PREVIEW: usize = 5;
const CLASS_PREVIEW: usize = 3;
const FUNCTION_PREVIEW: usize = 5;

/// Render an analysis as a human-readable summary.
pub fn render_pretty(result: &AnalysisResult) -> String {
    let mut out = String::new();

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "  {} v{}",
        "codescope".cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "  {}{}", "File: ".dimmed(), result.path);
    let _ = writeln!(
        out,
        "  {}{} total, {} code, {} comment, {} blank",
        "Lines: ".dimmed(),
        result.lines.total,
        result.lines.code,
        result.lines.comment,
        result.lines.blank
    );

    if let Some(ref doc) = result.docstring {
        let preview: String = doc.trim().chars().take(DOCSTRING_PREVIEW).collect();
        let _ = writeln!(out, "  {}{}", "Description: ".dimmed(), preview);
    }
    let _ = writeln!(out);

    if !result.imports.is_empty() {
        let shown: Vec<&str> = result
            .imports
            .iter()
            .take(IMPORT_PREVIEW)
            .map(|i| i.path.as_str())
            .collect();
        let _ = writeln!(
            out,
            "  Uses {} libraries including: {}",
            result.imports.len(),
            shown.join(", ")
        );
    }

    if !result.classes.is_empty() {
        let _ = writeln!(out, "  Contains {} classes:", result.classes.len());
        for class in result.classes.iter().take(CLASS_PREVIEW) {
            let plural = if class.methods.len() != 1 { "s" } else { "" };
            let _ = writeln!(
                out,
                "    - {} ({} method{})",
                class.name.blue(),
                class.methods.len(),
                plural
            );
        }
    }

    if !result.functions.is_empty() {
        let _ = writeln!(out, "  Contains {} functions:", result.functions.len());
        for func in result.functions.iter().take(FUNCTION_PREVIEW) {
            let params: Vec<&str> = func.params.iter().map(|p| p.name.as_str()).collect();
            let args = if params.is_empty() {
                "no args".to_string()
            } else {
                params.join(", ")
            };
            let _ = writeln!(out, "    - {}({})", func.name.blue(), args);
        }
    }

    if !result.globals.is_empty() {
        let _ = writeln!(out, "  Declares {} globals", result.globals.len());
    }
    let _ = writeln!(out);

    let _ = write!(
        out,
        "  Complexity: {} (",
        result.complexity.total.to_string().bold()
    );
    let _ = write!(out, "{}", colored_rating(result.complexity.rating));
    let _ = writeln!(
        out,
        ") with {} conditionals, {} loops",
        result.complexity.conditionals, result.complexity.loops
    );

    out
}

/// Render an analysis as pretty-printed JSON.
pub fn render_json(result: &AnalysisResult) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Render a comparison as a human-readable report.
pub fn render_delta_pretty(delta: &Delta) -> String {
    let mut out = String::new();

    let _ = writeln!(out);
    let _ = writeln!(out, "  {}", "Comparison".cyan().bold());
    let _ = writeln!(out);
    let _ = writeln!(out, "  {}{}", "First:  ".dimmed(), delta.first_path);
    let _ = writeln!(out, "  {}{}", "Second: ".dimmed(), delta.second_path);
    let _ = writeln!(out);
    let _ = writeln!(out, "  {} (second - first):", "Differences".bold());

    for (label, pair) in delta.fields() {
        let _ = writeln!(
            out,
            "    {:<14} {:>6} -> {:<6} {}",
            label,
            pair.first,
            pair.second,
            colored_signed(pair.delta)
        );
    }

    if delta.is_unchanged() {
        let _ = writeln!(out);
        let _ = writeln!(out, "  {}", "No metric changed.".green());
    }

    out
}

/// Render a comparison as pretty-printed JSON.
pub fn render_delta_json(delta: &Delta) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(delta)?)
}

fn colored_rating(rating: Rating) -> ColoredString {
    match rating {
        Rating::Simple => rating.to_string().green(),
        Rating::Moderate => rating.to_string().yellow(),
        Rating::Complex => rating.to_string().red(),
    }
}

fn colored_signed(delta: i64) -> ColoredString {
    if delta > 0 {
        format!("+{delta}").yellow()
    } else if delta < 0 {
        format!("{delta}").green()
    } else {
        "0".dimmed()
    }
}
