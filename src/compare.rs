//! Comparison of two completed analyses.
//!
//! `compare` is a total function: any two valid results compare cleanly,
//! however dissimilar. List-valued fields contribute counts only; the
//! delta is never a structural diff of the lists themselves.

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisResult;

/// One numeric metric from both analyses with its signed difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricPair {
    pub first: i64,
    pub second: i64,
    /// `second - first`.
    pub delta: i64,
}

impl MetricPair {
    fn new(first: i64, second: i64) -> Self {
        Self {
            first,
            second,
            delta: second - first,
        }
    }
}

/// Field-by-field delta of two `AnalysisResult`s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delta {
    pub first_path: String,
    pub second_path: String,
    pub total_lines: MetricPair,
    pub code_lines: MetricPair,
    pub comment_lines: MetricPair,
    pub blank_lines: MetricPair,
    pub imports: MetricPair,
    pub functions: MetricPair,
    pub classes: MetricPair,
    pub globals: MetricPair,
    pub complexity: MetricPair,
    pub conditionals: MetricPair,
    pub loops: MetricPair,
}

impl Delta {
    /// All metric fields with their report labels, in display order.
    pub fn fields(&self) -> [(&'static str, MetricPair); 11] {
        [
            ("total lines", self.total_lines),
            ("code lines", self.code_lines),
            ("comment lines", self.comment_lines),
            ("blank lines", self.blank_lines),
            ("imports", self.imports),
            ("functions", self.functions),
            ("classes", self.classes),
            ("globals", self.globals),
            ("complexity", self.complexity),
            ("conditionals", self.conditionals),
            ("loops", self.loops),
        ]
    }

    /// True when every metric delta is zero.
    pub fn is_unchanged(&self) -> bool {
        self.fields().iter().all(|(_, pair)| pair.delta == 0)
    }
}

/// Compare two analyses, reporting `second - first` for every numeric
/// field. Never fails.
pub fn compare(first: &AnalysisResult, second: &AnalysisResult) -> Delta {
    let pair = |a: usize, b: usize| MetricPair::new(a as i64, b as i64);

    Delta {
        first_path: first.path.clone(),
        second_path: second.path.clone(),
        total_lines: pair(first.lines.total, second.lines.total),
        code_lines: pair(first.lines.code, second.lines.code),
        comment_lines: pair(first.lines.comment, second.lines.comment),
        blank_lines: pair(first.lines.blank, second.lines.blank),
        imports: pair(first.imports.len(), second.imports.len()),
        functions: pair(first.functions.len(), second.functions.len()),
        classes: pair(first.classes.len(), second.classes.len()),
        globals: pair(first.globals.len(), second.globals.len()),
        complexity: pair(
            first.complexity.total as usize,
            second.complexity.total as usize,
        ),
        conditionals: pair(
            first.complexity.conditionals as usize,
            second.complexity.conditionals as usize,
        ),
        loops: pair(
            first.complexity.loops as usize,
            second.complexity.loops as usize,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{
        ComplexityMetrics, FunctionInfo, LineStats, Rating,
    };

    fn result_with(functions: usize, complexity: u32, total_lines: usize) -> AnalysisResult {
        let func = |i: usize| FunctionInfo {
            name: format!("f{i}"),
            params: Vec::new(),
            decorators: Vec::new(),
            returns: None,
            docstring: None,
            line: i + 1,
            is_async: false,
            complexity: 1,
        };
        AnalysisResult {
            path: "fixture.py".to_string(),
            lines: LineStats {
                total: total_lines,
                code: total_lines,
                comment: 0,
                blank: 0,
            },
            imports: Vec::new(),
            functions: (0..functions).map(func).collect(),
            classes: Vec::new(),
            globals: Vec::new(),
            complexity: ComplexityMetrics {
                total: complexity,
                conditionals: 0,
                loops: 0,
                rating: Rating::Complex,
            },
            docstring: None,
        }
    }

    #[test]
    fn test_compare_reports_signed_differences() {
        let first = result_with(25, 142, 400);
        let second = result_with(32, 185, 480);

        let delta = compare(&first, &second);
        assert_eq!(delta.functions.delta, 7);
        assert_eq!(delta.complexity.delta, 43);
        assert_eq!(delta.total_lines.delta, 80);
        // Originals stay visible for absolute/relative rendering.
        assert_eq!(delta.functions.first, 25);
        assert_eq!(delta.functions.second, 32);
    }

    #[test]
    fn test_compare_is_antisymmetric() {
        let a = result_with(3, 12, 100);
        let b = result_with(9, 40, 60);

        let forward = compare(&a, &b);
        let backward = compare(&b, &a);
        for ((_, f), (_, r)) in forward.fields().iter().zip(backward.fields().iter()) {
            assert_eq!(f.delta, -r.delta);
        }
    }

    #[test]
    fn test_compare_identical_is_zero() {
        let a = result_with(5, 20, 150);
        let delta = compare(&a, &a);
        assert!(delta.is_unchanged());
        for (_, pair) in delta.fields() {
            assert_eq!(pair.delta, 0);
        }
    }

    #[test]
    fn test_wildly_dissimilar_inputs_compare_cleanly() {
        let tiny = result_with(0, 1, 10);
        let huge = result_with(500, 4000, 10_000);
        let delta = compare(&tiny, &huge);
        assert_eq!(delta.total_lines.delta, 9_990);
        assert_eq!(delta.complexity.delta, 3_999);
    }
}
