//! Value objects produced by a completed analysis.
//!
//! Everything here is constructed once by `analyze` and never mutated
//! afterwards. Re-analyzing a changed file produces a fresh
//! `AnalysisResult` rather than updating an old one.

use serde::{Deserialize, Serialize};

/// One parameter of a function or method signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamInfo {
    /// Parameter name with any `*`/`**` sigils stripped.
    pub name: String,
    /// Type annotation text, verbatim from the source.
    pub annotation: Option<String>,
    /// Whether the parameter declares a default value.
    pub has_default: bool,
}

/// A function or method definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionInfo {
    pub name: String,
    /// Parameters in declaration order.
    pub params: Vec<ParamInfo>,
    /// Decorator names in declaration order, normalized to the decorated
    /// expression (a call decorator contributes its callee).
    pub decorators: Vec<String>,
    /// Return-type annotation text, verbatim.
    pub returns: Option<String>,
    pub docstring: Option<String>,
    /// Line of the `def` keyword (1-indexed).
    pub line: usize,
    pub is_async: bool,
    /// Cyclomatic complexity, always >= 1.
    pub complexity: u32,
}

/// A class definition with its methods and `self` attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassInfo {
    pub name: String,
    /// Base-class expressions, verbatim and in declaration order.
    pub bases: Vec<String>,
    /// Methods in declaration order, implicit constructors included.
    pub methods: Vec<FunctionInfo>,
    /// Names assigned through `self.<name>` anywhere in the class body,
    /// deduplicated in first-assignment order.
    pub attributes: Vec<String>,
    pub docstring: Option<String>,
    pub line: usize,
}

/// A normalized import path, recorded at its first appearance.
///
/// Aliases resolve to the original dotted path; `from m import a` is
/// recorded as `m.a`. Duplicates collapse to one record per result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRecord {
    pub path: String,
    pub line: usize,
}

/// A module-level assignment target outside every function and class body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalInfo {
    pub name: String,
    pub line: usize,
}

/// Physical-line classification counts.
///
/// Invariant: `total == code + comment + blank`. A line carrying code and
/// a trailing comment counts as code, never twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineStats {
    pub total: usize,
    pub code: usize,
    pub comment: usize,
    pub blank: usize,
}

/// Qualitative complexity bucket derived from the aggregate total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Simple,
    Moderate,
    Complex,
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rating::Simple => write!(f, "simple"),
            Rating::Moderate => write!(f, "moderate"),
            Rating::Complex => write!(f, "complex"),
        }
    }
}

/// Aggregate control-flow metrics for one source unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityMetrics {
    /// Sum of all function complexities plus a module baseline of 1.
    pub total: u32,
    /// File-wide count of conditional branches (if/elif/ternary/match arm).
    pub conditionals: u32,
    /// File-wide count of loop constructs (for/while/comprehension clause).
    pub loops: u32,
    pub rating: Rating,
}

/// The completed structural model and metrics for one source unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// The path or identifier the caller supplied with the text.
    pub path: String,
    pub lines: LineStats,
    /// Imports in first-appearance order, deduplicated.
    pub imports: Vec<ImportRecord>,
    /// Top-level functions only; methods live inside their `ClassInfo`.
    pub functions: Vec<FunctionInfo>,
    pub classes: Vec<ClassInfo>,
    pub globals: Vec<GlobalInfo>,
    pub complexity: ComplexityMetrics,
    pub docstring: Option<String>,
}

impl AnalysisResult {
    /// Number of top-level functions.
    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    /// Number of classes.
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Number of methods across all classes.
    pub fn method_count(&self) -> usize {
        self.classes.iter().map(|c| c.methods.len()).sum()
    }

    /// All functions and methods, top-level first, then per class in order.
    pub fn callables(&self) -> impl Iterator<Item = &FunctionInfo> {
        self.functions
            .iter()
            .chain(self.classes.iter().flat_map(|c| c.methods.iter()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn func(name: &str, complexity: u32) -> FunctionInfo {
        FunctionInfo {
            name: name.to_string(),
            params: Vec::new(),
            decorators: Vec::new(),
            returns: None,
            docstring: None,
            line: 1,
            is_async: false,
            complexity,
        }
    }

    #[test]
    fn test_callables_order() {
        let result = AnalysisResult {
            path: "m.py".to_string(),
            lines: LineStats::default(),
            imports: Vec::new(),
            functions: vec![func("top", 1)],
            classes: vec![ClassInfo {
                name: "C".to_string(),
                bases: Vec::new(),
                methods: vec![func("__init__", 1), func("run", 3)],
                attributes: Vec::new(),
                docstring: None,
                line: 5,
            }],
            globals: Vec::new(),
            complexity: ComplexityMetrics {
                total: 6,
                conditionals: 2,
                loops: 0,
                rating: Rating::Simple,
            },
            docstring: None,
        };

        let names: Vec<_> = result.callables().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["top", "__init__", "run"]);
        assert_eq!(result.function_count(), 1);
        assert_eq!(result.method_count(), 2);
    }

    #[test]
    fn test_rating_display() {
        assert_eq!(Rating::Simple.to_string(), "simple");
        assert_eq!(Rating::Complex.to_string(), "complex");
    }
}
