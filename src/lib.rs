//! Codescope - structural analysis and metrics for Python source code.
//!
//! Codescope parses Python source text into a structural model (imports,
//! top-level functions, classes with their methods and attributes, and
//! module globals) and derives quantitative metrics: line statistics,
//! McCabe-style cyclomatic complexity, and a qualitative rating. Two
//! completed analyses can be diffed field by field.
//!
//! # Architecture
//!
//! - `analysis`: the core: tree-sitter parser, line scanner, structural
//!   extractor, complexity calculator, and the `analyze` entry point
//! - `compare`: field-by-field delta of two `AnalysisResult`s
//! - `error`: the analysis error taxonomy
//! - `config`: YAML configuration for the CLI layer
//! - `report`: output formatting (pretty, JSON)
//! - `cli`: command-line front-end over the core
//!
//! The core is a stateless library: analysis of one source unit is a pure
//! computation with no I/O and no process-wide mutable state, so batch
//! callers can run analyses in parallel freely. The CLI and report layers
//! consume the core's value objects; nothing in the core depends on them.
//!
//! # Example
//!
//! ```
//! let result = codescope::analyze(b"def f(x):\n    return x\n", "f.py").unwrap();
//! assert_eq!(result.functions[0].name, "f");
//! assert_eq!(result.functions[0].complexity, 1);
//!
//! let delta = codescope::compare(&result, &result);
//! assert!(delta.is_unchanged());
//! ```

pub mod analysis;
pub mod cli;
pub mod compare;
pub mod config;
pub mod error;
pub mod report;

pub use analysis::{
    analyze, analyze_str, analyze_str_with_config, analyze_with_config, AnalysisResult,
    AnalyzeConfig, ClassInfo, CommentSyntax, ComplexityMetrics, FunctionInfo, GlobalInfo,
    ImportRecord, LineStats, ParamInfo, Rating, RatingThresholds,
};
pub use compare::{compare, Delta, MetricPair};
pub use config::FileConfig;
pub use error::AnalyzeError;
