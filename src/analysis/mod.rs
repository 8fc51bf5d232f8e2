//! The analysis core: parser, line scanner, structural extractor, and
//! complexity calculator, assembled into the `analyze` entry point.
//!
//! ```text
//! ┌────────────┐    ┌────────┐    ┌───────────────────┐
//! │ Source     │───▶│ Parser │───▶│ Extractor +       │
//! │ text+path  │    └────────┘    │ Complexity        │──┐
//! └─────┬──────┘                  └───────────────────┘  │
//!       │         ┌─────────┐                            ▼
//!       └────────▶│ Scanner │──────────────────▶ AnalysisResult
//!                 └─────────┘
//! ```
//!
//! Every invocation is a pure, independent computation over one source
//! unit: no shared mutable state, no I/O, no globals. Batch callers may
//! fan analyses out across threads freely.

mod complexity;
mod extract;
mod model;
mod parser;
mod scanner;

pub use complexity::RatingThresholds;
pub use model::{
    AnalysisResult, ClassInfo, ComplexityMetrics, FunctionInfo, GlobalInfo, ImportRecord,
    LineStats, ParamInfo, Rating,
};
pub use parser::{ParsedSource, SyntaxKind};
pub use scanner::{scan, scan_with, CommentSyntax, PYTHON_COMMENTS};

use crate::error::AnalyzeError;

/// Configuration for a single analysis invocation.
///
/// Passed at call time rather than read from process-wide state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalyzeConfig {
    pub thresholds: RatingThresholds,
}

/// Analyze raw source bytes under the given path identifier.
///
/// Fails with `AnalyzeError::Encoding` if the bytes are not UTF-8 and
/// `AnalyzeError::Parse` if the text violates the grammar; both carry the
/// offending position. The path is an identifier only; nothing is read
/// from the file system.
pub fn analyze(source: &[u8], path: &str) -> Result<AnalysisResult, AnalyzeError> {
    analyze_with_config(source, path, &AnalyzeConfig::default())
}

/// `analyze` with explicit configuration.
pub fn analyze_with_config(
    source: &[u8],
    path: &str,
    config: &AnalyzeConfig,
) -> Result<AnalysisResult, AnalyzeError> {
    let text = parser::decode(source, path)?;
    analyze_str_with_config(text, path, config)
}

/// Analyze already-decoded source text (the encoding check is moot).
pub fn analyze_str(source: &str, path: &str) -> Result<AnalysisResult, AnalyzeError> {
    analyze_str_with_config(source, path, &AnalyzeConfig::default())
}

/// `analyze_str` with explicit configuration.
pub fn analyze_str_with_config(
    source: &str,
    path: &str,
    config: &AnalyzeConfig,
) -> Result<AnalysisResult, AnalyzeError> {
    let lines = scanner::scan(source);
    let parsed = parser::parse(source, path)?;
    let structure = extract::extract(&parsed);

    let function_complexities: Vec<u32> = structure
        .functions
        .iter()
        .map(|f| f.complexity)
        .chain(
            structure
                .classes
                .iter()
                .flat_map(|c| c.methods.iter().map(|m| m.complexity)),
        )
        .collect();

    let metrics = complexity::aggregate(
        function_complexities.into_iter(),
        parsed.root(),
        &config.thresholds,
    );

    Ok(AnalysisResult {
        path: path.to_string(),
        lines,
        imports: structure.imports,
        functions: structure.functions,
        classes: structure.classes,
        globals: structure.globals,
        complexity: metrics,
        docstring: structure.docstring,
    })
}
