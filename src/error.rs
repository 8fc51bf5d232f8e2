//! Error types for the analysis core.
//!
//! Analysis of a single source unit fails in exactly two input-driven ways:
//! the bytes are not valid UTF-8, or the text violates the Python grammar.
//! Both are terminal for that file and carry the position of the first
//! offending byte or node. A grammar-load failure is a build/environment
//! problem, not an input problem, and gets its own variant.

use thiserror::Error;

/// Failure of a single `analyze` invocation.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// The input bytes could not be decoded as UTF-8.
    #[error("{path}:{line}:{column}: source is not valid UTF-8")]
    Encoding {
        path: String,
        line: usize,
        column: usize,
    },

    /// The input decoded but violates the Python grammar.
    #[error("{path}:{line}:{column}: {message}")]
    Parse {
        path: String,
        line: usize,
        column: usize,
        message: String,
    },

    /// The tree-sitter grammar could not be loaded (ABI mismatch).
    #[error("failed to load Python grammar: {0}")]
    Grammar(#[from] tree_sitter::LanguageError),
}

impl AnalyzeError {
    /// Position of the failure, if the error kind carries one.
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            AnalyzeError::Encoding { line, column, .. }
            | AnalyzeError::Parse { line, column, .. } => Some((*line, *column)),
            AnalyzeError::Grammar(_) => None,
        }
    }

    /// The path of the source unit that failed, if known.
    pub fn path(&self) -> Option<&str> {
        match self {
            AnalyzeError::Encoding { path, .. } | AnalyzeError::Parse { path, .. } => {
                Some(path.as_str())
            }
            AnalyzeError::Grammar(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_position() {
        let err = AnalyzeError::Parse {
            path: "bad.py".to_string(),
            line: 3,
            column: 7,
            message: "invalid syntax".to_string(),
        };
        assert_eq!(err.position(), Some((3, 7)));
        assert_eq!(err.path(), Some("bad.py"));
        assert_eq!(err.to_string(), "bad.py:3:7: invalid syntax");
    }

    #[test]
    fn test_encoding_error_display() {
        let err = AnalyzeError::Encoding {
            path: "latin1.py".to_string(),
            line: 1,
            column: 5,
        };
        assert!(err.to_string().contains("not valid UTF-8"));
    }
}
