//! Physical-line classification, independent of the parser.
//!
//! Each line is blank, comment, or code. Because the scanner never touches
//! the syntax tree it still produces a result for files the parser rejects.

use crate::analysis::model::LineStats;

/// Comment markers for a language, supplied as a value so the scanner has
/// no language baked in. `block` is an open/close delimiter pair for
/// languages with multi-line comment spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentSyntax {
    pub line: &'static str,
    pub block: Option<(&'static str, &'static str)>,
}

/// Python comment syntax: `#` line comments, no block comments.
pub const PYTHON_COMMENTS: CommentSyntax = CommentSyntax {
    line: "#",
    block: None,
};

/// Classify every physical line of `source` using Python comment syntax.
pub fn scan(source: &str) -> LineStats {
    scan_with(source, PYTHON_COMMENTS)
}

/// Classify every physical line of `source` with the given comment syntax.
///
/// A line is blank if whitespace-only; comment if its first non-whitespace
/// token is a comment marker or it lies inside a block-comment span opened
/// on an earlier line; code otherwise. Trailing inline comments do not
/// demote a code line.
pub fn scan_with(source: &str, syntax: CommentSyntax) -> LineStats {
    let mut stats = LineStats::default();
    let mut in_block = false;

    for line in source.lines() {
        stats.total += 1;
        let trimmed = line.trim();

        if in_block {
            match syntax.block {
                Some((open, close)) => {
                    let (still_open, rest) = advance_block(trimmed, open, close);
                    in_block = still_open;
                    if !still_open && !rest.trim().is_empty() {
                        stats.code += 1;
                    } else {
                        stats.comment += 1;
                    }
                }
                // State cannot open without block markers.
                None => stats.comment += 1,
            }
            continue;
        }

        if trimmed.is_empty() {
            stats.blank += 1;
        } else if trimmed.starts_with(syntax.line) {
            stats.comment += 1;
        } else if let Some((open, close)) = opens_with_block(trimmed, syntax) {
            let (still_open, _) = advance_block(&trimmed[open.len()..], open, close);
            in_block = still_open;
            stats.comment += 1;
        } else {
            stats.code += 1;
            if let Some((open, close)) = syntax.block {
                if let Some(idx) = trimmed.find(open) {
                    let (still_open, _) = advance_block(&trimmed[idx + open.len()..], open, close);
                    in_block = still_open;
                }
            }
        }
    }

    stats
}

fn opens_with_block(
    trimmed: &str,
    syntax: CommentSyntax,
) -> Option<(&'static str, &'static str)> {
    syntax.block.filter(|(open, _)| trimmed.starts_with(open))
}

/// Scan forward from inside an open block span. Returns whether the span is
/// still open at end of line and the text remaining after the final close.
fn advance_block<'a>(mut s: &'a str, open: &str, close: &str) -> (bool, &'a str) {
    loop {
        match s.find(close) {
            None => return (true, ""),
            Some(i) => {
                s = &s[i + close.len()..];
                match s.find(open) {
                    None => return (false, s),
                    Some(j) => s = &s[j + open.len()..],
                }
            }
        }
    }
}
