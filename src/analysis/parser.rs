//! Tree-sitter based Python parser.
//!
//! Produces a read-only syntax tree or a positioned error. Parsing is
//! purely syntactic; nothing in the source is ever executed. A tree
//! containing ERROR or MISSING nodes is rejected outright rather than
//! passed downstream as a partial model.

use once_cell::sync::Lazy;
use tree_sitter::{Language, Node, Parser, Tree};

use crate::error::AnalyzeError;

static PYTHON: Lazy<Language> = Lazy::new(|| tree_sitter_python::LANGUAGE.into());

/// The syntactic constructs the analyzer consumes, as a closed set.
///
/// Raw tree-sitter node kinds are classified exactly once through this
/// enum; every traversal downstream matches on it exhaustively. Node
/// kinds the analyzer has no interest in fold into `Other` instead of
/// being skipped by string comparison at each use site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxKind {
    Module,
    Comment,
    Import,
    ImportFrom,
    FutureImport,
    FunctionDef,
    ClassDef,
    DecoratedDef,
    Decorator,
    Assignment,
    AugmentedAssignment,
    ExpressionStatement,
    If,
    Elif,
    Else,
    Ternary,
    For,
    While,
    ForInClause,
    Try,
    Except,
    Finally,
    Match,
    Case,
    BoolOp,
    Block,
    Str,
    Other,
}

impl SyntaxKind {
    /// Classify a node by its grammar kind.
    pub fn of(node: &Node) -> SyntaxKind {
        Self::from_kind(node.kind())
    }

    pub fn from_kind(kind: &str) -> SyntaxKind {
        match kind {
            "module" => SyntaxKind::Module,
            "comment" => SyntaxKind::Comment,
            "import_statement" => SyntaxKind::Import,
            "import_from_statement" => SyntaxKind::ImportFrom,
            "future_import_statement" => SyntaxKind::FutureImport,
            "function_definition" => SyntaxKind::FunctionDef,
            "class_definition" => SyntaxKind::ClassDef,
            "decorated_definition" => SyntaxKind::DecoratedDef,
            "decorator" => SyntaxKind::Decorator,
            "assignment" => SyntaxKind::Assignment,
            "augmented_assignment" => SyntaxKind::AugmentedAssignment,
            "expression_statement" => SyntaxKind::ExpressionStatement,
            "if_statement" => SyntaxKind::If,
            "elif_clause" => SyntaxKind::Elif,
            "else_clause" => SyntaxKind::Else,
            "conditional_expression" => SyntaxKind::Ternary,
            "for_statement" => SyntaxKind::For,
            "while_statement" => SyntaxKind::While,
            "for_in_clause" => SyntaxKind::ForInClause,
            "try_statement" => SyntaxKind::Try,
            "except_clause" | "except_group_clause" => SyntaxKind::Except,
            "finally_clause" => SyntaxKind::Finally,
            "match_statement" => SyntaxKind::Match,
            "case_clause" => SyntaxKind::Case,
            "boolean_operator" => SyntaxKind::BoolOp,
            "block" => SyntaxKind::Block,
            "string" | "concatenated_string" => SyntaxKind::Str,
            _ => SyntaxKind::Other,
        }
    }
}

/// A parsed source unit: the tree, the bytes it was parsed from, and the
/// caller-supplied path. Read-only after construction; the extractor and
/// the complexity calculator only borrow it.
#[derive(Debug)]
pub struct ParsedSource {
    tree: Tree,
    source: Vec<u8>,
    path: String,
}

impl ParsedSource {
    /// The root module node.
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// The path or identifier supplied at parse time.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Source text of a node.
    pub fn node_text(&self, node: Node) -> &str {
        node.utf8_text(&self.source).unwrap_or("")
    }
}

/// Decode `source` as UTF-8, reporting the line/column of the first
/// invalid byte on failure.
pub fn decode<'s>(source: &'s [u8], path: &str) -> Result<&'s str, AnalyzeError> {
    std::str::from_utf8(source).map_err(|e| {
        let prefix = &source[..e.valid_up_to()];
        let line = prefix.iter().filter(|&&b| b == b'\n').count() + 1;
        let column = prefix
            .iter()
            .rev()
            .take_while(|&&b| b != b'\n')
            .count()
            + 1;
        AnalyzeError::Encoding {
            path: path.to_string(),
            line,
            column,
        }
    })
}

/// Parse UTF-8 source text into a syntax tree.
pub fn parse(source: &str, path: &str) -> Result<ParsedSource, AnalyzeError> {
    let mut parser = Parser::new();
    parser.set_language(&PYTHON)?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| AnalyzeError::Parse {
            path: path.to_string(),
            line: 1,
            column: 1,
            message: "parser produced no syntax tree".to_string(),
        })?;

    let root = tree.root_node();
    if root.has_error() {
        if let Some(node) = first_error_node(root) {
            let pos = node.start_position();
            let message = if node.is_missing() {
                format!("missing {}", node.kind())
            } else {
                "invalid syntax".to_string()
            };
            return Err(AnalyzeError::Parse {
                path: path.to_string(),
                line: pos.row + 1,
                column: pos.column + 1,
                message,
            });
        }
    }

    Ok(ParsedSource {
        tree,
        source: source.as_bytes().to_vec(),
        path: path.to_string(),
    })
}

/// Find the first ERROR or MISSING node in document order.
fn first_error_node(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = first_error_node(child) {
            return Some(found);
        }
    }
    // The error flag is set but no descendant owns it; report this node.
    Some(node)
}
