//! McCabe-style cyclomatic complexity.
//!
//! Each function starts at 1 and gains a point per decision point in its
//! subtree: conditional branches (`if`/`elif`/ternary/`case` arm), loop
//! constructs (`for`/`while`/comprehension clause), boolean short-circuit
//! operators, and exception handlers. `else` adds nothing. Decision points
//! inside deeper-nested function definitions count toward the enclosing
//! reported function.

use serde::{Deserialize, Serialize};
use tree_sitter::Node;

use crate::analysis::model::{ComplexityMetrics, Rating};
use crate::analysis::parser::SyntaxKind;

/// Rating thresholds over the aggregate complexity total.
///
/// Supplied by the caller as configuration rather than read from a
/// module-level constant. Totals below `simple_below` rate Simple, up to
/// and including `moderate_max` rate Moderate, and anything above rates
/// Complex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingThresholds {
    #[serde(default = "default_simple_below")]
    pub simple_below: u32,
    #[serde(default = "default_moderate_max")]
    pub moderate_max: u32,
}

fn default_simple_below() -> u32 {
    10
}

fn default_moderate_max() -> u32 {
    50
}

impl Default for RatingThresholds {
    fn default() -> Self {
        Self {
            simple_below: default_simple_below(),
            moderate_max: default_moderate_max(),
        }
    }
}

impl RatingThresholds {
    /// Bucket an aggregate total.
    pub fn rate(&self, total: u32) -> Rating {
        if total < self.simple_below {
            Rating::Simple
        } else if total <= self.moderate_max {
            Rating::Moderate
        } else {
            Rating::Complex
        }
    }
}

/// Complexity of a single function body: 1 plus its decision points.
pub fn function_complexity(body: Node) -> u32 {
    1 + decision_points(body)
}

fn decision_points(node: Node) -> u32 {
    let mut count = match SyntaxKind::of(&node) {
        SyntaxKind::If
        | SyntaxKind::Elif
        | SyntaxKind::Ternary
        | SyntaxKind::Case
        | SyntaxKind::For
        | SyntaxKind::While
        | SyntaxKind::ForInClause
        | SyntaxKind::BoolOp
        | SyntaxKind::Except => 1,
        SyntaxKind::Module
        | SyntaxKind::Comment
        | SyntaxKind::Import
        | SyntaxKind::ImportFrom
        | SyntaxKind::FutureImport
        | SyntaxKind::FunctionDef
        | SyntaxKind::ClassDef
        | SyntaxKind::DecoratedDef
        | SyntaxKind::Decorator
        | SyntaxKind::Assignment
        | SyntaxKind::AugmentedAssignment
        | SyntaxKind::ExpressionStatement
        | SyntaxKind::Else
        | SyntaxKind::Try
        | SyntaxKind::Finally
        | SyntaxKind::Match
        | SyntaxKind::Block
        | SyntaxKind::Str
        | SyntaxKind::Other => 0,
    };

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        count += decision_points(child);
    }
    count
}

/// File-wide conditional and loop totals, counted over the whole tree
/// (module-level code included). These feed the rating and the report,
/// never per-function scores.
pub fn count_branches(root: Node) -> (u32, u32) {
    let mut conditionals = 0;
    let mut loops = 0;
    count_branches_into(root, &mut conditionals, &mut loops);
    (conditionals, loops)
}

fn count_branches_into(node: Node, conditionals: &mut u32, loops: &mut u32) {
    match SyntaxKind::of(&node) {
        SyntaxKind::If | SyntaxKind::Elif | SyntaxKind::Ternary | SyntaxKind::Case => {
            *conditionals += 1
        }
        SyntaxKind::For | SyntaxKind::While | SyntaxKind::ForInClause => *loops += 1,
        _ => {}
    }
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        count_branches_into(child, conditionals, loops);
    }
}

/// Aggregate metrics: the sum of the given function complexities plus a
/// flat baseline of 1 for top-level code, with file-wide branch counters
/// and the derived rating.
pub fn aggregate(
    function_complexities: impl Iterator<Item = u32>,
    root: Node,
    thresholds: &RatingThresholds,
) -> ComplexityMetrics {
    let total = 1 + function_complexities.sum::<u32>();
    let (conditionals, loops) = count_branches(root);
    ComplexityMetrics {
        total,
        conditionals,
        loops,
        rating: thresholds.rate(total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::parser;

    fn body_of_first_function(parsed: &parser::ParsedSource) -> u32 {
        let root = parsed.root();
        let mut cursor = root.walk();
        for stmt in root.named_children(&mut cursor) {
            if SyntaxKind::of(&stmt) == SyntaxKind::FunctionDef {
                let body = stmt.child_by_field_name("body").unwrap();
                return function_complexity(body);
            }
        }
        panic!("no function in fixture");
    }

    #[test]
    fn test_straight_line_function_is_one() {
        let parsed = parser::parse("def f(x):\n    return x\n", "t.py").unwrap();
        assert_eq!(body_of_first_function(&parsed), 1);
    }

    #[test]
    fn test_if_elif_else_chain() {
        // 1 base + if + elif; else adds nothing.
        let source = "def f(x, y):\n    if x:\n        pass\n    elif y:\n        pass\n    else:\n        pass\n";
        let parsed = parser::parse(source, "t.py").unwrap();
        assert_eq!(body_of_first_function(&parsed), 3);
    }

    #[test]
    fn test_boolean_operators_count() {
        // 1 base + if + and + or = 4
        let source = "def f(a, b, c):\n    if a and b or c:\n        return 1\n    return 0\n";
        let parsed = parser::parse(source, "t.py").unwrap();
        assert_eq!(body_of_first_function(&parsed), 4);
    }

    #[test]
    fn test_loops_and_comprehension_clauses() {
        // 1 base + for + while + for_in_clause = 4
        let source = "def f(xs):\n    for x in xs:\n        pass\n    while xs:\n        break\n    return [x for x in xs]\n";
        let parsed = parser::parse(source, "t.py").unwrap();
        assert_eq!(body_of_first_function(&parsed), 4);
    }

    #[test]
    fn test_except_clauses_count() {
        // 1 base + 2 except; try/finally add nothing.
        let source = "def f():\n    try:\n        work()\n    except ValueError:\n        pass\n    except KeyError:\n        pass\n    finally:\n        done()\n";
        let parsed = parser::parse(source, "t.py").unwrap();
        assert_eq!(body_of_first_function(&parsed), 3);
    }

    #[test]
    fn test_match_arms_count() {
        // 1 base + 2 case arms; the match itself adds nothing.
        let source = "def f(x):\n    match x:\n        case 1:\n            pass\n        case _:\n            pass\n";
        let parsed = parser::parse(source, "t.py").unwrap();
        assert_eq!(body_of_first_function(&parsed), 3);
    }

    #[test]
    fn test_nested_def_counts_toward_enclosing() {
        // The nested function is not reported separately; its branch
        // contributes to the enclosing function's score.
        let source = "def outer(x):\n    def inner(y):\n        if y:\n            return 1\n        return 0\n    return inner(x)\n";
        let parsed = parser::parse(source, "t.py").unwrap();
        assert_eq!(body_of_first_function(&parsed), 2);
    }

    #[test]
    fn test_file_wide_branch_counters() {
        let source = "if ready:\n    x = 1\nfor i in items:\n    y = [j for j in i]\n";
        let parsed = parser::parse(source, "t.py").unwrap();
        let (conditionals, loops) = count_branches(parsed.root());
        assert_eq!(conditionals, 1);
        assert_eq!(loops, 2);
    }

    #[test]
    fn test_aggregate_baseline_and_rating() {
        let parsed = parser::parse("x = 1\n", "t.py").unwrap();
        let metrics = aggregate(std::iter::empty(), parsed.root(), &RatingThresholds::default());
        assert_eq!(metrics.total, 1);
        assert_eq!(metrics.rating, Rating::Simple);
        assert_eq!(metrics.conditionals, 0);
        assert_eq!(metrics.loops, 0);
    }

    #[test]
    fn test_rating_threshold_boundaries() {
        let t = RatingThresholds::default();
        assert_eq!(t.rate(9), Rating::Simple);
        assert_eq!(t.rate(10), Rating::Moderate);
        assert_eq!(t.rate(50), Rating::Moderate);
        assert_eq!(t.rate(51), Rating::Complex);
    }

    #[test]
    fn test_custom_thresholds() {
        let t = RatingThresholds {
            simple_below: 2,
            moderate_max: 3,
        };
        assert_eq!(t.rate(1), Rating::Simple);
        assert_eq!(t.rate(2), Rating::Moderate);
        assert_eq!(t.rate(4), Rating::Complex);
    }
}
