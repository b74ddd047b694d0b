//! Maintainability index of a Python file.
//!
//! Uses the common formula
//!
//! ```text
//! MI = max(0, (171 - 5.2 ln V - 0.23 G - 16.2 ln L + 50 sin(sqrt(2.46 C))) * 100 / 171)
//! ```
//!
//! where `V` is the Halstead volume, `G` the total cyclomatic complexity,
//! `L` the number of logical lines and `C` the share of comment lines in
//! radians. Docstrings count as comments.
//!
//! Only arithmetic, unary, boolean and comparison operations and augmented
//! assignments enter the Halstead counts. Operands are identified by name,
//! attribute name or literal text within the enclosing function; any other
//! operand expression is distinct from every other.

use std::collections::HashSet;

use tree_sitter::Node;

use crate::analysis::preorder;

/// Halstead operator/operand counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Halstead {
    pub distinct_operators: usize,
    pub distinct_operands: usize,
    pub total_operators: usize,
    pub total_operands: usize,
}

impl Halstead {
    /// Program volume `N * log2(n)`.
    pub fn volume(&self) -> f64 {
        let vocabulary = self.distinct_operators + self.distinct_operands;
        if vocabulary == 0 {
            return 0.0;
        }
        let length = self.total_operators + self.total_operands;
        length as f64 * (vocabulary as f64).log2()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Operand<'s> {
    Text(&'s str),
    Expression(usize),
}

/// Count operators and operands of the operations below `root`.
pub fn halstead(root: &Node, source: &str) -> Halstead {
    let mut operators = HashSet::new();
    let mut operands = HashSet::new();
    let mut chained = HashSet::new();
    let mut counts = Halstead::default();

    let mut stack: Vec<(Node, Option<&str>)> = vec![(*root, None)];
    while let Some((node, scope)) = stack.pop() {
        if node.kind() == "function_definition" {
            // Only the body is scored, under the function's own scope.
            let name = node
                .child_by_field_name("name")
                .and_then(|n| source.get(n.byte_range()));
            if let Some(body) = node.child_by_field_name("body") {
                stack.push((body, name));
            }
            continue;
        }

        if let Some((ops, args)) = operation(node, &mut chained) {
            counts.total_operators += ops.len();
            operators.extend(ops);
            counts.total_operands += args.len();
            operands.extend(args.into_iter().map(|arg| (scope, operand(arg, source))));
        }

        let mut cursor = node.walk();
        stack.extend(node.named_children(&mut cursor).map(|child| (child, scope)));
    }

    counts.distinct_operators = operators.len();
    counts.distinct_operands = operands.len();
    counts
}

/// Operators and operands of `node` when it is an operation.
///
/// A run of the same boolean operator (`a and b and c`) is one operation;
/// its inner links are remembered in `chained` and skipped when reached.
fn operation<'t>(
    node: Node<'t>,
    chained: &mut HashSet<usize>,
) -> Option<(Vec<&'static str>, Vec<Node<'t>>)> {
    let field = |name: &str| node.child_by_field_name(name);

    match node.kind() {
        "binary_operator" => {
            let op = field("operator")?.kind();
            Some((vec![op], field("left").into_iter().chain(field("right")).collect()))
        }
        "augmented_assignment" => {
            // `x += 1` shares its operator with `x + 1`
            let op = field("operator")?.kind().trim_end_matches('=');
            Some((vec![op], field("left").into_iter().chain(field("right")).collect()))
        }
        "unary_operator" => {
            let op = match field("operator")?.kind() {
                "-" => "usub",
                "+" => "uadd",
                "~" => "invert",
                other => other,
            };
            Some((vec![op], field("argument").into_iter().collect()))
        }
        "not_operator" => Some((vec!["not"], field("argument").into_iter().collect())),
        "boolean_operator" => {
            if chained.remove(&node.id()) {
                return None;
            }
            let op = field("operator")?.kind();
            let mut args = Vec::new();
            let mut link = node;
            loop {
                args.extend(link.child_by_field_name("right"));
                match link.child_by_field_name("left") {
                    Some(left)
                        if left.kind() == "boolean_operator"
                            && left.child_by_field_name("operator").map(|o| o.kind()) == Some(op) =>
                    {
                        chained.insert(left.id());
                        link = left;
                    }
                    left => {
                        args.extend(left);
                        break;
                    }
                }
            }
            args.reverse();
            Some((vec![op], args))
        }
        "comparison_operator" => {
            let mut cursor = node.walk();
            let ops = node
                .children_by_field_name("operators", &mut cursor)
                .map(|op| op.kind())
                .collect();
            let mut cursor = node.walk();
            let args = node
                .named_children(&mut cursor)
                .filter(|c| c.kind() != "comment")
                .collect();
            Some((ops, args))
        }
        _ => None,
    }
}

fn operand<'s>(node: Node, source: &'s str) -> Operand<'s> {
    let mut node = node;
    while node.kind() == "parenthesized_expression" {
        match node.named_child(0) {
            Some(inner) => node = inner,
            None => break,
        }
    }

    let named = match node.kind() {
        "identifier" | "integer" | "float" | "string" | "concatenated_string" | "true"
        | "false" | "none" => Some(node),
        "attribute" => node.child_by_field_name("attribute"),
        _ => None,
    };
    match named.and_then(|n| source.get(n.byte_range())) {
        Some(text) => Operand::Text(text),
        None => Operand::Expression(node.id()),
    }
}

/// Line counts used by the index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineMetrics {
    /// Non-blank lines holding code, not only a comment or docstring.
    pub sloc: usize,
    /// Logical lines (statements and clause headers).
    pub lloc: usize,
    /// Lines holding a `#` comment.
    pub comments: usize,
    /// Lines covered by string-only statements (docstrings).
    pub multi: usize,
}

impl LineMetrics {
    /// Comment and docstring lines as a percentage of `sloc`.
    pub fn comment_percent(&self) -> f64 {
        if self.sloc == 0 {
            return 0.0;
        }
        100.0 * (self.comments + self.multi) as f64 / self.sloc as f64
    }
}

/// Kinds that open a logical line besides `*_statement` nodes.
const LOGICAL_KINDS: &[&str] = &[
    "function_definition",
    "class_definition",
    "decorator",
    "elif_clause",
    "else_clause",
    "except_clause",
    "except_group_clause",
    "finally_clause",
    "case_clause",
];

/// Count source, logical, comment and docstring lines.
pub fn line_metrics(root: &Node, source: &str) -> LineMetrics {
    let lines: Vec<&str> = source.lines().collect();
    let mut metrics = LineMetrics::default();
    let mut comment_rows = HashSet::new();
    let mut non_code_rows = HashSet::new();

    preorder(*root, |node| {
        let kind = node.kind();
        if !node.is_named() {
            return false;
        }
        if kind == "comment" {
            let row = node.start_position().row;
            comment_rows.insert(row);
            let before = lines
                .get(row)
                .and_then(|line| line.get(..node.start_position().column))
                .unwrap_or("");
            if before.trim().is_empty() {
                non_code_rows.insert(row);
            }
            return false;
        }
        if kind.ends_with("_statement") || LOGICAL_KINDS.contains(&kind) {
            metrics.lloc += 1;
        }
        if kind == "expression_statement" && is_docstring(&node) {
            let (start, end) = (node.start_position().row, node.end_position().row);
            metrics.multi += end - start + 1;
            non_code_rows.extend(start..=end);
            return false;
        }
        true
    });

    metrics.comments = comment_rows.len();
    metrics.sloc = lines
        .iter()
        .enumerate()
        .filter(|(row, line)| !line.trim().is_empty() && !non_code_rows.contains(row))
        .count();
    metrics
}

fn is_docstring(statement: &Node) -> bool {
    statement.named_child_count() == 1
        && statement
            .named_child(0)
            .is_some_and(|c| c.kind() == "string" || c.kind() == "concatenated_string")
}

/// Combine the raw measures into the index, clamped to `0..=100`.
pub fn compute(volume: f64, complexity: u32, lloc: usize, comment_percent: f64) -> f64 {
    if volume <= 0.0 || lloc == 0 {
        return 100.0;
    }
    let comments = (2.46 * comment_percent.to_radians()).sqrt().sin();
    let raw = 171.0 - 5.2 * volume.ln() - 0.23 * f64::from(complexity) - 16.2 * (lloc as f64).ln()
        + 50.0 * comments;
    (raw * 100.0 / 171.0).clamp(0.0, 100.0)
}

/// Maintainability index of the parsed file, unrounded.
pub fn maintainability_index(root: &Node, source: &str, total_complexity: u32) -> f64 {
    let volume = halstead(root, source).volume();
    let lines = line_metrics(root, source);
    compute(volume, total_complexity, lines.lloc, lines.comment_percent())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use tree_sitter::{Parser, Tree};

    fn parse(source: &str) -> Tree {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .unwrap();
        parser.parse(source, None).unwrap()
    }

    #[test]
    fn test_compute_degenerate_inputs() {
        assert_eq!(compute(0.0, 1, 10, 0.0), 100.0);
        assert_eq!(compute(10.0, 1, 0, 0.0), 100.0);
    }

    #[test]
    fn test_compute_is_clamped() {
        assert_eq!(compute(1e12, 500, 100_000, 0.0), 0.0);
        let mi = compute(20.0, 1, 2, 0.0);
        assert!(mi > 0.0 && mi <= 100.0);
    }

    #[test]
    fn test_more_complexity_lowers_index() {
        let simple = compute(100.0, 1, 10, 10.0);
        let complex = compute(100.0, 20, 10, 10.0);
        assert!(complex < simple);
    }

    #[test]
    fn test_comments_raise_index() {
        let bare = compute(100.0, 5, 10, 0.0);
        let commented = compute(100.0, 5, 10, 30.0);
        assert!(commented > bare);
    }

    fn counts(source: &str) -> Halstead {
        let tree = parse(source);
        halstead(&tree.root_node(), source)
    }

    #[test]
    fn test_halstead_counts() {
        // operators: +   operands: a a
        let h = counts("x = a + a\n");
        assert_eq!(h.total_operators, 1);
        assert_eq!(h.distinct_operators, 1);
        assert_eq!(h.total_operands, 2);
        assert_eq!(h.distinct_operands, 1);
        assert!((h.volume() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_plain_statements_have_no_volume() {
        let h = counts("import os\n\ndef f(path):\n    x = os.path.join(path, 'a')\n    return x\n");
        assert_eq!(h, Halstead::default());
        assert_eq!(h.volume(), 0.0);
    }

    #[test]
    fn test_boolean_chain_is_one_operation() {
        let h = counts("ok = a and b and c\n");
        assert_eq!(h.total_operators, 1);
        assert_eq!(h.total_operands, 3);

        let h = counts("ok = a and b or c\n");
        assert_eq!(h.total_operators, 2);
        assert_eq!(h.distinct_operators, 2);
        // (a and b), c, a, b
        assert_eq!(h.total_operands, 4);
    }

    #[test]
    fn test_comparison_chain() {
        let h = counts("ok = a < b <= c not in d\n");
        assert_eq!(h.total_operators, 3);
        assert_eq!(h.distinct_operators, 3);
        assert_eq!(h.total_operands, 4);
        assert_eq!(h.distinct_operands, 4);
    }

    #[test]
    fn test_augmented_assignment_shares_binary_operator() {
        let h = counts("x += -a\ny = (a) + 1\nz = not y\n");
        // +, usub, +, not
        assert_eq!(h.total_operators, 4);
        assert_eq!(h.distinct_operators, 3);
        // x, -a, a, a, 1, y
        assert_eq!(h.total_operands, 6);
        assert_eq!(h.distinct_operands, 5);
    }

    #[test]
    fn test_operands_are_scoped_by_function() {
        let h = counts("def f(a):\n    return a + 1\n\ndef g(a):\n    return a + 1\n");
        assert_eq!(h.total_operands, 4);
        assert_eq!(h.distinct_operands, 4);
        assert_eq!(h.distinct_operators, 1);
    }

    #[test]
    fn test_line_metrics() {
        let source = indoc! {r#"
            """Module docs
            over two lines."""
            # a comment
            import os  # trailing

            def f():
                return os.sep
        "#};
        let tree = parse(source);
        let lines = line_metrics(&tree.root_node(), source);

        assert_eq!(
            lines,
            LineMetrics {
                // import, def, return
                sloc: 3,
                // docstring, import, def, return
                lloc: 4,
                comments: 2,
                multi: 2,
            }
        );
    }

    #[test]
    fn test_clause_headers_are_logical_lines() {
        let source = indoc! {"
            try:
                x = 1
            except ValueError:
                x = 2
            else:
                x = 3
            finally:
                pass
        "};
        let tree = parse(source);
        assert_eq!(line_metrics(&tree.root_node(), source).lloc, 8);
    }
}
