//! Cyclomatic complexity of Python functions, methods and classes.
//!
//! Counting follows the usual Python conventions: every `if`, `elif`,
//! loop, `except` clause, conditional expression, boolean operator,
//! comprehension clause, `assert` and `case` adds one, and so does an
//! `else` attached to a loop or `try`. Plain `if`/`else` branches do not.

use tree_sitter::{Node, Parser};

use super::maintainability::maintainability_index;
use super::{ComplexityError, ComplexityResult, EngineKind, FileMetrics, MetricsEngine};
use crate::analysis::preorder;
use crate::protocol::ComplexityEntry;

/// Engine backed by the tree-sitter Python grammar.
pub struct TreeSitterEngine {
    parser: Parser,
}

impl TreeSitterEngine {
    /// Create the engine, loading the Python grammar.
    pub fn new() -> ComplexityResult<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|_| ComplexityError::LanguageInit)?;
        Ok(Self { parser })
    }
}

impl MetricsEngine for TreeSitterEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::TreeSitter
    }

    fn analyze(&mut self, source: &str) -> ComplexityResult<FileMetrics> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or(ComplexityError::ParseError)?;
        let root = tree.root_node();

        if root.has_error() {
            let line = first_error_line(root).unwrap_or(1);
            return Err(ComplexityError::Syntax { line });
        }

        let functions = collect_units(&root, source);
        let total = functions.iter().map(|f| f.complexity).sum::<u32>() + count_decisions(&root);
        let mi = maintainability_index(&root, source, total);

        Ok(FileMetrics {
            functions,
            maintainability_index: Some((mi * 100.0).round() / 100.0),
            note: None,
        })
    }
}

/// Every reported unit: top-level functions in source order, then each
/// class followed by its methods and nested classes.
pub fn collect_units(root: &Node, source: &str) -> Vec<ComplexityEntry> {
    let mut functions = Vec::new();
    let mut classes = Vec::new();
    find_definitions(*root, &mut functions, &mut classes);

    let mut units: Vec<ComplexityEntry> = functions
        .iter()
        .map(|f| entry(f, source, function_complexity(f)))
        .collect();

    classes.reverse();
    while let Some(class) = classes.pop() {
        let mut inner = push_class(&class, source, &mut units);
        inner.reverse();
        classes.extend(inner);
    }
    units
}

/// Push the entries of `class` and its methods; return its nested classes.
fn push_class<'t>(
    class: &Node<'t>,
    source: &str,
    units: &mut Vec<ComplexityEntry>,
) -> Vec<Node<'t>> {
    let mut methods = Vec::new();
    let mut inner = Vec::new();
    let body = class.child_by_field_name("body");
    if let Some(body) = body {
        find_definitions(body, &mut methods, &mut inner);
    }

    let method_scores: Vec<u32> = methods.iter().map(function_complexity).collect();
    let own = body.map(|body| count_decisions(&body)).unwrap_or(0);
    let real = 1 + own + method_scores.iter().sum::<u32>();
    let score = match method_scores.len() {
        0 => real,
        n => real / n as u32 + u32::from(n > 1),
    };

    units.push(entry(class, source, score));
    for (method, score) in methods.iter().zip(method_scores) {
        units.push(entry(method, source, score));
    }
    inner
}

/// Collect function and class definitions below `node` without entering
/// any definition body.
fn find_definitions<'t>(
    node: Node<'t>,
    functions: &mut Vec<Node<'t>>,
    classes: &mut Vec<Node<'t>>,
) {
    preorder(node, |child| {
        if child == node {
            return true;
        }
        if !child.is_named() {
            return false;
        }
        let def = if child.kind() == "decorated_definition" {
            match child.child_by_field_name("definition") {
                Some(def) => def,
                None => return false,
            }
        } else {
            child
        };

        match def.kind() {
            "function_definition" => functions.push(def),
            "class_definition" => classes.push(def),
            _ => return true,
        }
        false
    });
}

/// 1 plus the decision points in the function body.
pub fn function_complexity(function: &Node) -> u32 {
    1 + function
        .child_by_field_name("body")
        .map(|body| count_decisions(&body))
        .unwrap_or(0)
}

/// Decision points below `node`, not descending into nested definitions.
pub fn count_decisions(node: &Node) -> u32 {
    let root = *node;
    let mut count = 0;
    preorder(root, |child| {
        if child == root {
            return true;
        }
        if !child.is_named() {
            return false;
        }
        count += match child.kind() {
            "function_definition" | "class_definition" | "decorated_definition" => return false,
            "if_statement" | "elif_clause" | "except_clause" | "except_group_clause"
            | "conditional_expression" | "boolean_operator" | "for_in_clause" | "if_clause"
            | "assert_statement" | "case_clause" => 1,
            "for_statement" | "while_statement" => 1 + u32::from(has_else(&child)),
            "try_statement" => u32::from(has_else(&child)),
            _ => 0,
        };
        true
    });
    count
}

fn has_else(node: &Node) -> bool {
    let mut cursor = node.walk();
    let found = node
        .named_children(&mut cursor)
        .any(|c| c.kind() == "else_clause");
    found
}

fn entry(node: &Node, source: &str, complexity: u32) -> ComplexityEntry {
    let name = node
        .child_by_field_name("name")
        .and_then(|n| source.get(n.start_byte()..n.end_byte()))
        .unwrap_or("<anonymous>")
        .to_string();

    ComplexityEntry {
        name,
        complexity,
        line: node.start_position().row + 1,
    }
}

/// 1-based line of the first error or missing node.
fn first_error_line(root: Node) -> Option<usize> {
    let mut line = None;
    preorder(root, |node| {
        if line.is_some() {
            return false;
        }
        if node.is_error() || node.is_missing() {
            line = Some(node.start_position().row + 1);
            return false;
        }
        node.has_error()
    });
    line
}
