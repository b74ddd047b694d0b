//! Import extraction for Python and JavaScript/TypeScript sources.
//!
//! Python files are parsed with tree-sitter; when the tree contains syntax
//! errors we fall back to a line-anchored pattern so a half-edited file
//! still reports its imports. Script files are scanned with patterns only:
//! their import forms vary too much to be worth a full parse here.
//!
//! Every extractor returns raw specifiers exactly as written, deduplicated
//! with the first occurrence kept.

use std::collections::{HashSet, VecDeque};

use once_cell::sync::Lazy;
use regex::Regex;
use tree_sitter::{Node, Parser};

/// `import x` / `from x import ...` at the start of a line.
static PY_LINE_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*(?:from\s+([\w.]+)\s+import|import\s+([\w.]+))").unwrap()
});

/// `require("x")` / `require('x')`
static REQUIRE_CALL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"require\s*\(\s*["']([^"']+)["']"#).unwrap());

/// `import x from "x"`, `import { a } from "x"`, `import * as x from "x"`
static IMPORT_FROM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"import\s+.*?\s+from\s+["']([^"']+)["']"#).unwrap());

/// `import "x"` with no binding clause.
static IMPORT_BARE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"import\s+["']([^"']+)["']"#).unwrap());

/// Source dialects with a dedicated import extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Python, parsed into a syntax tree.
    Python,
    /// JavaScript/TypeScript module systems, scanned with patterns.
    Script,
}

impl Dialect {
    /// Determine dialect from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "py" => Some(Dialect::Python),
            "js" | "jsx" | "ts" | "tsx" | "mjs" | "cjs" => Some(Dialect::Script),
            _ => None,
        }
    }
}

/// Extracts raw import specifiers from source text.
pub struct ImportExtractor {
    python_parser: Option<Parser>,
}

impl ImportExtractor {
    /// Create a new extractor.
    ///
    /// If the Python grammar cannot be loaded, Python sources are handled
    /// by the line-pattern fallback for the lifetime of this extractor.
    pub fn new() -> Self {
        let mut parser = Parser::new();
        let python_parser = match parser.set_language(&tree_sitter_python::LANGUAGE.into()) {
            Ok(()) => Some(parser),
            Err(e) => {
                tracing::warn!(error = %e, "python grammar unavailable, using line patterns");
                None
            }
        };

        Self { python_parser }
    }

    /// Extract imports from `source` written in `dialect`.
    pub fn extract(&mut self, source: &str, dialect: Dialect) -> Vec<String> {
        let found = match dialect {
            Dialect::Python => self.extract_python(source),
            Dialect::Script => extract_script(source),
        };
        dedup_first(found)
    }

    fn extract_python(&mut self, source: &str) -> Vec<String> {
        let Some(parser) = self.python_parser.as_mut() else {
            return extract_python_lines(source);
        };

        let tree = match parser.parse(source, None) {
            Some(tree) if !tree.root_node().has_error() => tree,
            _ => {
                tracing::debug!("python source has syntax errors, using line patterns");
                return extract_python_lines(source);
            }
        };

        python_imports(tree.root_node(), source)
    }
}

impl Default for ImportExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Node kinds that only group statements and do not add a nesting level.
const TRANSPARENT_KINDS: &[&str] = &["block", "else_clause", "finally_clause"];

/// Collect module names level by level: every import of the module body
/// comes before any import nested inside a definition or compound
/// statement, and so on down.
fn python_imports(root: Node, source: &str) -> Vec<String> {
    let mut imports = Vec::new();
    let mut queue = VecDeque::from([root]);

    while let Some(node) = queue.pop_front() {
        match node.kind() {
            "import_statement" => {
                // import a.b, c as d
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    let name = match child.kind() {
                        "dotted_name" => Some(child),
                        "aliased_import" => child.child_by_field_name("name"),
                        _ => None,
                    };
                    if let Some(text) = name.and_then(|n| node_text(&n, source)) {
                        imports.push(text.to_string());
                    }
                }
            }
            "import_from_statement" => {
                if let Some(module) = from_import_module(&node, source) {
                    imports.push(module);
                }
            }
            "future_import_statement" => {
                imports.push("__future__".to_string());
            }
            _ => {}
        }
        enqueue_children(node, &mut queue);
    }
    imports
}

/// Queue the children of `node` in source order, replacing grouping
/// nodes by their own children.
fn enqueue_children<'t>(node: Node<'t>, queue: &mut VecDeque<Node<'t>>) {
    let mut pending = named_children_rev(node);
    while let Some(child) = pending.pop() {
        if TRANSPARENT_KINDS.contains(&child.kind()) {
            pending.extend(named_children_rev(child));
        } else {
            queue.push_back(child);
        }
    }
}

fn named_children_rev(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    let mut children: Vec<_> = node.named_children(&mut cursor).collect();
    children.reverse();
    children
}

/// Module named by `from <module> import ...`.
///
/// Relative modules keep their leading dots. A bare `from . import x`
/// names no module and yields nothing.
fn from_import_module(node: &Node, source: &str) -> Option<String> {
    let module = node.child_by_field_name("module_name")?;
    if module.kind() == "relative_import" {
        let mut cursor = module.walk();
        let has_name = module
            .children(&mut cursor)
            .any(|c| c.kind() == "dotted_name");
        if !has_name {
            return None;
        }
    }
    node_text(&module, source).map(|s| s.to_string())
}

fn node_text<'a>(node: &Node, source: &'a str) -> Option<&'a str> {
    source.get(node.start_byte()..node.end_byte())
}

/// Line-pattern extraction for Python sources that do not parse.
pub fn extract_python_lines(source: &str) -> Vec<String> {
    PY_LINE_IMPORT
        .captures_iter(source)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Pattern extraction for script sources.
///
/// The three patterns run over the whole text one after another, so the
/// result is grouped by pattern and then by position.
pub fn extract_script(source: &str) -> Vec<String> {
    // `import { a } from "./sibling"; const b = require("lodash");` must
    // report ["./sibling", "lodash"], so `require` runs last.
    [&*IMPORT_FROM, &*IMPORT_BARE, &*REQUIRE_CALL]
        .into_iter()
        .flat_map(|pattern| {
            pattern
                .captures_iter(source)
                .filter_map(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Drop repeated entries, keeping each at its first position.
pub fn dedup_first(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn python(source: &str) -> Vec<String> {
        ImportExtractor::new().extract(source, Dialect::Python)
    }

    fn script(source: &str) -> Vec<String> {
        ImportExtractor::new().extract(source, Dialect::Script)
    }

    #[test]
    fn test_dialect_from_extension() {
        assert_eq!(Dialect::from_extension("py"), Some(Dialect::Python));
        assert_eq!(Dialect::from_extension("PY"), Some(Dialect::Python));
        for ext in ["js", "jsx", "ts", "tsx", "mjs", "cjs"] {
            assert_eq!(Dialect::from_extension(ext), Some(Dialect::Script));
        }
        assert_eq!(Dialect::from_extension("rs"), None);
        assert_eq!(Dialect::from_extension(""), None);
    }

    // ===== Python =====

    #[test]
    fn test_python_relative_and_plain() {
        assert_eq!(
            python("from ..utils import helper\nimport os"),
            vec!["..utils", "os"]
        );
    }

    #[test]
    fn test_python_multiple_and_aliased() {
        let source = "import os.path, sys as system\nfrom collections.abc import Mapping, Sequence\n";
        assert_eq!(python(source), vec!["os.path", "sys", "collections.abc"]);
    }

    #[test]
    fn test_python_bare_relative_import_is_skipped() {
        assert_eq!(python("from . import sibling\nimport json\n"), vec!["json"]);
    }

    #[test]
    fn test_python_future_import() {
        assert_eq!(
            python("from __future__ import annotations\nimport typing\n"),
            vec!["__future__", "typing"]
        );
    }

    #[test]
    fn test_python_ignores_imports_in_strings_and_comments() {
        let source = indoc! {r#"
            # import fake_comment
            DOC = """
            import fake_string
            """
            import real
        "#};
        assert_eq!(python(source), vec!["real"]);
    }

    #[test]
    fn test_python_module_level_imports_come_first() {
        let source = indoc! {"
            import first
            def load():
                import json
                return json
            import last
        "};
        assert_eq!(python(source), vec!["first", "last", "json"]);
    }

    #[test]
    fn test_python_imports_ordered_by_nesting_level() {
        let source = indoc! {"
            try:
                import fast
            except ImportError:
                import slow
            else:
                import extra
            finally:
                import cleanup
            if DEBUG:
                import pdb
            elif TRACE:
                import trace
            class Loader:
                def load(self):
                    import deep
            import tail
        "};
        assert_eq!(
            python(source),
            vec!["tail", "fast", "extra", "cleanup", "pdb", "slow", "trace", "deep"]
        );
    }

    #[test]
    fn test_python_deeply_nested_expression() {
        let depth = 30_000;
        let source = format!(
            "import os\nx = {}1{}\nimport sys\n",
            "(".repeat(depth),
            ")".repeat(depth)
        );
        assert_eq!(python(&source), vec!["os", "sys"]);
    }

    #[test]
    fn test_python_dedup_keeps_first_position() {
        let source = "import a\nimport b\nimport a\nfrom c import d\n";
        assert_eq!(python(source), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_python_syntax_error_uses_line_fallback() {
        let source = indoc! {"
            import os
            from pkg.mod import thing
            def broken(:
                pass
              import indented
        "};
        assert_eq!(python(source), vec!["os", "pkg.mod", "indented"]);
    }

    #[test]
    fn test_python_line_fallback_direct() {
        assert_eq!(
            extract_python_lines("from ..rel import x\nimport a.b\nx = 1 # import no\n"),
            vec!["..rel", "a.b"]
        );
    }

    // ===== Script =====

    #[test]
    fn test_script_order_is_pattern_then_position() {
        let source = r#"import { a } from "./sibling"; const b = require("lodash");"#;
        assert_eq!(script(source), vec!["./sibling", "lodash"]);
    }

    #[test]
    fn test_script_all_forms() {
        let source = indoc! {r#"
            import React from 'react';
            import * as path from "path";
            import './styles.css';
            const fs = require('fs');
        "#};
        assert_eq!(script(source), vec!["react", "path", "./styles.css", "fs"]);
    }

    #[test]
    fn test_script_dedup_across_patterns() {
        let source = indoc! {r#"
            const x = require("shared");
            import y from "shared";
            import "shared";
        "#};
        assert_eq!(script(source), vec!["shared"]);
    }

    #[test]
    fn test_script_dynamic_specifier_is_ignored() {
        assert!(script("const m = require(name);").is_empty());
    }

    #[test]
    fn test_script_garbage_does_not_panic() {
        assert!(script("import {{{ from \n require((( '").is_empty());
    }

    #[test]
    fn test_dedup_first() {
        let items = vec!["x", "y", "x", "z", "y"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(dedup_first(items), vec!["x", "y", "z"]);
    }
}
