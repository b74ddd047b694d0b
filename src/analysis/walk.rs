//! Stack-based traversal of syntax trees.
//!
//! Tree depth follows source nesting, which a caller controls, so walks
//! keep their own stack on the heap instead of recursing.

use tree_sitter::Node;

/// Visit `root` and its descendants in source order, parents first.
///
/// `visit` returns whether the walk should enter the node's children.
///
/// # Example
///
/// ```ignore
/// let mut statements = 0;
/// preorder(tree.root_node(), |node| {
///     if node.kind().ends_with("_statement") {
///         statements += 1;
///     }
///     true
/// });
/// ```
pub fn preorder<'t>(root: Node<'t>, mut visit: impl FnMut(Node<'t>) -> bool) {
    let mut stack = vec![root];
    let mut children = Vec::new();

    while let Some(node) = stack.pop() {
        if !visit(node) {
            continue;
        }
        let mut cursor = node.walk();
        children.extend(node.children(&mut cursor));
        stack.extend(children.drain(..).rev());
    }
}
