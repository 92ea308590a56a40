//! Leaf classification and document-order leaf collection.
//!
//! A "leaf" here is a sampleable terminal: a named node with no named
//! children that is not a comment, not a whitespace/newline marker, and
//! not an error node. The tree root is never a leaf.

use tree_sitter::Node;

/// Maximum tree depth visited while collecting leaves. Subtrees below this
/// depth are truncated from sampling instead of risking stack exhaustion.
pub const MAX_TRAVERSAL_DEPTH: usize = 1200;

/// Upper bound on visited nodes per file; traversal stops once exceeded.
pub const MAX_TRAVERSAL_NODES: usize = 4_000_000;

/// Pure predicate deciding whether a node is a sampleable terminal.
pub fn is_sampleable(node: &Node) -> bool {
    if !node.is_named() || node.named_child_count() != 0 || node.is_error() {
        return false;
    }
    let kind = node.kind();
    if kind == "comment" || kind == "line_comment" || kind == "block_comment" {
        return false;
    }
    !(kind.contains("whitespace") || kind.contains("newline"))
}

/// Collects the ordered sequence of sampleable leaves under `root`,
/// excluding `root` itself.
///
/// The walk is pre-order over named children with an explicit stack; depth
/// and node budgets truncate degenerate trees rather than recurse without
/// bound.
pub fn collect_leaves(root: Node<'_>) -> Vec<Node<'_>> {
    let mut leaves = Vec::new();
    let mut stack: Vec<(Node<'_>, usize)> = Vec::new();
    let mut visited = 0usize;
    let mut truncated = false;

    for i in (0..root.named_child_count()).rev() {
        if let Some(child) = root.named_child(i) {
            stack.push((child, 1));
        }
    }

    while let Some((node, depth)) = stack.pop() {
        visited += 1;
        if visited > MAX_TRAVERSAL_NODES {
            truncated = true;
            break;
        }

        if is_sampleable(&node) {
            leaves.push(node);
        }

        if depth >= MAX_TRAVERSAL_DEPTH {
            if node.named_child_count() > 0 {
                truncated = true;
            }
            continue;
        }
        for i in (0..node.named_child_count()).rev() {
            if let Some(child) = node.named_child(i) {
                stack.push((child, depth + 1));
            }
        }
    }

    if truncated {
        tracing::warn!(
            "leaf collection truncated (depth limit {}, node limit {})",
            MAX_TRAVERSAL_DEPTH,
            MAX_TRAVERSAL_NODES
        );
    }

    leaves
}
