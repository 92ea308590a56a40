//! Lowest-common-ancestor computation and structural path construction.
//!
//! Both ancestor chains are aligned at the root before they are compared
//! level by level, so endpoints sitting at different depths never shift
//! the comparison onto the wrong chain index.

use tree_sitter::Node;

/// Ancestor chain from `node` (inclusive) up to the tree root (inclusive).
fn ancestors(node: Node<'_>) -> Vec<Node<'_>> {
    let mut chain = Vec::new();
    let mut current = Some(node);
    while let Some(n) = current {
        chain.push(n);
        current = n.parent();
    }
    chain
}

/// Deepest node shared by both ancestor chains, or `None` when the nodes
/// belong to disjoint trees.
pub fn lowest_common_ancestor<'t>(a: Node<'t>, b: Node<'t>) -> Option<Node<'t>> {
    if a == b {
        return Some(a);
    }
    let chain_a = ancestors(a);
    let chain_b = ancestors(b);

    // Walking both chains downward from the root keeps the comparison
    // depth-aligned regardless of how much deeper one node sits.
    let mut lca = None;
    for (x, y) in chain_a.iter().rev().zip(chain_b.iter().rev()) {
        if x == y {
            lca = Some(*x);
        } else {
            break;
        }
    }
    lca
}

/// Ordered structural path connecting `a` to `b` through their LCA.
///
/// The path climbs from `a` to the LCA (exclusive) keeping named non-error
/// nodes, then descends to `b` (the reversed upward walk from `b`). For
/// sampleable leaves the endpoints are therefore `a` itself and `b`
/// itself. An empty result means the pair carries no usable path and must
/// be skipped by the caller.
pub fn path_between<'t>(a: Node<'t>, b: Node<'t>) -> Vec<Node<'t>> {
    let lca = match lowest_common_ancestor(a, b) {
        Some(lca) => lca,
        None => return Vec::new(),
    };

    let mut path = climb_to(a, lca);
    let descent = climb_to(b, lca);
    path.extend(descent.into_iter().rev());
    path
}

/// Nodes from `start` (inclusive) up to `stop` (exclusive), filtered to
/// named non-error nodes, in upward order.
fn climb_to<'t>(start: Node<'t>, stop: Node<'t>) -> Vec<Node<'t>> {
    let mut nodes = Vec::new();
    let mut current = Some(start);
    while let Some(n) = current {
        if n == stop {
            break;
        }
        if n.is_named() && !n.is_error() {
            nodes.push(n);
        }
        current = n.parent();
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{collect_leaves, node_text, AstParser, SourceLanguage};

    fn parse_c(source: &[u8]) -> tree_sitter::Tree {
        AstParser::new()
            .unwrap()
            .parse(source, SourceLanguage::C)
            .unwrap()
    }

    #[test]
    fn lca_of_node_with_itself_is_the_node() {
        let tree = parse_c(b"int x = 1;");
        let leaves = collect_leaves(tree.root_node());
        let first = leaves[0];
        assert_eq!(lowest_common_ancestor(first, first), Some(first));
    }

    #[test]
    fn lca_of_siblings_is_a_shared_ancestor_of_both() {
        let source = b"int x = 1;";
        let tree = parse_c(source);
        let leaves = collect_leaves(tree.root_node());
        assert!(leaves.len() >= 2);

        let (a, b) = (leaves[0], leaves[leaves.len() - 1]);
        let lca = lowest_common_ancestor(a, b).expect("same tree must share an ancestor");

        let mut cur = Some(a);
        assert!(std::iter::from_fn(|| {
            let n = cur?;
            cur = n.parent();
            Some(n)
        })
        .any(|n| n == lca));
    }

    #[test]
    fn lca_handles_leaves_at_different_depths() {
        // `y` sits deeper (inside the function body) than the outer `x`.
        let source = b"int x; void f(void) { int y = 2; }";
        let tree = parse_c(source);
        let leaves = collect_leaves(tree.root_node());

        let x = leaves
            .iter()
            .find(|n| node_text(n, source) == "x")
            .copied()
            .unwrap();
        let two = leaves
            .iter()
            .find(|n| node_text(n, source) == "2")
            .copied()
            .unwrap();

        let lca = lowest_common_ancestor(x, two).unwrap();
        assert_eq!(lca, tree.root_node());
    }

    #[test]
    fn path_endpoints_are_the_leaves_themselves() {
        let source = b"int x = 1;";
        let tree = parse_c(source);
        let leaves = collect_leaves(tree.root_node());
        let (a, b) = (leaves[0], leaves[leaves.len() - 1]);

        let path = path_between(a, b);
        assert!(!path.is_empty());
        assert_eq!(path[0], a);
        assert_eq!(path[path.len() - 1], b);
    }

    #[test]
    fn path_is_symmetric_under_reversal() {
        let source = b"int a = b + c;";
        let tree = parse_c(source);
        let leaves = collect_leaves(tree.root_node());
        assert!(leaves.len() >= 2);
        let (x, y) = (leaves[0], leaves[leaves.len() - 1]);

        let forward = path_between(x, y);
        let mut backward = path_between(y, x);
        backward.reverse();
        assert_eq!(forward, backward);
    }

    #[test]
    fn path_between_identical_nodes_is_empty() {
        let tree = parse_c(b"int x = 1;");
        let leaves = collect_leaves(tree.root_node());
        assert!(path_between(leaves[0], leaves[0]).is_empty());
    }

    #[test]
    fn path_contains_only_named_non_error_nodes() {
        let source = b"int x = $$$; int y = 1;";
        let tree = parse_c(source);
        let leaves = collect_leaves(tree.root_node());
        assert!(leaves.len() >= 2);

        let path = path_between(leaves[0], leaves[leaves.len() - 1]);
        for node in &path {
            assert!(node.is_named() && !node.is_error());
        }
    }
}
