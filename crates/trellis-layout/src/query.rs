//! Composable node selection.
//!
//! Passes gather the nodes they operate on by chaining filters onto a
//! [`NodeQuery`] and materialising it with [`NodeQuery::collect`], which
//! returns a fresh list every time.

use std::fmt;

use trellis_core::{LayoutError, NodeId};

use crate::tree::{LayoutNode, NodeLookup};

/// A predicate over a node.
#[derive(Clone, Copy)]
pub enum NodeFilter {
    NotAbsolute,
    NotHidden,
    Predicate(fn(&LayoutNode) -> bool),
}

impl fmt::Debug for NodeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeFilter::NotAbsolute => f.write_str("NotAbsolute"),
            NodeFilter::NotHidden => f.write_str("NotHidden"),
            NodeFilter::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl NodeFilter {
    pub fn matches(&self, node: &LayoutNode) -> bool {
        match self {
            NodeFilter::NotAbsolute => !node.absolute,
            NodeFilter::NotHidden => !node.should_hide,
            NodeFilter::Predicate(f) => f(node),
        }
    }
}

/// A list of candidate ids plus the filters they must pass.
#[derive(Debug, Clone)]
pub struct NodeQuery {
    /// Node the candidates were taken from, for error reporting
    origin: NodeId,
    candidates: Vec<NodeId>,
    filters: Vec<NodeFilter>,
}

impl NodeQuery {
    /// All direct children of `parent`, in list order. Empty if `parent` is
    /// missing.
    pub fn children_of<L: NodeLookup + ?Sized>(nodes: &L, parent: NodeId) -> Self {
        let candidates = nodes
            .node(parent)
            .map(|n| n.children.to_vec())
            .unwrap_or_default();
        Self {
            origin: parent,
            candidates,
            filters: Vec::new(),
        }
    }

    pub fn filter(mut self, filter: NodeFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn matching(self, predicate: fn(&LayoutNode) -> bool) -> Self {
        self.filter(NodeFilter::Predicate(predicate))
    }

    /// Only nodes that take part in flow layout.
    pub fn in_flow(self) -> Self {
        self.filter(NodeFilter::NotAbsolute)
            .filter(NodeFilter::NotHidden)
    }

    /// Evaluate the query. Ids missing from `nodes` are skipped and reported
    /// through `on_missing`.
    pub fn collect_with<L, F>(&self, nodes: &L, mut on_missing: F) -> Vec<NodeId>
    where
        L: NodeLookup + ?Sized,
        F: FnMut(LayoutError),
    {
        self.candidates
            .iter()
            .copied()
            .filter(|&id| match nodes.node(id) {
                Some(node) => self.filters.iter().all(|f| f.matches(node)),
                None => {
                    on_missing(LayoutError::NodeNotFound {
                        id,
                        referrer: self.origin,
                    });
                    false
                }
            })
            .collect()
    }

    /// Evaluate the query, logging missing ids.
    pub fn collect<L: NodeLookup + ?Sized>(&self, nodes: &L) -> Vec<NodeId> {
        self.collect_with(nodes, |err| log::error!("{err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::LayoutTree;
    use glam::Vec2;

    fn tree() -> (LayoutTree, NodeId) {
        let mut tree = LayoutTree::new();
        let root = tree.add_root(LayoutNode::new(NodeId(0)));
        tree.add_child(root, LayoutNode::new(NodeId(1)));
        tree.add_child(root, LayoutNode::new(NodeId(2)).hidden());
        tree.add_child(root, LayoutNode::new(NodeId(3)).absolute_at(Vec2::ZERO));
        tree.add_child(root, LayoutNode::new(NodeId(4)));
        (tree, root)
    }

    #[test]
    fn test_in_flow_keeps_order() {
        let (tree, root) = tree();
        let ids = NodeQuery::children_of(&tree, root).in_flow().collect(&tree);
        assert_eq!(ids, vec![NodeId(1), NodeId(4)]);
    }

    #[test]
    fn test_predicate_chain() {
        let (tree, root) = tree();
        let ids = NodeQuery::children_of(&tree, root)
            .filter(NodeFilter::NotHidden)
            .matching(|n| n.id.0 % 2 == 1)
            .collect(&tree);
        assert_eq!(ids, vec![NodeId(1), NodeId(3)]);
    }

    #[test]
    fn test_missing_ids_are_reported() {
        let (mut tree, root) = tree();
        tree.get_mut(root).unwrap().children.push(NodeId(99));

        let mut missing = Vec::new();
        let ids = NodeQuery::children_of(&tree, root).collect_with(&tree, |e| missing.push(e));

        assert_eq!(ids.len(), 4);
        assert_eq!(
            missing,
            vec![LayoutError::NodeNotFound {
                id: NodeId(99),
                referrer: root
            }]
        );
    }
}
