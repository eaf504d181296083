//! Text dump of a laid-out tree.

use std::fmt::{self, Write};

use trellis_core::{Axis, AxisArray, NodeId};

use crate::tree::{LayoutNode, NodeLookup};

/// Render the subtree under `root`, one node per line.
pub fn print_tree<L: NodeLookup + ?Sized>(root: NodeId, nodes: &L) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = write_tree(&mut out, root, nodes);
    out
}

/// Write the subtree under `root` to `out`, indenting two spaces per level.
///
/// Each line holds the node id, its absolute rect, its resolved padding and
/// margin (top, left, right, bottom) and its desired size. Ids missing from
/// `nodes` print as `<missing #id>`.
pub fn write_tree<W: Write, L: NodeLookup + ?Sized>(
    out: &mut W,
    root: NodeId,
    nodes: &L,
) -> fmt::Result {
    write_node(out, root, nodes, 0)
}

fn write_node<W: Write, L: NodeLookup + ?Sized>(
    out: &mut W,
    id: NodeId,
    nodes: &L,
    depth: usize,
) -> fmt::Result {
    let indent = "  ".repeat(depth);
    let Some(node) = nodes.node(id) else {
        return writeln!(out, "{indent}<missing {id}>");
    };

    let rect = node.rect();
    write!(
        out,
        "{indent}{id} rect=({}, {}, {}, {}) padding={} margin={} desired=({}, {})",
        rect.x,
        rect.y,
        rect.width,
        rect.height,
        Sides(&node.computed_padding),
        Sides(&node.computed_margin),
        node.desired[Axis::X],
        node.desired[Axis::Y],
    )?;
    write_flags(out, node)?;
    writeln!(out)?;

    for &child in &node.children {
        write_node(out, child, nodes, depth + 1)?;
    }
    Ok(())
}

fn write_flags<W: Write>(out: &mut W, node: &LayoutNode) -> fmt::Result {
    if node.absolute {
        write!(out, " absolute")?;
    }
    if node.should_hide {
        write!(out, " hidden")?;
    }
    Ok(())
}

struct Sides<'a>(&'a AxisArray<f32>);

impl fmt::Display for Sides<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0;
        write!(
            f,
            "[{} {} {} {}]",
            s[Axis::Top],
            s[Axis::Left],
            s[Axis::Right],
            s[Axis::Bottom]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::LayoutTree;
    use glam::Vec2;
    use trellis_core::Size;

    #[test]
    fn test_indents_by_depth() {
        let mut tree = LayoutTree::new();
        let root = tree.add_root(LayoutNode::new(NodeId(0)));
        let child = tree.add_child(root, LayoutNode::new(NodeId(1)));
        tree.add_child(child, LayoutNode::new(NodeId(2)));

        let out = print_tree(root, &tree);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("#0 "));
        assert!(lines[1].starts_with("  #1 "));
        assert!(lines[2].starts_with("    #2 "));
    }

    #[test]
    fn test_missing_and_flagged_nodes() {
        let mut tree = LayoutTree::new();
        let root = tree.add_root(
            LayoutNode::new(NodeId(0)).with_size(Size::pixels(10.0), Size::percent(0.5)),
        );
        tree.add_child(root, LayoutNode::new(NodeId(1)).absolute_at(Vec2::ZERO).hidden());
        tree.get_mut(root).unwrap().children.push(NodeId(9));

        let out = print_tree(root, &tree);
        assert!(out.contains("desired=(pixels(10), percent(0.5))"));
        assert!(out.contains("absolute hidden"));
        assert!(out.ends_with("  <missing #9>\n"));
    }
}
