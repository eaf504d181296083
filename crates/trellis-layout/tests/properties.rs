mod common;

use proptest::prelude::*;
use trellis_core::{Axis, FlexDirection, FlexWrap, NodeId, Size};
use trellis_layout::{LayoutNode, LayoutOptions, LayoutTree, UNRESOLVED};

#[derive(Debug, Clone)]
struct NodeSpec {
    parent_seed: usize,
    width: f32,
    height: f32,
    screen_relative: bool,
    strictness: f32,
    padding: f32,
    row: bool,
    wrap: bool,
}

fn node_spec() -> impl Strategy<Value = NodeSpec> {
    (
        any::<usize>(),
        0.0f32..400.0,
        0.0f32..400.0,
        any::<bool>(),
        0.0f32..=1.0,
        0.0f32..12.0,
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(
            |(parent_seed, width, height, screen_relative, strictness, padding, row, wrap)| {
                NodeSpec {
                    parent_seed,
                    width,
                    height,
                    screen_relative,
                    strictness,
                    padding,
                    row,
                    wrap,
                }
            },
        )
}

/// Build a tree where every size is a constant: pixels or screen percent.
fn build(specs: &[NodeSpec]) -> (LayoutTree, NodeId) {
    let mut tree = LayoutTree::new();
    let mut root = None;
    for (i, spec) in specs.iter().enumerate() {
        let (width, height) = if spec.screen_relative {
            (Size::screen_pct(spec.width / 400.0), Size::screen_pct(spec.height / 400.0))
        } else {
            (Size::pixels(spec.width), Size::pixels(spec.height))
        };
        let node = LayoutNode::new(NodeId(i))
            .with_size(
                width.with_strictness(spec.strictness),
                height.with_strictness(spec.strictness),
            )
            .with_padding_all(Size::pixels(spec.padding))
            .with_direction(if spec.row {
                FlexDirection::Row
            } else {
                FlexDirection::Column
            })
            .with_wrap(if spec.wrap { FlexWrap::Wrap } else { FlexWrap::NoWrap });
        match root {
            None => root = Some(tree.add_root(node)),
            Some(_) => {
                tree.add_child(NodeId(spec.parent_seed % i), node);
            }
        }
    }
    (tree, NodeId(0))
}

proptest! {
    #[test]
    fn constant_trees_resolve_non_negative(specs in prop::collection::vec(node_spec(), 1..24)) {
        let (mut tree, root) = build(&specs);
        common::run_with(&mut tree, root, &LayoutOptions::default());

        for node in tree.nodes() {
            for axis in Axis::MAIN {
                prop_assert_ne!(node.computed[axis], UNRESOLVED);
                prop_assert!(node.computed[axis] >= 0.0);
            }
        }
    }

    #[test]
    fn layout_is_idempotent(
        specs in prop::collection::vec(node_spec(), 1..24),
        snap in any::<bool>(),
    ) {
        let (mut tree, root) = build(&specs);
        let options = LayoutOptions::default().with_grid_snap(snap);

        common::run_with(&mut tree, root, &options);
        let first: Vec<_> = tree.nodes().map(|n| (n.computed, n.computed_rel, n.rect())).collect();
        common::run_with(&mut tree, root, &options);
        let second: Vec<_> = tree.nodes().map(|n| (n.computed, n.computed_rel, n.rect())).collect();

        prop_assert_eq!(first, second);
    }
}
