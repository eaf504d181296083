#![allow(dead_code)]

use trellis_core::{NodeId, Size};
use trellis_layout::{autolayout, EstimatedMeasurer, LayoutNode, LayoutOptions, LayoutReport, NodeLookup};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn fixed(id: usize, width: f32, height: f32) -> LayoutNode {
    LayoutNode::new(NodeId(id)).with_size(Size::pixels(width), Size::pixels(height))
}

pub fn run<L: NodeLookup + ?Sized>(nodes: &mut L, root: NodeId) -> LayoutReport {
    run_with(nodes, root, &LayoutOptions::default())
}

pub fn run_with<L: NodeLookup + ?Sized>(
    nodes: &mut L,
    root: NodeId,
    options: &LayoutOptions,
) -> LayoutReport {
    init_logging();
    autolayout(root, nodes, options, &mut EstimatedMeasurer::default()).expect("root exists")
}
