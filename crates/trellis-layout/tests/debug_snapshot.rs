mod common;

use glam::Vec2;
use trellis_core::{Axis, FlexDirection, NodeId, Size};
use trellis_layout::{print_tree, LayoutNode, LayoutTree};

#[test]
fn debug_tree_after_layout() {
    let mut tree = LayoutTree::new();
    let root = tree.add_root(
        common::fixed(0, 200.0, 100.0)
            .with_padding_all(Size::pixels(4.0))
            .with_direction(FlexDirection::Row),
    );
    tree.add_child(
        root,
        common::fixed(1, 50.0, 20.0).with_margin(Axis::Left, Size::pixels(2.0)),
    );
    tree.add_child(
        root,
        LayoutNode::new(NodeId(2)).with_size(Size::pixels(30.0).optional(), Size::pixels(20.0)),
    );
    tree.add_child(root, common::fixed(3, 16.0, 16.0).absolute_at(Vec2::new(10.0, 60.0)));

    let report = common::run(&mut tree, root);
    assert!(report.is_clean());

    insta::assert_snapshot!(print_tree(root, &tree).trim_end(), @r###"
    #0 rect=(0, 0, 208, 108) padding=[4 4 4 4] margin=[0 0 0 0] desired=(pixels(200), pixels(100))
      #1 rect=(6, 4, 50, 20) padding=[0 0 0 0] margin=[0 2 0 0] desired=(pixels(50), pixels(20))
      #2 rect=(56, 4, 148, 20) padding=[0 0 0 0] margin=[0 0 0 0] desired=(pixels(30, s=0), pixels(20))
      #3 rect=(14, 64, 16, 16) padding=[0 0 0 0] margin=[0 0 0 0] desired=(pixels(16), pixels(16)) absolute
    "###);
}
