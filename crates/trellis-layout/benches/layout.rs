//! Layout benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use trellis_core::{FlexDirection, NodeId, Size};
use trellis_layout::{
    autolayout, EstimatedMeasurer, Label, LayoutNode, LayoutOptions, LayoutTree, TextMeasureCache,
};

/// A toolbar of `rows` wrapping rows, each holding `per_row` text buttons.
fn toolbar(rows: usize, per_row: usize) -> (LayoutTree, NodeId) {
    let mut tree = LayoutTree::new();
    let root_id = tree.next_id();
    let root = tree.add_root(
        LayoutNode::new(root_id)
            .with_size(Size::screen_pct(1.0), Size::screen_pct(1.0))
            .with_padding_all(Size::pixels(8.0)),
    );

    for r in 0..rows {
        let row_id = tree.next_id();
        let row = tree.add_child(
            root,
            LayoutNode::new(row_id)
                .with_size(Size::percent(1.0), Size::children(0.0))
                .with_direction(FlexDirection::Row),
        );
        for b in 0..per_row {
            let id = tree.next_id();
            tree.add_child(
                row,
                LayoutNode::new(id)
                    .with_size(Size::text(40.0), Size::text(16.0).optional())
                    .with_padding_all(Size::pixels(4.0))
                    .with_margin(trellis_core::Axis::Right, Size::pixels(2.0))
                    .with_label(Label::new(format!("Button {r}.{b}"), "sans", 14.0)),
            );
        }
    }
    (tree, root)
}

fn layout_small(c: &mut Criterion) {
    let (mut tree, root) = toolbar(4, 8);
    let options = LayoutOptions::default();
    let mut measurer = EstimatedMeasurer::default();
    c.bench_function("layout_small", |b| {
        b.iter(|| autolayout(black_box(root), &mut tree, &options, &mut measurer))
    });
}

fn layout_large_cached(c: &mut Criterion) {
    let (mut tree, root) = toolbar(40, 50);
    let options = LayoutOptions::default().with_resolution(1920.0, 1080.0);
    let mut measurer = TextMeasureCache::new(EstimatedMeasurer::default());
    c.bench_function("layout_large_cached", |b| {
        b.iter(|| {
            let report = autolayout(black_box(root), &mut tree, &options, &mut measurer);
            measurer.end_frame();
            report
        })
    });
}

criterion_group!(benches, layout_small, layout_large_cached);
criterion_main!(benches);
