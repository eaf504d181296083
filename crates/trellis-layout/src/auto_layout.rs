//! Relative positioning of children inside their parent's content box.
//!
//! Provides flexbox-like stack and flow layouts: children are placed in list
//! order along the parent's main axis, wrapped into lines when they run out
//! of room, justified on the main axis and aligned on the cross axis.

use glam::Vec2;
use trellis_core::{AlignItems, Axis, FlexDirection, FlexWrap, JustifyContent, NodeId};

use crate::compute::LayoutContext;
use crate::dimension::snap;
use crate::query::NodeQuery;
use crate::solver::ACCEPTABLE_ERROR;
use crate::tree::{LayoutNode, NodeLookup};

/// Float noise allowed on top of the wrap tolerance.
const WRAP_EPSILON: f32 = 0.001;

/// How far a line may run past the content edge before the next child
/// wraps. Never less than the overflow the solver leaves behind, so
/// children shrunk to fit one line stay on it.
pub(crate) fn wrap_tolerance(unit: Option<f32>) -> f32 {
    unit.map_or(ACCEPTABLE_ERROR, |u| (u * 0.5).max(ACCEPTABLE_ERROR)) + WRAP_EPSILON
}

/// Leading offset and gap between children when `count` children share
/// `slack` pixels of free main-axis space.
pub fn justify_offsets(justify: JustifyContent, slack: f32, count: usize) -> (f32, f32) {
    if slack <= 0.0 || count == 0 {
        return (0.0, 0.0);
    }
    match justify {
        JustifyContent::Start => (0.0, 0.0),
        JustifyContent::End => (slack, 0.0),
        JustifyContent::Center => (slack / 2.0, 0.0),
        JustifyContent::SpaceBetween if count > 1 => (0.0, slack / (count - 1) as f32),
        JustifyContent::SpaceBetween => (0.0, 0.0),
        JustifyContent::SpaceAround => {
            let space = slack / count as f32;
            (space / 2.0, space)
        }
    }
}

/// Offset of a box of `size` placed inside `available` pixels.
pub fn align_offset(align: AlignItems, available: f32, size: f32) -> f32 {
    match align {
        AlignItems::Center => (available - size) / 2.0,
        AlignItems::End => available - size,
        // Stretch is applied while sizing
        AlignItems::Default | AlignItems::Start | AlignItems::Stretch => 0.0,
    }
}

/// A child as seen by the flow layout, sizes including margin.
#[derive(Debug, Clone, Copy)]
struct FlowItem {
    id: NodeId,
    main: f32,
    cross: f32,
    align: AlignItems,
}

/// A run of children sharing one row or column.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Line {
    start: usize,
    end: usize,
    main: f32,
    cross: f32,
}

/// The parent properties positioning needs, copied out so children can be
/// borrowed mutably.
#[derive(Debug, Clone, Copy)]
struct Container {
    id: NodeId,
    direction: FlexDirection,
    wrap: FlexWrap,
    justify: JustifyContent,
    align_items: AlignItems,
    content: Vec2,
}

impl Container {
    fn of(node: &LayoutNode) -> Self {
        Self {
            id: node.id,
            direction: node.flex_direction,
            wrap: node.flex_wrap,
            justify: node.justify_content,
            align_items: node.align_items,
            content: Vec2::new(node.content_extent(Axis::X), node.content_extent(Axis::Y)),
        }
    }

    fn content(&self, axis: Axis) -> f32 {
        if axis.is_horizontal() {
            self.content.x
        } else {
            self.content.y
        }
    }
}

/// Pass 5: place the root, then every descendant relative to its parent's
/// content origin.
pub(crate) fn position_tree<L: NodeLookup + ?Sized>(
    ctx: &mut LayoutContext,
    nodes: &mut L,
    root: NodeId,
) {
    let unit = ctx.snap_unit();
    if let Some(node) = nodes.node_mut(root) {
        let pos = if node.absolute {
            node.absolute_pos
        } else {
            Vec2::ZERO
        };
        if let Some(unit) = unit {
            snap_size(node, unit);
        }
        set_position(node, pos, unit);
    }
    position_children(nodes, root, unit);
}

fn snap_size(node: &mut LayoutNode, unit: f32) {
    for axis in Axis::MAIN {
        if node.is_resolved(axis) {
            node.computed[axis] = snap(node.computed[axis], unit);
        }
    }
}

fn set_position(node: &mut LayoutNode, pos: Vec2, unit: Option<f32>) {
    let pos = match unit {
        Some(unit) => Vec2::new(snap(pos.x, unit), snap(pos.y, unit)),
        None => pos,
    };
    node.computed_rel[Axis::X] = pos.x;
    node.computed_rel[Axis::Y] = pos.y;
}

fn position_children<L: NodeLookup + ?Sized>(nodes: &mut L, id: NodeId, unit: Option<f32>) {
    let Some(parent) = nodes.node(id) else {
        return;
    };
    let children = parent.children.clone();
    let container = Container::of(parent);

    if let Some(unit) = unit {
        for &child in &children {
            if let Some(node) = nodes.node_mut(child) {
                snap_size(node, unit);
            }
        }
    }

    let flow = NodeQuery::children_of(nodes, id)
        .in_flow()
        .collect_with(nodes, |_| {});
    let placements = match (container.direction.main_axis(), container.direction.cross_axis()) {
        (Some(main), Some(cross)) => {
            flow_layout(nodes, &container, &flow, main, cross, wrap_tolerance(unit))
        }
        _ => overlap_layout(nodes, &container, &flow),
    };

    for (child, pos) in placements {
        if let Some(node) = nodes.node_mut(child) {
            set_position(node, pos, unit);
        }
    }
    for &child in &children {
        if let Some(node) = nodes.node_mut(child) {
            if node.absolute {
                let pos = node.absolute_pos;
                set_position(node, pos, unit);
            }
        }
    }

    for child in children {
        position_children(nodes, child, unit);
    }
}

/// Stack `flow` along `main`, breaking into lines when wrapping is on.
fn flow_layout<L: NodeLookup + ?Sized>(
    nodes: &mut L,
    container: &Container,
    flow: &[NodeId],
    main: Axis,
    cross: Axis,
    tolerance: f32,
) -> Vec<(NodeId, Vec2)> {
    let items: Vec<FlowItem> = flow
        .iter()
        .filter_map(|&c| nodes.node(c))
        .map(|c| FlowItem {
            id: c.id,
            main: c.outer_extent(main),
            cross: c.outer_extent(cross),
            align: AlignItems::resolve(c.self_align, container.align_items),
        })
        .collect();

    let available = container.content(main);
    let lines = break_lines(container, &items, available, tolerance);

    let total: f32 = items.iter().map(|item| item.main).sum();
    let (lead, gap) = justify_offsets(container.justify, available - total, items.len());

    let mut placements = Vec::with_capacity(items.len());
    let mut line_offset = 0.0;
    for line in &lines {
        let basis = if lines.len() > 1 {
            line.cross
        } else {
            container.content(cross)
        };
        let mut offset = lead;
        for item in &items[line.start..line.end] {
            let cross_pos = line_offset + align_offset(item.align, basis, item.cross);
            let pos = if main == Axis::X {
                Vec2::new(offset, cross_pos)
            } else {
                Vec2::new(cross_pos, offset)
            };
            placements.push((item.id, pos));
            offset += item.main + gap;
        }
        line_offset += line.cross;
    }

    if lines.len() > 1 {
        grow_to_lines(nodes, container.id, cross, line_offset);
    }
    placements
}

fn break_lines(container: &Container, items: &[FlowItem], available: f32, tolerance: f32) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut line = Line::default();

    for (i, item) in items.iter().enumerate() {
        if line.main + item.main > available + tolerance {
            if container.wrap == FlexWrap::Wrap && line.end > line.start {
                lines.push(line);
                line = Line {
                    start: i,
                    end: i,
                    ..Line::default()
                };
            } else {
                log::debug!(
                    "{} overflows {} by {}px",
                    item.id,
                    container.id,
                    line.main + item.main - available
                );
            }
        }
        line.end = i + 1;
        line.main += item.main;
        line.cross = line.cross.max(item.cross);
    }

    if line.end > line.start {
        lines.push(line);
    }
    lines
}

/// A container sized to its children only saw one line when it was
/// measured. Grow it to hold every line.
fn grow_to_lines<L: NodeLookup + ?Sized>(nodes: &mut L, id: NodeId, cross: Axis, lines_extent: f32) {
    let Some(node) = nodes.node_mut(id) else {
        return;
    };
    if !node.fits_children(cross) {
        return;
    }
    let needed = lines_extent + node.computed_padding[cross];
    if needed > node.computed[cross] {
        log::trace!("{id} grows on {cross} from {} to {needed} after wrapping", node.computed[cross]);
        node.computed[cross] = needed;
    }
}

/// Children of a direction-less container all sit at the content origin,
/// aligned on both axes.
fn overlap_layout<L: NodeLookup + ?Sized>(
    nodes: &L,
    container: &Container,
    flow: &[NodeId],
) -> Vec<(NodeId, Vec2)> {
    flow.iter()
        .filter_map(|&c| nodes.node(c))
        .map(|c| {
            let align = AlignItems::resolve(c.self_align, container.align_items);
            let pos = Vec2::new(
                align_offset(align, container.content.x, c.outer_extent(Axis::X)),
                align_offset(align, container.content.y, c.outer_extent(Axis::Y)),
            );
            (c.id, pos)
        })
        .collect()
}
