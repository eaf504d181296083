//! Size resolution passes: standalone, parent-relative and children-aggregate.

use trellis_core::{Axis, AxisArray, Dim, LayoutError, NodeId, Size};

use crate::compute::LayoutContext;
use crate::dimension::{self, measure_label, percent_basis, scaled_pixels};
use crate::query::NodeQuery;
use crate::tree::{LayoutNode, NodeLookup};

/// Spacing resolved without the parent. Percent is deferred to the
/// parent-relative pass; the content-driven kinds make no sense for spacing.
fn standalone_spacing(ctx: &mut LayoutContext, node: &LayoutNode, size: Size, side: Axis) -> f32 {
    match size.dim {
        Dim::None | Dim::Percent => 0.0,
        Dim::Pixels => scaled_pixels(ctx, node, size.value),
        Dim::ScreenPercent => size.value * ctx.screen_extent(side),
        Dim::FitChildren | Dim::FitText | Dim::Expand => {
            ctx.report(LayoutError::InvalidSpacing {
                node: node.id,
                axis: side,
                dim: size.dim,
            });
            0.0
        }
    }
}

/// Fill the X/Y slots of a spacing array with the sums of their sides.
fn sum_sides(spacing: &mut AxisArray<f32>) {
    spacing[Axis::X] = spacing[Axis::Left] + spacing[Axis::Right];
    spacing[Axis::Y] = spacing[Axis::Top] + spacing[Axis::Bottom];
}

/// Whether the main-axis value was settled by the standalone pass, and so
/// already has padding folded in.
fn resolved_standalone(size: Size) -> bool {
    matches!(size.dim, Dim::Pixels | Dim::ScreenPercent | Dim::FitText)
}

/// Pass 1: spacing plus pixel, screen-percent and text sizes, top-down.
pub(crate) fn resolve_standalone<L: NodeLookup + ?Sized>(
    ctx: &mut LayoutContext,
    nodes: &mut L,
    id: NodeId,
) {
    let Some(node) = nodes.node(id) else {
        return;
    };

    let mut padding = AxisArray::splat(0.0);
    let mut margin = AxisArray::splat(0.0);
    for side in Axis::SIDES {
        padding[side] = standalone_spacing(ctx, node, node.desired_padding[side], side);
        margin[side] = standalone_spacing(ctx, node, node.desired_margin[side], side);
    }
    sum_sides(&mut padding);
    sum_sides(&mut margin);

    let mut computed = node.computed;
    for axis in Axis::MAIN {
        if let Some(value) = dimension::resolve_standalone(ctx, node, axis) {
            computed[axis] = value + padding[axis];
        }
    }
    let children = node.children.clone();

    if let Some(node) = nodes.node_mut(id) {
        node.computed = computed;
        node.computed_padding = padding;
        node.computed_margin = margin;
    }

    for child in children {
        resolve_standalone(ctx, nodes, child);
    }
}

/// Why a percent value could not be resolved against `parent`, if it can't.
fn percent_error(node: NodeId, parent: Option<&LayoutNode>, axis: Axis) -> Option<LayoutError> {
    let main = axis.main();
    match parent {
        None => Some(LayoutError::PercentWithoutParent { node, axis }),
        Some(p) if p.fits_children(main) => Some(LayoutError::PercentInFitChildren {
            node,
            parent: p.id,
            axis,
        }),
        Some(p) if !p.is_resolved(main) => Some(LayoutError::UnresolvedParent {
            node,
            parent: p.id,
            axis,
        }),
        Some(_) => None,
    }
}

/// Pass 2: percent sizes and spacing against the parent's content, top-down.
pub(crate) fn resolve_parent_relative<L: NodeLookup + ?Sized>(
    ctx: &mut LayoutContext,
    nodes: &mut L,
    id: NodeId,
) {
    let Some(node) = nodes.node(id) else {
        return;
    };
    let parent = node.parent.and_then(|pid| nodes.node(pid));
    if let (Some(pid), None) = (node.parent, parent) {
        log::trace!("{id} has parent {pid} missing from the lookup; treating it as a root");
    }

    let mut padding = node.computed_padding;
    let mut margin = node.computed_margin;
    let mut computed = node.computed;
    let mut errors = Vec::new();

    for side in Axis::SIDES {
        for (desired, resolved) in [
            (node.desired_padding[side], &mut padding),
            (node.desired_margin[side], &mut margin),
        ] {
            if desired.dim != Dim::Percent {
                continue;
            }
            match (percent_error(id, parent, side), parent) {
                (None, Some(p)) => resolved[side] = desired.value * percent_basis(p, side),
                (Some(err), _) => errors.push(err),
                (None, None) => {}
            }
        }
    }
    let old_padding = node.computed_padding;
    sum_sides(&mut padding);
    sum_sides(&mut margin);

    for axis in Axis::MAIN {
        let desired = node.desired[axis];
        if desired.dim == Dim::Percent {
            match (percent_error(id, parent, axis), parent) {
                (None, Some(p)) => computed[axis] = desired.value * percent_basis(p, axis),
                (Some(err), _) => errors.push(err),
                (None, None) => {}
            }
        } else if resolved_standalone(desired) && node.is_resolved(axis) {
            computed[axis] += padding[axis] - old_padding[axis];
        }
    }
    let children = node.children.clone();

    for err in errors {
        ctx.report(err);
    }
    if let Some(node) = nodes.node_mut(id) {
        node.computed = computed;
        node.computed_padding = padding;
        node.computed_margin = margin;
    }

    for child in children {
        resolve_parent_relative(ctx, nodes, child);
    }
}

/// Pass 3: fit-children sizes, bottom-up.
///
/// Children stack along the node's main axis, so that axis takes their sum;
/// on the cross axis they overlap and only the largest counts. Padding is
/// added on top so the result is a full box like every other size.
pub(crate) fn resolve_children<L: NodeLookup + ?Sized>(
    ctx: &mut LayoutContext,
    nodes: &mut L,
    id: NodeId,
) {
    let Some(node) = nodes.node(id) else {
        return;
    };
    for child in node.children.clone() {
        resolve_children(ctx, nodes, child);
    }

    let Some(node) = nodes.node(id) else {
        return;
    };
    if !Axis::MAIN.iter().any(|&axis| node.fits_children(axis)) {
        return;
    }

    let flow = NodeQuery::children_of(nodes, id)
        .in_flow()
        .collect_with(nodes, |_| {});

    let mut computed = node.computed;
    for axis in Axis::MAIN {
        if !node.fits_children(axis) {
            continue;
        }

        let content = if flow.is_empty() {
            let fallback = scaled_pixels(ctx, node, node.desired[axis].value);
            let measured = measure_label(ctx, node, axis).unwrap_or(0.0);
            node.extent(axis).max(fallback).max(measured)
        } else {
            let extents = flow
                .iter()
                .filter_map(|&c| nodes.node(c))
                .map(|c| c.outer_extent(axis));
            if node.flex_direction.main_axis() == Some(axis) {
                extents.sum()
            } else {
                extents.fold(0.0_f32, f32::max)
            }
        };
        computed[axis] = content + node.computed_padding[axis];
    }

    if let Some(node) = nodes.node_mut(id) {
        node.computed = computed;
    }
}
