//! The layout pipeline.
//!
//! [`autolayout`] walks the tree seven times, each pass relying on what the
//! previous ones resolved:
//!
//! 0. reset computed fields
//! 1. standalone sizes (pixels, screen percent, text) and spacing
//! 2. parent-relative sizes (percent)
//! 3. children-aggregate sizes (fit children), bottom-up
//! 4. violation solving among siblings, then min/max clamps
//! 5. relative positioning with wrap, justify and align
//! 6. absolute screen rectangles

use glam::Vec2;
use trellis_core::{Axis, AxisArray, LayoutError, NodeId};

use crate::auto_layout;
use crate::dimension::grid_unit;
use crate::resolve;
use crate::solver;
use crate::text::TextMeasure;
use crate::tree::{require_node, Bounds, NodeLookup, UNRESOLVED};

/// Options for one layout run.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutOptions {
    /// Screen size in pixels
    pub resolution: Vec2,
    /// Round sizes and positions to a resolution-scaled grid
    pub enable_grid_snap: bool,
    /// Multiplier for `Pixels` sizes on adaptive nodes
    pub ui_scale: f32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            resolution: Vec2::new(800.0, 600.0),
            enable_grid_snap: false,
            ui_scale: 1.0,
        }
    }
}

impl LayoutOptions {
    pub fn with_resolution(mut self, width: f32, height: f32) -> Self {
        self.resolution = Vec2::new(width, height);
        self
    }

    pub fn with_grid_snap(mut self, enabled: bool) -> Self {
        self.enable_grid_snap = enabled;
        self
    }

    pub fn with_ui_scale(mut self, scale: f32) -> Self {
        self.ui_scale = scale;
        self
    }
}

/// Non-fatal problems found during a run, in the order they were logged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutReport {
    pub diagnostics: Vec<LayoutError>,
}

impl LayoutReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Diagnostics concerning `node`.
    pub fn for_node(&self, node: NodeId) -> impl Iterator<Item = &LayoutError> {
        self.diagnostics.iter().filter(move |e| e.node() == node)
    }
}

/// State shared by the passes of one run.
pub(crate) struct LayoutContext<'a> {
    pub options: &'a LayoutOptions,
    pub measurer: &'a mut dyn TextMeasure,
    pub diagnostics: Vec<LayoutError>,
}

impl<'a> LayoutContext<'a> {
    pub fn new(options: &'a LayoutOptions, measurer: &'a mut dyn TextMeasure) -> Self {
        Self {
            options,
            measurer,
            diagnostics: Vec::new(),
        }
    }

    /// Log a non-fatal error and keep it for the report.
    pub fn report(&mut self, err: LayoutError) {
        match err {
            LayoutError::ResidualViolation { .. } => log::warn!("{err}"),
            _ => log::error!("{err}"),
        }
        self.diagnostics.push(err);
    }

    /// Screen width for horizontal axes, height otherwise.
    pub fn screen_extent(&self, axis: Axis) -> f32 {
        if axis.is_horizontal() {
            self.options.resolution.x
        } else {
            self.options.resolution.y
        }
    }

    /// Grid unit when snapping is enabled.
    pub fn snap_unit(&self) -> Option<f32> {
        if self.options.enable_grid_snap {
            grid_unit(self.options.resolution)
        } else {
            None
        }
    }
}

/// Lay out the tree under `root`, rewriting every reachable node's computed
/// fields.
///
/// Only a missing root is an error; everything else is logged, collected in
/// the returned report, and degrades the affected node alone.
pub fn autolayout<L: NodeLookup + ?Sized>(
    root: NodeId,
    nodes: &mut L,
    options: &LayoutOptions,
    measurer: &mut dyn TextMeasure,
) -> Result<LayoutReport, LayoutError> {
    require_node(nodes, root)?;

    let mut ctx = LayoutContext::new(options, measurer);

    reset(&mut ctx, nodes, root);
    resolve::resolve_standalone(&mut ctx, nodes, root);
    resolve::resolve_parent_relative(&mut ctx, nodes, root);
    resolve::resolve_children(&mut ctx, nodes, root);
    solver::solve_violations(&mut ctx, nodes, root);
    auto_layout::position_tree(&mut ctx, nodes, root);
    compute_absolute_bounds(nodes, root, Vec2::ZERO);

    log::trace!(
        "layout of {root} finished with {} diagnostics",
        ctx.diagnostics.len()
    );
    Ok(LayoutReport {
        diagnostics: ctx.diagnostics,
    })
}

/// Pass 0: clear computed state. This is the only pass that reports missing child
/// ids; later passes skip them silently.
fn reset<L: NodeLookup + ?Sized>(ctx: &mut LayoutContext, nodes: &mut L, id: NodeId) {
    let children = match nodes.node_mut(id) {
        Some(node) => {
            node.computed = AxisArray::splat(UNRESOLVED);
            node.computed_rel = AxisArray::default();
            node.computed_padding = AxisArray::default();
            node.computed_margin = AxisArray::default();
            node.computed_rect = Bounds::default();
            node.children.clone()
        }
        None => return,
    };

    for child in children {
        if nodes.node(child).is_none() {
            ctx.report(LayoutError::NodeNotFound {
                id: child,
                referrer: id,
            });
            continue;
        }
        reset(ctx, nodes, child);
    }
}

/// Pass 6: turn parent-relative offsets into screen rectangles. `origin` is the
/// parent's content origin.
fn compute_absolute_bounds<L: NodeLookup + ?Sized>(nodes: &mut L, id: NodeId, origin: Vec2) {
    let (content_origin, children) = {
        let node = match nodes.node_mut(id) {
            Some(n) => n,
            None => return,
        };
        let margin_origin = origin + Vec2::new(node.computed_rel[Axis::X], node.computed_rel[Axis::Y]);
        let position = margin_origin
            + Vec2::new(node.computed_margin[Axis::Left], node.computed_margin[Axis::Top]);
        node.computed_rect = Bounds::new(
            position.x,
            position.y,
            node.extent(Axis::X),
            node.extent(Axis::Y),
        );
        let content_origin = position
            + Vec2::new(node.computed_padding[Axis::Left], node.computed_padding[Axis::Top]);
        (content_origin, node.children.clone())
    };

    for child in children {
        compute_absolute_bounds(nodes, child, content_origin);
    }
}
