//! Resolution of a single [`Size`] to pixels.

use glam::Vec2;
use trellis_core::{Axis, Dim, LayoutError, ScalingMode, Size};

use crate::compute::LayoutContext;
use crate::tree::LayoutNode;

/// Grid unit in pixels at the reference height.
pub const GRID_UNIT: f32 = 4.0;
/// Screen height the grid unit is defined against.
pub const GRID_REFERENCE_HEIGHT: f32 = 720.0;

/// Grid unit scaled to `resolution`, or `None` for a degenerate screen.
pub fn grid_unit(resolution: Vec2) -> Option<f32> {
    let unit = GRID_UNIT * resolution.y / GRID_REFERENCE_HEIGHT;
    (unit > 0.0).then_some(unit)
}

/// Round `value` to the nearest multiple of `unit`.
pub fn snap(value: f32, unit: f32) -> f32 {
    (value / unit).round() * unit
}

/// `value` as pixels for `node`, applying the UI scale on adaptive nodes.
pub(crate) fn scaled_pixels(ctx: &LayoutContext, node: &LayoutNode, value: f32) -> f32 {
    match node.scaling {
        ScalingMode::Proportional => value,
        ScalingMode::Adaptive => value * ctx.options.ui_scale,
    }
}

/// The space a percent size on `axis` is a fraction of: the parent's box
/// minus its margin and padding.
pub(crate) fn percent_basis(parent: &LayoutNode, axis: Axis) -> f32 {
    let axis = axis.main();
    (parent.computed[axis] - parent.computed_margin[axis] - parent.computed_padding[axis]).max(0.0)
}

/// Measure the node's label and return the component for `axis`.
pub(crate) fn measure_label(ctx: &mut LayoutContext, node: &LayoutNode, axis: Axis) -> Option<f32> {
    let label = node.label.as_ref()?;
    let font_size = scaled_pixels(ctx, node, label.font_size);
    let size = ctx
        .measurer
        .measure(&label.text, &label.font, font_size, label.spacing);
    Some(if axis.is_horizontal() { size.x } else { size.y })
}

/// Resolve the kinds that need nothing but the node itself and the screen.
/// Percent, FitChildren, Expand and None yield `None`.
pub(crate) fn resolve_standalone(
    ctx: &mut LayoutContext,
    node: &LayoutNode,
    axis: Axis,
) -> Option<f32> {
    let size = node.desired[axis];
    match size.dim {
        Dim::Pixels => Some(scaled_pixels(ctx, node, size.value)),
        Dim::ScreenPercent => Some(size.value * ctx.screen_extent(axis)),
        Dim::FitText => match measure_label(ctx, node, axis) {
            Some(measured) => Some(measured),
            None => {
                ctx.report(LayoutError::MissingLabel {
                    node: node.id,
                    axis,
                });
                Some(scaled_pixels(ctx, node, size.value))
            }
        },
        Dim::None | Dim::Percent | Dim::FitChildren | Dim::Expand => None,
    }
}

/// Resolve a min/max clamp. `parent` supplies the basis for percent
/// constraints.
pub(crate) fn resolve_constraint(
    ctx: &mut LayoutContext,
    node: &LayoutNode,
    size: Size,
    axis: Axis,
    parent: Option<&LayoutNode>,
) -> Option<f32> {
    match size.dim {
        Dim::None => None,
        Dim::Pixels => Some(scaled_pixels(ctx, node, size.value)),
        Dim::ScreenPercent => Some(size.value * ctx.screen_extent(axis)),
        Dim::Percent => match parent {
            Some(parent) if parent.is_resolved(axis) => {
                Some(size.value * percent_basis(parent, axis))
            }
            _ => {
                log::trace!("{} percent constraint on {axis} has no resolved parent", node.id);
                None
            }
        },
        Dim::FitChildren | Dim::FitText | Dim::Expand => {
            ctx.report(LayoutError::InvalidConstraint {
                node: node.id,
                axis,
                dim: size.dim,
            });
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::LayoutOptions;
    use crate::text::EstimatedMeasurer;
    use crate::tree::Label;
    use trellis_core::NodeId;

    fn options() -> LayoutOptions {
        LayoutOptions::default()
            .with_resolution(1000.0, 500.0)
            .with_ui_scale(2.0)
    }

    #[test]
    fn test_pixels_respect_scaling_mode() {
        let options = options();
        let mut measurer = EstimatedMeasurer::default();
        let mut ctx = LayoutContext::new(&options, &mut measurer);

        let node = LayoutNode::new(NodeId(0)).with_width(Size::pixels(10.0));
        assert_eq!(resolve_standalone(&mut ctx, &node, Axis::X), Some(10.0));

        let node = node.with_scaling(ScalingMode::Adaptive);
        assert_eq!(resolve_standalone(&mut ctx, &node, Axis::X), Some(20.0));
    }

    #[test]
    fn test_screen_percent_uses_axis_extent() {
        let options = options();
        let mut measurer = EstimatedMeasurer::default();
        let mut ctx = LayoutContext::new(&options, &mut measurer);

        let node = LayoutNode::new(NodeId(0))
            .with_size(Size::screen_pct(0.5), Size::screen_pct(0.5));
        assert_eq!(resolve_standalone(&mut ctx, &node, Axis::X), Some(500.0));
        assert_eq!(resolve_standalone(&mut ctx, &node, Axis::Y), Some(250.0));
    }

    #[test]
    fn test_deferred_kinds_are_unresolved() {
        let options = options();
        let mut measurer = EstimatedMeasurer::default();
        let mut ctx = LayoutContext::new(&options, &mut measurer);

        for size in [Size::percent(0.5), Size::children(0.0), Size::expand(1.0), Size::none()] {
            let node = LayoutNode::new(NodeId(0)).with_width(size);
            assert_eq!(resolve_standalone(&mut ctx, &node, Axis::X), None);
        }
        assert!(ctx.diagnostics.is_empty());
    }

    #[test]
    fn test_fit_text_measures_label() {
        let options = LayoutOptions::default();
        let mut measurer = |text: &str, _: &str, size: f32, _: f32| {
            Vec2::new(text.len() as f32 * size, size * 2.0)
        };
        let mut ctx = LayoutContext::new(&options, &mut measurer);

        let node = LayoutNode::new(NodeId(0))
            .with_size(Size::text(0.0), Size::text(0.0))
            .with_label(Label::new("abcd", "mono", 10.0));
        assert_eq!(resolve_standalone(&mut ctx, &node, Axis::X), Some(40.0));
        assert_eq!(resolve_standalone(&mut ctx, &node, Axis::Y), Some(20.0));
    }

    #[test]
    fn test_fit_text_without_label_falls_back() {
        let options = LayoutOptions::default();
        let mut measurer = EstimatedMeasurer::default();
        let mut ctx = LayoutContext::new(&options, &mut measurer);

        let node = LayoutNode::new(NodeId(5)).with_width(Size::text(30.0));
        assert_eq!(resolve_standalone(&mut ctx, &node, Axis::X), Some(30.0));
        assert_eq!(
            ctx.diagnostics,
            vec![LayoutError::MissingLabel {
                node: NodeId(5),
                axis: Axis::X
            }]
        );
    }

    #[test]
    fn test_invalid_constraint_kinds() {
        let options = LayoutOptions::default();
        let mut measurer = EstimatedMeasurer::default();
        let mut ctx = LayoutContext::new(&options, &mut measurer);
        let node = LayoutNode::new(NodeId(1));

        assert_eq!(
            resolve_constraint(&mut ctx, &node, Size::children(0.0), Axis::X, None),
            None
        );
        assert_eq!(
            resolve_constraint(&mut ctx, &node, Size::pixels(12.0), Axis::X, None),
            Some(12.0)
        );
        assert_eq!(ctx.diagnostics.len(), 1);
    }

    #[test]
    fn test_percent_constraint_uses_parent_content() {
        let options = LayoutOptions::default();
        let mut measurer = EstimatedMeasurer::default();
        let mut ctx = LayoutContext::new(&options, &mut measurer);

        let mut parent = LayoutNode::new(NodeId(0));
        parent.computed[Axis::X] = 220.0;
        parent.computed_padding[Axis::X] = 20.0;
        let node = LayoutNode::new(NodeId(1));

        assert_eq!(
            resolve_constraint(&mut ctx, &node, Size::percent(0.5), Axis::X, Some(&parent)),
            Some(100.0)
        );
        assert_eq!(
            resolve_constraint(&mut ctx, &node, Size::percent(0.5), Axis::Y, Some(&parent)),
            None
        );
    }

    #[test]
    fn test_grid_unit_and_snap() {
        assert_eq!(grid_unit(Vec2::new(1280.0, 720.0)), Some(4.0));
        assert_eq!(grid_unit(Vec2::new(2560.0, 1440.0)), Some(8.0));
        assert_eq!(grid_unit(Vec2::ZERO), None);
        assert_eq!(snap(13.0, 4.0), 12.0);
        assert_eq!(snap(14.5, 4.0), 16.0);
    }
}
