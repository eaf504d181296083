//! Violation solving: fitting siblings into their parent's content area.
//!
//! Runs per parent on the main axis only, since cross-axis children overlap
//! rather than stack. Overflow is taken first from optional children
//! (strictness 0), then from every child that is not rigid, proportionally
//! to how negotiable it is. Slack goes to `Expand` children by weight or,
//! when there are none, is refunded to optional children. A wrapping parent
//! does not report overflow that line breaking can absorb.

use trellis_core::{AlignItems, Axis, Dim, FlexWrap, LayoutError, NodeId};

use crate::auto_layout::wrap_tolerance;
use crate::compute::LayoutContext;
use crate::dimension::resolve_constraint;
use crate::query::NodeQuery;
use crate::tree::NodeLookup;

/// Overflow in pixels that is tolerated without shrinking anything.
pub const ACCEPTABLE_ERROR: f32 = 1.0;
/// Shrink rounds before the remaining overflow is accepted.
pub const MAX_SOLVER_ROUNDS: usize = 10;
/// How much a child's working strictness drops after each shrink round.
pub const STRICTNESS_DECAY: f32 = 0.05;

/// One sibling as seen by the solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChildSlot {
    pub id: NodeId,
    /// Full box size on the solved axis
    pub size: f32,
    pub margin: f32,
    /// Working strictness; decays during solving, never written back
    pub strictness: f32,
    /// Weight when the child expands, `None` otherwise
    pub expand_weight: Option<f32>,
}

/// What the solver did with the error it found.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveOutcome {
    /// Within tolerance, or slack with nobody to take it
    Settled,
    /// Overflow fully absorbed
    Shrunk { rounds: usize },
    /// Overflow remaining after every round
    Residual { error: f32 },
    /// Slack handed to expanding children
    Expanded,
    /// Slack refunded to optional children, with the amount each received
    Refunded(Vec<(NodeId, f32)>),
}

/// The sibling set of one parent on one axis.
#[derive(Debug, Clone)]
pub struct SolverContext {
    pub parent: NodeId,
    pub axis: Axis,
    /// Parent content extent on `axis`
    pub available: f32,
    pub children: Vec<ChildSlot>,
}

impl SolverContext {
    pub fn new(parent: NodeId, axis: Axis, available: f32, children: Vec<ChildSlot>) -> Self {
        Self {
            parent,
            axis,
            available,
            children,
        }
    }

    /// Children's total outer size minus the space available. Positive
    /// means overflow.
    pub fn error(&self) -> f32 {
        let used: f32 = self.children.iter().map(|c| c.size + c.margin).sum();
        used - self.available
    }

    /// Whether every child fits the available space on a line of its own.
    pub fn fits_one_per_line(&self, tolerance: f32) -> bool {
        self.children
            .iter()
            .all(|c| c.size + c.margin <= self.available + tolerance)
    }

    pub fn solve(&mut self) -> SolveOutcome {
        let error = self.error();
        if error > ACCEPTABLE_ERROR {
            self.shrink_optional(error);
            let (rounds, error) = self.shrink_negotiable();
            if error > ACCEPTABLE_ERROR {
                SolveOutcome::Residual { error }
            } else {
                SolveOutcome::Shrunk { rounds }
            }
        } else if error < 0.0 {
            let slack = -error;
            if self.distribute_expand(slack) {
                SolveOutcome::Expanded
            } else {
                let refunds = self.refund_optional(slack);
                if refunds.is_empty() {
                    SolveOutcome::Settled
                } else {
                    SolveOutcome::Refunded(refunds)
                }
            }
        } else {
            SolveOutcome::Settled
        }
    }

    /// Take an equal share of `error` from each optional child, stopping at
    /// the first child that cannot give its full share.
    fn shrink_optional(&mut self, error: f32) {
        let optional: Vec<usize> = (0..self.children.len())
            .filter(|&i| self.children[i].strictness <= 0.0 && self.children[i].size > 0.0)
            .collect();
        if optional.is_empty() {
            return;
        }

        let share = error / optional.len() as f32;
        for i in optional {
            let child = &mut self.children[i];
            if child.size - share < 0.0 {
                log::trace!("{} cannot give up {share}px, clamping to zero", child.id);
                child.size = 0.0;
                break;
            }
            child.size -= share;
        }
    }

    /// Shrink every non-rigid child in rounds, each giving
    /// `error / n * (1 - strictness)`. Returns the rounds used and the error
    /// left over.
    fn shrink_negotiable(&mut self) -> (usize, f32) {
        let mut error = self.error();
        let mut rounds = 0;
        while rounds < MAX_SOLVER_ROUNDS && error > ACCEPTABLE_ERROR {
            let candidates: Vec<usize> = (0..self.children.len())
                .filter(|&i| self.children[i].strictness < 1.0 && self.children[i].size > 0.0)
                .collect();
            if candidates.is_empty() {
                break;
            }

            let per_child = error / candidates.len() as f32;
            for i in candidates {
                let child = &mut self.children[i];
                let shrink = (per_child * (1.0 - child.strictness)).min(child.size);
                child.size -= shrink;
                child.strictness = (child.strictness - STRICTNESS_DECAY).max(0.0);
            }
            rounds += 1;
            error = self.error();
        }
        (rounds, error)
    }

    /// Hand all of `slack` to expanding children by weight. Returns false
    /// if no child expands.
    fn distribute_expand(&mut self, slack: f32) -> bool {
        let count = self.children.iter().filter(|c| c.expand_weight.is_some()).count();
        if count == 0 {
            return false;
        }

        let total: f32 = self
            .children
            .iter()
            .filter_map(|c| c.expand_weight)
            .map(|w| w.max(0.0))
            .sum();
        for child in &mut self.children {
            if let Some(weight) = child.expand_weight {
                child.size += if total > 0.0 {
                    slack * weight.max(0.0) / total
                } else {
                    slack / count as f32
                };
            }
        }
        true
    }

    /// Split `slack` evenly between optional children.
    fn refund_optional(&mut self, slack: f32) -> Vec<(NodeId, f32)> {
        let count = self.children.iter().filter(|c| c.strictness <= 0.0).count();
        if count == 0 {
            return Vec::new();
        }

        let share = slack / count as f32;
        self.children
            .iter_mut()
            .filter(|c| c.strictness <= 0.0)
            .map(|c| {
                c.size += share;
                (c.id, share)
            })
            .collect()
    }
}

/// Pass 4: solve every parent top-down, then clamp to min/max.
pub(crate) fn solve_violations<L: NodeLookup + ?Sized>(
    ctx: &mut LayoutContext,
    nodes: &mut L,
    root: NodeId,
) {
    apply_constraints(ctx, nodes, root);
    solve_node(ctx, nodes, root);
}

fn solve_node<L: NodeLookup + ?Sized>(ctx: &mut LayoutContext, nodes: &mut L, id: NodeId) {
    let Some(node) = nodes.node(id) else {
        return;
    };
    let children = node.children.clone();
    let main_axis = node.flex_direction.main_axis();
    let flow = NodeQuery::children_of(nodes, id)
        .in_flow()
        .collect_with(nodes, |_| {});

    fill_cross_axis(nodes, id, &flow);

    if let Some(axis) = main_axis {
        solve_axis(ctx, nodes, id, axis, &flow);
    }

    for &child in &children {
        apply_constraints(ctx, nodes, child);
    }
    for child in children {
        solve_node(ctx, nodes, child);
    }
}

/// Size children that take their cross-axis extent from the parent:
/// `Expand` children and stretch-aligned children with no size of their own.
/// `Expand` children start the main axis empty and wait for slack.
fn fill_cross_axis<L: NodeLookup + ?Sized>(nodes: &mut L, id: NodeId, flow: &[NodeId]) {
    let Some(parent) = nodes.node(id) else {
        return;
    };
    let main_axis = parent.flex_direction.main_axis();
    let align_items = parent.align_items;
    let content = [
        parent
            .is_resolved(Axis::X)
            .then(|| parent.content_extent(Axis::X)),
        parent
            .is_resolved(Axis::Y)
            .then(|| parent.content_extent(Axis::Y)),
    ];

    for &child_id in flow {
        let Some(child) = nodes.node_mut(child_id) else {
            continue;
        };
        for (axis, available) in Axis::MAIN.into_iter().zip(content) {
            let dim = child.desired[axis].dim;
            let on_main = main_axis == Some(axis);
            let stretch = main_axis.is_some()
                && !on_main
                && dim == Dim::None
                && AlignItems::resolve(child.self_align, align_items) == AlignItems::Stretch;

            if dim == Dim::Expand && on_main {
                if !child.is_resolved(axis) {
                    child.computed[axis] = child.computed_padding[axis];
                }
            } else if dim == Dim::Expand || stretch {
                match available {
                    Some(available) => {
                        child.computed[axis] = (available - child.computed_margin[axis]).max(0.0);
                    }
                    None => log::trace!("{child_id} cannot fill {axis}: parent {id} unresolved"),
                }
            }
        }
    }
}

fn solve_axis<L: NodeLookup + ?Sized>(
    ctx: &mut LayoutContext,
    nodes: &mut L,
    id: NodeId,
    axis: Axis,
    flow: &[NodeId],
) {
    let Some(parent) = nodes.node(id) else {
        return;
    };
    let wraps = parent.flex_wrap == FlexWrap::Wrap;
    if !parent.is_resolved(axis) {
        log::trace!("{id} is unresolved on {axis}, skipping violation solving");
        return;
    }
    if flow.is_empty() {
        return;
    }

    let slots = flow
        .iter()
        .filter_map(|&c| nodes.node(c))
        .map(|c| ChildSlot {
            id: c.id,
            size: c.extent(axis),
            margin: c.computed_margin[axis],
            strictness: c.desired[axis].strictness,
            expand_weight: (c.desired[axis].dim == Dim::Expand).then_some(c.desired[axis].value),
        })
        .collect();
    let mut solver = SolverContext::new(id, axis, parent.content_extent(axis), slots);

    let outcome = solver.solve();
    log::trace!("{id} solved on {axis}: {outcome:?}");

    for slot in &solver.children {
        if let Some(child) = nodes.node_mut(slot.id) {
            if child.is_resolved(axis) || slot.size > 0.0 {
                child.computed[axis] = slot.size;
            }
        }
    }

    match outcome {
        SolveOutcome::Residual { error }
            if wraps && solver.fits_one_per_line(wrap_tolerance(ctx.snap_unit())) =>
        {
            log::debug!("{id} overflows {axis} by {error}px, left to line breaking");
        }
        SolveOutcome::Residual { error } => ctx.report(LayoutError::ResidualViolation {
            parent: id,
            axis,
            error,
        }),
        SolveOutcome::Refunded(refunds) => {
            for (child, amount) in refunds {
                cascade_refund(nodes, child, axis, amount);
            }
        }
        _ => {}
    }
}

/// Pass a refund on to optional descendants that overlap on `axis`. Where
/// `axis` is the node's own main axis, the solver picks up the new space
/// when it reaches that node.
fn cascade_refund<L: NodeLookup + ?Sized>(nodes: &mut L, id: NodeId, axis: Axis, amount: f32) {
    let Some(node) = nodes.node(id) else {
        return;
    };
    if node.flex_direction.main_axis() == Some(axis) {
        return;
    }

    let flow = NodeQuery::children_of(nodes, id)
        .in_flow()
        .collect_with(nodes, |_| {});
    for child_id in flow {
        let Some(child) = nodes.node_mut(child_id) else {
            continue;
        };
        if child.desired[axis].strictness > 0.0 || !child.is_resolved(axis) {
            continue;
        }
        child.computed[axis] += amount;
        cascade_refund(nodes, child_id, axis, amount);
    }
}

/// Clamp a node to its resolved min/max sizes.
fn apply_constraints<L: NodeLookup + ?Sized>(ctx: &mut LayoutContext, nodes: &mut L, id: NodeId) {
    let Some(node) = nodes.node(id) else {
        return;
    };
    if Axis::MAIN
        .iter()
        .all(|&axis| node.min_size[axis].is_none() && node.max_size[axis].is_none())
    {
        return;
    }
    let parent = node.parent.and_then(|pid| nodes.node(pid));

    let mut computed = node.computed;
    for axis in Axis::MAIN {
        let min = resolve_constraint(ctx, node, node.min_size[axis], axis, parent);
        let max = resolve_constraint(ctx, node, node.max_size[axis], axis, parent);
        if !node.is_resolved(axis) {
            continue;
        }
        if let Some(min) = min {
            computed[axis] = computed[axis].max(min);
        }
        if let Some(max) = max {
            computed[axis] = computed[axis].min(max);
        }
    }

    if let Some(node) = nodes.node_mut(id) {
        node.computed = computed;
    }
}
