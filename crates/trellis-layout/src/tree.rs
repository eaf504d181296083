//! Layout tree data structures.
//!
//! A node carries both its declared sizing inputs and the geometry the
//! passes compute for it. Nodes reference each other by [`NodeId`] and are
//! reached through a [`NodeLookup`], so any id-keyed storage can host them.

use std::collections::HashMap;
use std::hash::BuildHasher;

use glam::Vec2;
use indexmap::IndexMap;
use smallvec::SmallVec;
use trellis_core::{
    AlignItems, Axis, AxisArray, Dim, FlexDirection, FlexWrap, JustifyContent, LayoutError,
    NodeId, ScalingMode, Size,
};

/// Marks an axis that no pass has resolved yet.
pub const UNRESOLVED: f32 = -1.0;

/// Axis-aligned rectangle in screen pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    /// Create bounds with position and size.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Check if a point is inside the bounds.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Grow each edge by the matching side of `spacing`.
    pub fn outset(&self, spacing: &AxisArray<f32>) -> Bounds {
        Bounds::new(
            self.x - spacing[Axis::Left],
            self.y - spacing[Axis::Top],
            self.width + spacing[Axis::Left] + spacing[Axis::Right],
            self.height + spacing[Axis::Top] + spacing[Axis::Bottom],
        )
    }

    /// Shrink each edge by the matching side of `spacing`, never below zero size.
    pub fn inset(&self, spacing: &AxisArray<f32>) -> Bounds {
        Bounds::new(
            self.x + spacing[Axis::Left],
            self.y + spacing[Axis::Top],
            (self.width - spacing[Axis::Left] - spacing[Axis::Right]).max(0.0),
            (self.height - spacing[Axis::Top] - spacing[Axis::Bottom]).max(0.0),
        )
    }
}

/// Text attached to a node, measured for [`Dim::FitText`] sizing.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Label {
    pub text: String,
    pub font: String,
    /// Font size in pixels before UI scaling
    pub font_size: f32,
    /// Extra spacing between glyphs
    pub spacing: f32,
}

impl Label {
    pub fn new(text: impl Into<String>, font: impl Into<String>, font_size: f32) -> Self {
        Self {
            text: text.into(),
            font: font.into(),
            font_size,
            spacing: 0.0,
        }
    }

    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }
}

/// A node in the layout tree.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutNode {
    pub id: NodeId,
    /// Parent node ID (None for root)
    pub parent: Option<NodeId>,
    /// Child node IDs, in layout order
    pub children: SmallVec<[NodeId; 4]>,

    /// Requested size on X and Y
    pub desired: AxisArray<Size>,
    /// Requested padding per side
    pub desired_padding: AxisArray<Size>,
    /// Requested margin per side
    pub desired_margin: AxisArray<Size>,
    /// Lower clamp on X and Y, `Dim::None` for none
    pub min_size: AxisArray<Size>,
    /// Upper clamp on X and Y, `Dim::None` for none
    pub max_size: AxisArray<Size>,

    /// Full box size (padding included) on X and Y, [`UNRESOLVED`] until set
    pub computed: AxisArray<f32>,
    /// Offset of the margin box from the parent's content origin
    pub computed_rel: AxisArray<f32>,
    /// Resolved padding per side; X and Y hold the left+right and top+bottom sums
    pub computed_padding: AxisArray<f32>,
    /// Resolved margin per side; X and Y hold the sums
    pub computed_margin: AxisArray<f32>,
    /// Final absolute border box
    pub computed_rect: Bounds,

    pub flex_direction: FlexDirection,
    pub flex_wrap: FlexWrap,
    pub justify_content: JustifyContent,
    pub align_items: AlignItems,
    /// Overrides the parent's `align_items` unless `Default`
    pub self_align: AlignItems,
    pub scaling: ScalingMode,

    /// Taken out of flow and placed at `absolute_pos`
    pub absolute: bool,
    /// Offset from the parent's content origin when `absolute` is set
    pub absolute_pos: Vec2,
    /// Skipped by flow layout; its subtree is still resolved
    pub should_hide: bool,

    pub label: Option<Label>,
}

impl LayoutNode {
    /// Create a new layout node.
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            parent: None,
            children: SmallVec::new(),
            desired: AxisArray::default(),
            desired_padding: AxisArray::default(),
            desired_margin: AxisArray::default(),
            min_size: AxisArray::default(),
            max_size: AxisArray::default(),
            computed: AxisArray::splat(UNRESOLVED),
            computed_rel: AxisArray::default(),
            computed_padding: AxisArray::default(),
            computed_margin: AxisArray::default(),
            computed_rect: Bounds::default(),
            flex_direction: FlexDirection::default(),
            flex_wrap: FlexWrap::default(),
            justify_content: JustifyContent::default(),
            align_items: AlignItems::default(),
            self_align: AlignItems::default(),
            scaling: ScalingMode::default(),
            absolute: false,
            absolute_pos: Vec2::ZERO,
            should_hide: false,
            label: None,
        }
    }

    pub fn with_size(mut self, width: Size, height: Size) -> Self {
        self.desired[Axis::X] = width;
        self.desired[Axis::Y] = height;
        self
    }

    pub fn with_width(mut self, width: Size) -> Self {
        self.desired[Axis::X] = width;
        self
    }

    pub fn with_height(mut self, height: Size) -> Self {
        self.desired[Axis::Y] = height;
        self
    }

    /// Set padding on one side.
    pub fn with_padding(mut self, side: Axis, size: Size) -> Self {
        self.desired_padding[side] = size;
        self
    }

    /// Set the same padding on all four sides.
    pub fn with_padding_all(mut self, size: Size) -> Self {
        for side in Axis::SIDES {
            self.desired_padding[side] = size;
        }
        self
    }

    /// Set margin on one side.
    pub fn with_margin(mut self, side: Axis, size: Size) -> Self {
        self.desired_margin[side] = size;
        self
    }

    /// Set the same margin on all four sides.
    pub fn with_margin_all(mut self, size: Size) -> Self {
        for side in Axis::SIDES {
            self.desired_margin[side] = size;
        }
        self
    }

    pub fn with_min(mut self, axis: Axis, size: Size) -> Self {
        self.min_size[axis] = size;
        self
    }

    pub fn with_max(mut self, axis: Axis, size: Size) -> Self {
        self.max_size[axis] = size;
        self
    }

    pub fn with_direction(mut self, direction: FlexDirection) -> Self {
        self.flex_direction = direction;
        self
    }

    pub fn with_wrap(mut self, wrap: FlexWrap) -> Self {
        self.flex_wrap = wrap;
        self
    }

    pub fn with_justify(mut self, justify: JustifyContent) -> Self {
        self.justify_content = justify;
        self
    }

    pub fn with_align_items(mut self, align: AlignItems) -> Self {
        self.align_items = align;
        self
    }

    pub fn with_self_align(mut self, align: AlignItems) -> Self {
        self.self_align = align;
        self
    }

    pub fn with_scaling(mut self, scaling: ScalingMode) -> Self {
        self.scaling = scaling;
        self
    }

    pub fn with_label(mut self, label: Label) -> Self {
        self.label = Some(label);
        self
    }

    /// Take the node out of flow at `pos` relative to the parent's content origin.
    pub fn absolute_at(mut self, pos: Vec2) -> Self {
        self.absolute = true;
        self.absolute_pos = pos;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.should_hide = true;
        self
    }

    /// Whether the node takes part in its parent's flow.
    pub fn in_flow(&self) -> bool {
        !self.absolute && !self.should_hide
    }

    pub fn is_resolved(&self, axis: Axis) -> bool {
        self.computed[axis] != UNRESOLVED
    }

    /// Size on `axis` with unresolved treated as empty.
    pub fn extent(&self, axis: Axis) -> f32 {
        self.computed[axis].max(0.0)
    }

    /// Space the node takes up among its siblings on `axis`.
    pub fn outer_extent(&self, axis: Axis) -> f32 {
        self.extent(axis) + self.computed_margin[axis]
    }

    /// Space available to children on `axis`.
    pub fn content_extent(&self, axis: Axis) -> f32 {
        (self.computed[axis] - self.computed_padding[axis]).max(0.0)
    }

    /// Whether `axis` is sized from the children.
    pub fn fits_children(&self, axis: Axis) -> bool {
        self.desired[axis].dim == Dim::FitChildren
    }

    /// The final rectangle, padding included.
    pub fn rect(&self) -> Bounds {
        self.computed_rect
    }

    /// The rectangle children are laid out in.
    pub fn content_rect(&self) -> Bounds {
        self.computed_rect.inset(&self.computed_padding)
    }

    /// The final rectangle expanded by margin: everything the node occupies.
    pub fn bounds(&self) -> Bounds {
        self.computed_rect.outset(&self.computed_margin)
    }
}

/// Id-based access to layout nodes.
///
/// The passes only ever reach nodes through this trait, so the storage that
/// owns them can be an arena, a map, or an ECS table.
pub trait NodeLookup {
    fn node(&self, id: NodeId) -> Option<&LayoutNode>;
    fn node_mut(&mut self, id: NodeId) -> Option<&mut LayoutNode>;
}

impl<S: BuildHasher> NodeLookup for HashMap<NodeId, LayoutNode, S> {
    fn node(&self, id: NodeId) -> Option<&LayoutNode> {
        self.get(&id)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut LayoutNode> {
        self.get_mut(&id)
    }
}

impl<S: BuildHasher> NodeLookup for IndexMap<NodeId, LayoutNode, S> {
    fn node(&self, id: NodeId) -> Option<&LayoutNode> {
        self.get(&id)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut LayoutNode> {
        self.get_mut(&id)
    }
}

/// Look up a node that must exist. Only used for the root: every other
/// missing id is skipped.
pub fn require_node<L: NodeLookup + ?Sized>(
    nodes: &L,
    id: NodeId,
) -> Result<&LayoutNode, LayoutError> {
    nodes.node(id).ok_or(LayoutError::RootNotFound { id })
}

/// Arena of layout nodes keyed by id.
#[derive(Debug, Clone)]
pub struct LayoutTree {
    /// All nodes in the tree, in insertion order
    nodes: IndexMap<NodeId, LayoutNode>,
    /// Root node IDs (top-level elements)
    roots: Vec<NodeId>,
    /// Counter for generating unique IDs
    next_id: usize,
}

impl Default for LayoutTree {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutTree {
    /// Create an empty layout tree.
    pub fn new() -> Self {
        Self {
            nodes: IndexMap::new(),
            roots: Vec::new(),
            next_id: 0,
        }
    }

    /// Generate a new unique node ID.
    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a root node.
    pub fn add_root(&mut self, mut node: LayoutNode) -> NodeId {
        let id = node.id;
        node.parent = None;
        self.bump_next_id(id);
        self.nodes.insert(id, node);
        self.roots.push(id);
        id
    }

    /// Add a child node to a parent.
    pub fn add_child(&mut self, parent_id: NodeId, mut node: LayoutNode) -> NodeId {
        let id = node.id;
        node.parent = Some(parent_id);
        self.bump_next_id(id);
        self.nodes.insert(id, node);

        if let Some(parent) = self.nodes.get_mut(&parent_id) {
            parent.children.push(id);
        }

        id
    }

    fn bump_next_id(&mut self, id: NodeId) {
        self.next_id = self.next_id.max(id.0 + 1);
    }

    /// Get a node by ID.
    pub fn get(&self, id: NodeId) -> Option<&LayoutNode> {
        self.nodes.get(&id)
    }

    /// Get a mutable node by ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut LayoutNode> {
        self.nodes.get_mut(&id)
    }

    /// Get the root nodes.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all nodes.
    pub fn nodes(&self) -> impl Iterator<Item = &LayoutNode> {
        self.nodes.values()
    }

    /// Get children of a node.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &LayoutNode> {
        self.nodes
            .get(&id)
            .into_iter()
            .flat_map(|n| n.children.iter())
            .filter_map(|child_id| self.nodes.get(child_id))
    }

    /// Find the deepest visible node whose rectangle contains `point`.
    pub fn hit_test(&self, point: Vec2) -> Option<NodeId> {
        // Last root is on top
        for &root_id in self.roots.iter().rev() {
            if let Some(hit) = self.hit_test_recursive(root_id, point) {
                return Some(hit);
            }
        }
        None
    }

    fn hit_test_recursive(&self, id: NodeId, point: Vec2) -> Option<NodeId> {
        let node = self.nodes.get(&id)?;

        if node.should_hide || !node.rect().contains(point) {
            return None;
        }

        for &child_id in node.children.iter().rev() {
            if let Some(hit) = self.hit_test_recursive(child_id, point) {
                return Some(hit);
            }
        }

        Some(id)
    }
}

impl NodeLookup for LayoutTree {
    fn node(&self, id: NodeId) -> Option<&LayoutNode> {
        self.nodes.get(&id)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut LayoutNode> {
        self.nodes.get_mut(&id)
    }
}
