//! Core value types for describing how a node wants to be sized.

use std::fmt;
use std::ops::{Index, IndexMut};

/// Stable identity of a layout node.
///
/// Nodes refer to each other by id rather than by reference so that the
/// storage holding them is free to move or compact them between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<usize> for NodeId {
    fn from(id: usize) -> Self {
        NodeId(id)
    }
}

/// How a single axis of a node is sized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Dim {
    /// Unsized; contributes nothing
    #[default]
    None,
    /// Fixed pixels
    Pixels,
    /// Fraction of the screen extent on this axis
    ScreenPercent,
    /// Fraction of the parent's content extent on this axis
    Percent,
    /// Sum or max of the children, depending on flex direction
    FitChildren,
    /// Measured label text
    FitText,
    /// Weighted share of the parent's leftover space
    Expand,
}

impl fmt::Display for Dim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dim::None => "none",
            Dim::Pixels => "pixels",
            Dim::ScreenPercent => "screen_percent",
            Dim::Percent => "percent",
            Dim::FitChildren => "children",
            Dim::FitText => "text",
            Dim::Expand => "expand",
        };
        f.write_str(name)
    }
}

/// A desired size on one axis: a dimension kind, its value and how strongly
/// the node resists being shrunk.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub dim: Dim,
    pub value: f32,
    /// 1.0 = rigid, 0.0 = fully negotiable
    pub strictness: f32,
}

impl Default for Size {
    fn default() -> Self {
        Self::none()
    }
}

impl Size {
    pub fn new(dim: Dim, value: f32) -> Self {
        Self {
            dim,
            value,
            strictness: 1.0,
        }
    }

    pub fn none() -> Self {
        Self::new(Dim::None, 0.0)
    }

    pub fn pixels(value: f32) -> Self {
        Self::new(Dim::Pixels, value)
    }

    pub fn screen_pct(value: f32) -> Self {
        Self::new(Dim::ScreenPercent, value)
    }

    pub fn percent(value: f32) -> Self {
        Self::new(Dim::Percent, value)
    }

    /// Size to the children. `fallback` is used when there are none.
    pub fn children(fallback: f32) -> Self {
        Self::new(Dim::FitChildren, fallback)
    }

    /// Size to the node's label. `fallback` is used when it has no label.
    pub fn text(fallback: f32) -> Self {
        Self::new(Dim::FitText, fallback)
    }

    /// Take a share of the parent's slack proportional to `weight`.
    pub fn expand(weight: f32) -> Self {
        Self::new(Dim::Expand, weight)
    }

    /// Set the strictness, clamped into `[0, 1]`.
    pub fn with_strictness(mut self, strictness: f32) -> Self {
        self.strictness = strictness.clamp(0.0, 1.0);
        self
    }

    /// Shorthand for a fully negotiable size.
    pub fn optional(self) -> Self {
        self.with_strictness(0.0)
    }

    pub fn is_none(&self) -> bool {
        self.dim == Dim::None
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.strictness < 1.0 {
            write!(f, "{}({}, s={})", self.dim, self.value, self.strictness)
        } else {
            write!(f, "{}({})", self.dim, self.value)
        }
    }
}

/// The two main axes plus the four spacing sides used by padding and margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    X,
    Y,
    Top,
    Left,
    Right,
    Bottom,
}

impl Axis {
    /// Width and height.
    pub const MAIN: [Axis; 2] = [Axis::X, Axis::Y];
    /// Spacing sides.
    pub const SIDES: [Axis; 4] = [Axis::Top, Axis::Left, Axis::Right, Axis::Bottom];
    pub const ALL: [Axis; 6] = [
        Axis::X,
        Axis::Y,
        Axis::Top,
        Axis::Left,
        Axis::Right,
        Axis::Bottom,
    ];

    fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Top => 2,
            Axis::Left => 3,
            Axis::Right => 4,
            Axis::Bottom => 5,
        }
    }

    /// Whether this axis measures against the screen width.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Axis::X | Axis::Left | Axis::Right)
    }

    /// The main axis a side contributes to (Left/Right → X, Top/Bottom → Y).
    pub fn main(self) -> Axis {
        if self.is_horizontal() {
            Axis::X
        } else {
            Axis::Y
        }
    }

    /// The perpendicular main axis.
    pub fn opposite(self) -> Axis {
        match self.main() {
            Axis::X => Axis::Y,
            _ => Axis::X,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Top => "top",
            Axis::Left => "left",
            Axis::Right => "right",
            Axis::Bottom => "bottom",
        };
        f.write_str(name)
    }
}

/// One value per [`Axis`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AxisArray<T>(pub [T; 6]);

impl<T: Copy> AxisArray<T> {
    pub fn splat(value: T) -> Self {
        Self([value; 6])
    }
}

impl<T> Index<Axis> for AxisArray<T> {
    type Output = T;

    fn index(&self, axis: Axis) -> &T {
        &self.0[axis.index()]
    }
}

impl<T> IndexMut<Axis> for AxisArray<T> {
    fn index_mut(&mut self, axis: Axis) -> &mut T {
        &mut self.0[axis.index()]
    }
}

/// Direction children are stacked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlexDirection {
    /// Children overlap at the content origin
    None,
    /// Left to right
    Row,
    /// Top to bottom
    #[default]
    Column,
}

impl FlexDirection {
    /// The axis children stack along, if any.
    pub fn main_axis(self) -> Option<Axis> {
        match self {
            FlexDirection::None => None,
            FlexDirection::Row => Some(Axis::X),
            FlexDirection::Column => Some(Axis::Y),
        }
    }

    /// The axis children overlap along, if any.
    pub fn cross_axis(self) -> Option<Axis> {
        self.main_axis().map(Axis::opposite)
    }
}

/// Whether children that overflow the main axis start a new line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlexWrap {
    #[default]
    Wrap,
    NoWrap,
}

/// Distribution of free space along the main axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JustifyContent {
    #[default]
    Start,
    End,
    Center,
    SpaceBetween,
    SpaceAround,
}

/// Placement on the cross axis. Used for both `align_items` on a parent and
/// `self_align` on a child, where `Default` means "inherit from the parent".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlignItems {
    #[default]
    Default,
    Start,
    End,
    Center,
    /// Fill the cross axis; applied while sizing
    Stretch,
}

impl AlignItems {
    /// Resolve a child's `self_align` against its parent's `align_items`.
    pub fn resolve(self_align: AlignItems, parent: AlignItems) -> AlignItems {
        match self_align {
            AlignItems::Default => parent,
            other => other,
        }
    }
}

/// How `Pixels` sizes react to the global UI scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScalingMode {
    /// Pixels pass through unchanged
    #[default]
    Proportional,
    /// Pixels are multiplied by the UI scale
    Adaptive,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_array_indexing() {
        let mut values = AxisArray::splat(0.0_f32);
        values[Axis::Left] = 4.0;
        values[Axis::Y] = 2.0;
        assert_eq!(values[Axis::Left], 4.0);
        assert_eq!(values[Axis::Y], 2.0);
        assert_eq!(values[Axis::X], 0.0);
    }

    #[test]
    fn test_side_main_axis() {
        assert_eq!(Axis::Left.main(), Axis::X);
        assert_eq!(Axis::Right.main(), Axis::X);
        assert_eq!(Axis::Top.main(), Axis::Y);
        assert_eq!(Axis::Bottom.opposite(), Axis::X);
        assert_eq!(Axis::X.opposite(), Axis::Y);
    }

    #[test]
    fn test_flex_direction_axes() {
        assert_eq!(FlexDirection::Row.main_axis(), Some(Axis::X));
        assert_eq!(FlexDirection::Column.cross_axis(), Some(Axis::X));
        assert_eq!(FlexDirection::None.main_axis(), None);
    }

    #[test]
    fn test_strictness_is_clamped() {
        assert_eq!(Size::pixels(10.0).with_strictness(2.0).strictness, 1.0);
        assert_eq!(Size::pixels(10.0).with_strictness(-1.0).strictness, 0.0);
        assert_eq!(Size::pixels(10.0).strictness, 1.0);
    }

    #[test]
    fn test_self_align_inherits() {
        assert_eq!(
            AlignItems::resolve(AlignItems::Default, AlignItems::Center),
            AlignItems::Center
        );
        assert_eq!(
            AlignItems::resolve(AlignItems::End, AlignItems::Center),
            AlignItems::End
        );
    }

    #[test]
    fn test_size_display() {
        assert_eq!(Size::pixels(100.0).to_string(), "pixels(100)");
        assert_eq!(Size::percent(0.5).optional().to_string(), "percent(0.5, s=0)");
    }
}
