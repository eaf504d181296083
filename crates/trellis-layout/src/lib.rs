//! Layout computation for retained-mode UI trees.
//!
//! This crate computes the final positions and sizes of nodes from their
//! declared sizing rules: pixels, percentages of the screen or the parent,
//! fit-to-children, fit-to-text and weighted expansion.
//!
//! # Architecture
//!
//! 1. **Resolution**: standalone, parent-relative and children-aggregate
//!    sizes, each in its own pass over the tree
//! 2. **Violation solving**: siblings that overflow their parent are shrunk
//!    by strictness, slack is handed to expanding children
//! 3. **Auto-layout**: flex-style stacking with wrap, justify and align
//! 4. **Text measurement**: pluggable, with an optional frame-based cache
//!
//! # Example
//!
//! ```
//! use trellis_core::{FlexDirection, NodeId, Size};
//! use trellis_layout::{autolayout, EstimatedMeasurer, LayoutNode, LayoutOptions, LayoutTree};
//!
//! let mut tree = LayoutTree::new();
//! let root = tree.add_root(
//!     LayoutNode::new(NodeId(0))
//!         .with_size(Size::pixels(400.0), Size::pixels(300.0))
//!         .with_direction(FlexDirection::Row),
//! );
//! let sidebar = tree.add_child(
//!     root,
//!     LayoutNode::new(NodeId(1)).with_size(Size::pixels(100.0), Size::percent(1.0)),
//! );
//! let body = tree.add_child(
//!     root,
//!     LayoutNode::new(NodeId(2)).with_size(Size::expand(1.0), Size::percent(1.0)),
//! );
//!
//! let report = autolayout(root, &mut tree, &LayoutOptions::default(), &mut EstimatedMeasurer::default())?;
//! assert!(report.is_clean());
//! assert_eq!(tree.get(sidebar).unwrap().rect().width, 100.0);
//! assert_eq!(tree.get(body).unwrap().rect().x, 100.0);
//! assert_eq!(tree.get(body).unwrap().rect().width, 300.0);
//! # Ok::<(), trellis_core::LayoutError>(())
//! ```

mod auto_layout;
mod compute;
mod debug;
mod dimension;
mod query;
mod resolve;
mod solver;
mod text;
mod text_cache;
mod tree;

pub use auto_layout::{align_offset, justify_offsets};
pub use compute::{autolayout, LayoutOptions, LayoutReport};
pub use debug::{print_tree, write_tree};
pub use dimension::{grid_unit, snap, GRID_REFERENCE_HEIGHT, GRID_UNIT};
pub use query::{NodeFilter, NodeQuery};
pub use solver::{
    ChildSlot, SolveOutcome, SolverContext, ACCEPTABLE_ERROR, MAX_SOLVER_ROUNDS, STRICTNESS_DECAY,
};
pub use text::{EstimatedMeasurer, TextMeasure};
pub use text_cache::{measure_key, CacheStats, TextCacheConfig, TextMeasureCache};
pub use tree::{require_node, Bounds, Label, LayoutNode, LayoutTree, NodeLookup, UNRESOLVED};
