//! Core types for the Trellis layout engine.
//!
//! This crate provides the value types shared by the layout passes:
//! - Per-axis size declarations ([`Size`], [`Dim`])
//! - Axis indexing ([`Axis`], [`AxisArray`])
//! - Flex configuration enums
//! - Error types

pub mod errors;
pub mod types;

pub use errors::*;
pub use types::*;
