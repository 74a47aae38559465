//! Retained-mode hierarchical layout for widget trees.
//!
//! Widgets form a tree behind one polymorphic contract. Layout runs in two
//! deterministic passes: a bottom-up preferred-size pass (cached per axis,
//! keyed by prospective cross size) and a top-down region-allocation pass in
//! which each container subdivides its region with its own algorithm: flex
//! rows and columns, track-based grids, and overlay stacks. Events route
//! depth-first through the same tree, consulting a target-keyed signal
//! registry, and rendering goes through a backend strategy selected once at
//! startup.

/// Rendering backends.
pub mod backend;
/// Child storage and the single-child Bin.
mod container;
/// Error types.
pub mod error;
/// Input events and sources.
pub mod event;
/// Flexbox-style row/column container.
mod flex;
/// Track-based 2-D container.
mod grid;
/// Image leaf widget and tile catalog.
mod image;
/// The widget contract.
pub mod node;
/// Draw primitives and scissor clipping.
pub mod render;
/// Target-keyed multicast handlers.
mod signal;
/// Overlay container.
mod stack;
/// Per-node common state.
pub mod state;
/// Colors and markup parsing.
pub mod style;
/// Text leaf widget and metrics strategy.
mod text;
/// Test utilities.
pub mod tutils;
/// The engine context and event pump.
mod ui;

pub use geom;

pub use container::Bin;
pub use error::{Error, Result};
pub use flex::Flex;
pub use grid::Grid;
pub use image::{Image, Tile, TileCatalog};
pub use node::{Children, NodeRef, Widget, deliver_event, node};
pub use render::{Backend, Render, ScissorStack};
pub use signal::{Handler, Signals};
pub use stack::Stack;
pub use state::{Align, Justify, NodeId, NodeState};
pub use style::{Color, StyledRun, parse_markup, plain_text};
pub use text::{CellMetrics, Text, TextMetrics};
pub use ui::Ui;

// Export commonly used geometry types at the root.
pub use geom::{Axis, Margin, Point, Region, Size, SizeRequest};
