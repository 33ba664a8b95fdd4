//! Shared tile-space contracts for the Earthworks terraforming engine.
//!
//! This crate holds the pure data types the engine and its hosts exchange:
//! grid addressing, direction and axis types, the eight-element symmetry
//! group used to reorient pasted selections, tile areas and the iterators
//! that walk them. It carries no mutable engine state.

pub mod area;
pub mod direction;
pub mod grid;
pub mod iter;
pub mod slope;
pub mod transform;

pub use area::{DiagTileArea, TileArea};
pub use direction::{Axis, DiagDirection, Direction};
pub use grid::{GridDims, GridId, TileOffset, TileRef};
pub use iter::{DiagIter, RectIter, TransformIter};
pub use slope::Slope;
pub use transform::{transform_area, DirTransform, InvalidTransform, TileTransform};
