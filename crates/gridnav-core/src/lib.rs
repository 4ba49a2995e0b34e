//! **gridnav-core**: core types for walkability grids.
//!
//! This crate provides the foundational types used across the *gridnav*
//! workspace: geometry primitives, the binary obstacle [`Mask`], and the
//! fixed-size [`Tile`]s a mask is cut into for transport.
//!
//! A mask is split with [`partition`] and rebuilt with [`reassemble`]. For
//! masks whose dimensions are multiples of the tile size the round trip is
//! exact; otherwise the rebuilt mask is the zero-padded rectangle and the
//! true dimensions must be tracked separately (see [`Mask::crop`]).

pub mod cancel;
pub mod cell;
pub mod geom;
pub mod grid;
pub mod tiles;

pub use cancel::CancelToken;
pub use cell::Cell;
pub use geom::{Point, Range};
pub use grid::{Mask, MaskError};
pub use tiles::{DEFAULT_TILE_SIZE, ReassemblyError, Tile, partition, reassemble, tile_extent};
