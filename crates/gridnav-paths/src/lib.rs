//! Path search over walkability masks.
//!
//! This crate provides the search half of *gridnav*:
//!
//! - a closed registry of distance estimates ([`Heuristic`]), resolved by
//!   name with a fallback to Manhattan
//! - 8-way movement with a configurable corner-cutting rule
//!   ([`DiagonalMovement`]), orthogonal steps costing 1 and diagonal steps √2
//! - a **bidirectional best-first** search ([`SearchSpace::bidir_path`],
//!   [`find_path`]) with deterministic tie-breaking and optional early
//!   termination ([`Termination`])
//!
//! Searches run through [`SearchSpace`], which owns and reuses its node
//! arrays so that repeated queries incur no allocations after warm-up.
//!
//! # Trait hierarchy
//!
//! | Trait | Provides |
//! |---|---|
//! | [`Pather`] | neighbor enumeration, endpoint passability |
//! | [`WeightedPather`] : [`Pather`] | step costs |
//! | [`AstarPather`] : [`WeightedPather`] | heuristic estimates |
//!
//! [`MaskPather`] implements all three for a [`Mask`](gridnav_core::Mask).

mod bidir;
mod heuristic;
mod mask_pather;
mod neighbors;
mod space;
mod traits;

pub use gridnav_core::CancelToken;

pub use bidir::{SearchError, SearchOptions, Termination, find_path, find_path_with_cancel};
pub use heuristic::Heuristic;
pub use mask_pather::{DIAGONAL_COST, MaskPather, ORTHOGONAL_COST, path_cost, step_cost};
pub use neighbors::{DiagonalMovement, UnknownDiagonalMovement, push_moves};
pub use space::SearchSpace;
pub use traits::{AstarPather, Pather, WeightedPather};
