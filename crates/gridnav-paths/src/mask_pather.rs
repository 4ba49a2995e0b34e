use std::f64::consts::SQRT_2;

use gridnav_core::{Mask, Point};

use crate::heuristic::Heuristic;
use crate::neighbors::{DiagonalMovement, push_moves};
use crate::traits::{AstarPather, Pather, WeightedPather};

/// Cost of an orthogonal step.
pub const ORTHOGONAL_COST: f64 = 1.0;
/// Cost of a diagonal step.
pub const DIAGONAL_COST: f64 = SQRT_2;

/// Movement rules over a [`Mask`]: free cells are walkable, moves follow a
/// [`DiagonalMovement`] policy, and estimates come from a [`Heuristic`].
#[derive(Clone, Copy, Debug)]
pub struct MaskPather<'a> {
    mask: &'a Mask,
    heuristic: Heuristic,
    diagonal: DiagonalMovement,
}

impl<'a> MaskPather<'a> {
    pub fn new(mask: &'a Mask, heuristic: Heuristic, diagonal: DiagonalMovement) -> Self {
        Self {
            mask,
            heuristic,
            diagonal,
        }
    }

    pub fn mask(&self) -> &'a Mask {
        self.mask
    }

    pub fn heuristic(&self) -> Heuristic {
        self.heuristic
    }

    pub fn diagonal(&self) -> DiagonalMovement {
        self.diagonal
    }
}

impl Pather for MaskPather<'_> {
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        push_moves(p, self.diagonal, |q| self.mask.is_free(q), buf);
    }

    fn passable(&self, p: Point) -> bool {
        self.mask.is_free(p)
    }
}

impl WeightedPather for MaskPather<'_> {
    fn cost(&self, from: Point, to: Point) -> f64 {
        step_cost(from, to)
    }
}

impl AstarPather for MaskPather<'_> {
    fn estimate(&self, from: Point, to: Point) -> f64 {
        let (dx, dy) = from.abs_delta(to);
        self.heuristic.estimate(dx, dy)
    }
}

/// Cost of a single step between adjacent cells.
#[inline]
pub fn step_cost(from: Point, to: Point) -> f64 {
    if from.x != to.x && from.y != to.y {
        DIAGONAL_COST
    } else {
        ORTHOGONAL_COST
    }
}

/// Total movement cost of a path of adjacent cells.
pub fn path_cost(path: &[Point]) -> f64 {
    path.windows(2).map(|w| step_cost(w[0], w[1])).sum()
}
