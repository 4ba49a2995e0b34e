use gridnav_core::Point;

/// Neighbor enumeration over a grid, the minimal search interface.
pub trait Pather {
    /// Append neighbors of `p` into `buf`. The caller clears `buf` before calling.
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>);

    /// Whether `p` may start or end a path. Defaults to `true`.
    fn passable(&self, _p: Point) -> bool {
        true
    }
}

/// Pather with weighted (positive-cost) edges.
pub trait WeightedPather: Pather {
    /// Cost of moving from `from` to adjacent `to`. Must be > 0.
    fn cost(&self, from: Point, to: Point) -> f64;
}

/// Full best-first pather with a heuristic estimate.
pub trait AstarPather: WeightedPather {
    /// Heuristic estimate of the cost from `from` to `to`. Shortest paths are
    /// only guaranteed when this never overestimates (admissible).
    fn estimate(&self, from: Point, to: Point) -> f64;
}
