use std::cmp::Ordering;

use gridnav_core::{Point, Range};

// ---------------------------------------------------------------------------
// Internal node for the priority-queue searches
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub(crate) struct Node {
    pub(crate) g: f64,
    pub(crate) parent: usize,
    pub(crate) generation: u32,
    pub(crate) closed: bool,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            g: f64::INFINITY,
            parent: usize::MAX,
            generation: 0,
            closed: false,
        }
    }
}

/// Open-set entry. The heap pops the smallest `f`, then the smallest `g`,
/// then the earliest insertion.
#[derive(Clone, Copy, Debug)]
pub(crate) struct NodeRef {
    pub(crate) idx: usize,
    pub(crate) f: f64,
    pub(crate) g: f64,
    pub(crate) seq: u64,
}

impl Ord for NodeRef {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap (max-heap) pops the best entry first.
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.g.total_cmp(&self.g))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for NodeRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for NodeRef {}

// ---------------------------------------------------------------------------
// SearchSpace
// ---------------------------------------------------------------------------

/// Node storage for searches over a grid rectangle.
///
/// `SearchSpace` owns one node array per search direction and invalidates
/// them lazily with a generation counter, so repeated queries over the same
/// range allocate nothing after the first use.
pub struct SearchSpace {
    pub(crate) layout: Layout,
    pub(crate) forward: Vec<Node>,
    pub(crate) backward: Vec<Node>,
    pub(crate) generation: u32,
    // shared scratch buffer for neighbor queries
    pub(crate) nbuf: Vec<Point>,
}

impl SearchSpace {
    /// Create a new `SearchSpace` for the given grid rectangle.
    pub fn new(rng: Range) -> Self {
        let len = rng.len();
        Self {
            layout: Layout::new(rng),
            forward: vec![Node::default(); len],
            backward: vec![Node::default(); len],
            generation: 0,
            nbuf: Vec::with_capacity(8),
        }
    }

    /// The grid rectangle being searched.
    #[inline]
    pub fn range(&self) -> Range {
        self.layout.rng
    }

    /// Start a new search generation, invalidating every node.
    pub(crate) fn next_generation(&mut self) -> u32 {
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            // Wrapped: stale nodes could alias the new generation.
            for n in self.forward.iter_mut().chain(self.backward.iter_mut()) {
                n.generation = 0;
            }
            self.generation = 1;
        }
        self.generation
    }

    #[inline]
    pub(crate) fn idx(&self, p: Point) -> Option<usize> {
        self.layout.idx(p)
    }

    #[cfg(test)]
    pub(crate) fn point(&self, idx: usize) -> Point {
        self.layout.point(idx)
    }
}

/// Mapping between points of a range and flat row-major indices.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Layout {
    pub(crate) rng: Range,
    pub(crate) width: usize,
}

impl Layout {
    fn new(rng: Range) -> Self {
        Self {
            rng,
            width: rng.width().max(0) as usize,
        }
    }

    /// Convert a `Point` to a flat index. Returns `None` if out of range.
    #[inline]
    pub(crate) fn idx(self, p: Point) -> Option<usize> {
        if !self.rng.contains(p) {
            return None;
        }
        let x = (p.x - self.rng.min.x) as usize;
        let y = (p.y - self.rng.min.y) as usize;
        Some(y * self.width + x)
    }

    /// Convert a flat index back to a `Point`.
    #[inline]
    pub(crate) fn point(self, idx: usize) -> Point {
        let x = (idx % self.width) as i32 + self.rng.min.x;
        let y = (idx / self.width) as i32 + self.rng.min.y;
        Point::new(x, y)
    }
}
