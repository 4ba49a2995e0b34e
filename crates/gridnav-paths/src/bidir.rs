//! Bidirectional best-first search.
//!
//! Two searches run in alternation, one from each endpoint, each with its own
//! open set ordered by `f = g + h` where `h` estimates the distance to the
//! *other* search's origin. Whenever a node reached by one side is already
//! known to the other, the combined cost is a meeting candidate; the cheapest
//! candidate becomes the path.

use std::collections::BinaryHeap;

use gridnav_core::{CancelToken, Mask, Point};

use crate::SearchSpace;
use crate::heuristic::Heuristic;
use crate::mask_pather::MaskPather;
use crate::neighbors::DiagonalMovement;
use crate::space::{Node, NodeRef};
use crate::traits::AstarPather;

/// How often (in node expansions) a search polls its [`CancelToken`].
const CANCEL_POLL_INTERVAL: usize = 256;

/// When the bidirectional search stops once the two sides have met.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Termination {
    /// Keep searching until neither open set can produce a cheaper meeting.
    /// Yields a shortest path when the heuristic is admissible.
    #[default]
    Optimal,
    /// Stop at the first meeting. Cheaper, but the path may be longer than
    /// necessary.
    FirstMeeting,
}

/// Errors raised by path searches. An unreachable goal is not an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("point {0} is outside the grid")]
    OutOfBounds(Point),
    #[error("search cancelled")]
    Cancelled,
}

/// Search parameters for [`find_path`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchOptions {
    pub heuristic: Heuristic,
    pub diagonal: DiagonalMovement,
    pub termination: Termination,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Side {
    Forward,
    Backward,
}

impl Side {
    fn other(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

/// Return the best valid entry of `heap` without removing it, discarding
/// entries for closed nodes or superseded costs on the way.
fn peek_valid(heap: &mut BinaryHeap<NodeRef>, nodes: &[Node], generation: u32) -> Option<NodeRef> {
    while let Some(&top) = heap.peek() {
        let n = &nodes[top.idx];
        if n.generation == generation && !n.closed && top.g <= n.g {
            return Some(top);
        }
        heap.pop();
    }
    None
}

impl SearchSpace {
    /// Compute a path from `from` to `to` with a bidirectional search.
    ///
    /// Returns the full path (including both endpoints), or an empty path if
    /// `to` is unreachable or either endpoint is not passable. Endpoints
    /// outside the range are an error.
    pub fn bidir_path<P: AstarPather>(
        &mut self,
        pather: &P,
        from: Point,
        to: Point,
        termination: Termination,
        cancel: &CancelToken,
    ) -> Result<Vec<Point>, SearchError> {
        let start_idx = self.idx(from).ok_or(SearchError::OutOfBounds(from))?;
        let goal_idx = self.idx(to).ok_or(SearchError::OutOfBounds(to))?;

        if !pather.passable(from) || !pather.passable(to) {
            log::debug!("search {from} -> {to}: endpoint blocked");
            return Ok(Vec::new());
        }
        if start_idx == goal_idx {
            return Ok(vec![from]);
        }

        let cur_gen = self.next_generation();
        let layout = self.layout;
        let SearchSpace {
            forward,
            backward,
            nbuf,
            ..
        } = self;

        let mut fwd_heap = BinaryHeap::new();
        let mut bwd_heap = BinaryHeap::new();
        let root = Node {
            g: 0.0,
            parent: usize::MAX,
            generation: cur_gen,
            closed: false,
        };
        forward[start_idx] = root.clone();
        backward[goal_idx] = root;
        fwd_heap.push(NodeRef {
            idx: start_idx,
            f: pather.estimate(from, to),
            g: 0.0,
            seq: 0,
        });
        bwd_heap.push(NodeRef {
            idx: goal_idx,
            f: pather.estimate(to, from),
            g: 0.0,
            seq: 1,
        });
        let mut seq: u64 = 2;

        let mut best = f64::INFINITY;
        let mut meet: Option<usize> = None;
        let mut side = Side::Forward;
        let mut expanded: usize = 0;

        let outcome = 'search: loop {
            if expanded % CANCEL_POLL_INTERVAL == 0 && cancel.is_cancelled() {
                break 'search Err(SearchError::Cancelled);
            }

            let Some(top_fwd) = peek_valid(&mut fwd_heap, forward, cur_gen) else {
                break 'search Ok(());
            };
            let Some(top_bwd) = peek_valid(&mut bwd_heap, backward, cur_gen) else {
                break 'search Ok(());
            };
            if meet.is_some() {
                let done = match termination {
                    Termination::FirstMeeting => true,
                    Termination::Optimal => top_fwd.f.max(top_bwd.f) >= best,
                };
                if done {
                    break 'search Ok(());
                }
            }

            let (this, other, heap, target) = match side {
                Side::Forward => (&mut *forward, &*backward, &mut fwd_heap, to),
                Side::Backward => (&mut *backward, &*forward, &mut bwd_heap, from),
            };
            let Some(current) = heap.pop() else {
                break 'search Ok(());
            };
            side = side.other();

            let ci = current.idx;
            this[ci].closed = true;
            expanded += 1;
            let current_g = this[ci].g;
            let current_point = layout.point(ci);

            if other[ci].generation == cur_gen && current_g + other[ci].g < best {
                best = current_g + other[ci].g;
                meet = Some(ci);
            }

            nbuf.clear();
            pather.neighbors(current_point, nbuf);

            for &np in nbuf.iter() {
                let Some(ni) = layout.idx(np) else {
                    continue;
                };
                let tentative_g = current_g + pather.cost(current_point, np);

                let n = &mut this[ni];
                if n.generation == cur_gen {
                    if tentative_g >= n.g {
                        continue;
                    }
                } else {
                    n.generation = cur_gen;
                }

                n.g = tentative_g;
                n.parent = ci;
                n.closed = false;
                heap.push(NodeRef {
                    idx: ni,
                    f: tentative_g + pather.estimate(np, target),
                    g: tentative_g,
                    seq,
                });
                seq += 1;

                if other[ni].generation == cur_gen && tentative_g + other[ni].g < best {
                    best = tentative_g + other[ni].g;
                    meet = Some(ni);
                }
            }
        };

        if let Err(err) = outcome {
            log::debug!("search {from} -> {to}: cancelled after {expanded} expansions");
            return Err(err);
        }

        let Some(m) = meet else {
            log::debug!("search {from} -> {to}: unreachable after {expanded} expansions");
            return Ok(Vec::new());
        };

        let mut path = Vec::new();
        let mut ci = m;
        while ci != usize::MAX {
            path.push(layout.point(ci));
            ci = forward[ci].parent;
        }
        path.reverse();
        let mut ci = backward[m].parent;
        while ci != usize::MAX {
            path.push(layout.point(ci));
            ci = backward[ci].parent;
        }

        log::debug!(
            "search {from} -> {to}: {} cells, cost {best:.3}, {expanded} expansions",
            path.len()
        );
        Ok(path)
    }
}

/// Find a path across `mask` from `start` to `end`.
///
/// Obstacle cells are impassable. Returns an empty path when no path exists
/// or either endpoint is an obstacle, and [`SearchError::OutOfBounds`] when an
/// endpoint lies outside the mask.
pub fn find_path(
    mask: &Mask,
    start: Point,
    end: Point,
    opts: &SearchOptions,
) -> Result<Vec<Point>, SearchError> {
    find_path_with_cancel(mask, start, end, opts, &CancelToken::new())
}

/// [`find_path`] that stops early with [`SearchError::Cancelled`] once
/// `cancel` is set.
pub fn find_path_with_cancel(
    mask: &Mask,
    start: Point,
    end: Point,
    opts: &SearchOptions,
    cancel: &CancelToken,
) -> Result<Vec<Point>, SearchError> {
    let pather = MaskPather::new(mask, opts.heuristic, opts.diagonal);
    let mut space = SearchSpace::new(mask.bounds());
    space.bidir_path(&pather, start, end, opts.termination, cancel)
}
