//! Morphological passes over obstacle masks: safety-margin dilation and
//! windowed majority smoothing.

use gridnav_core::{Cell, Mask};

/// Default safety radius, in cells.
pub const DEFAULT_BUFFER_RADIUS: i32 = 2;

/// Grow every obstacle into the square of Chebyshev radius `radius` around
/// it. The window is clipped at the mask edges. A radius of zero or less
/// returns an unchanged copy.
pub fn dilate(mask: &Mask, radius: i32) -> Mask {
    let mut out = mask.clone();
    if radius <= 0 || mask.cells().is_empty() {
        return out;
    }
    let w = mask.width() as usize;
    let h = mask.height() as usize;
    let r = radius as usize;

    // Horizontal pass into a scratch buffer, then vertical pass into `out`.
    let mut horiz = vec![Cell::Free; w * h];
    let mut prefix = vec![0u32; w.max(h) + 1];
    for y in 0..h {
        let row = &mask.cells()[y * w..(y + 1) * w];
        for (x, c) in row.iter().enumerate() {
            prefix[x + 1] = prefix[x] + u32::from(c.is_obstacle());
        }
        for x in 0..w {
            let lo = x.saturating_sub(r);
            let hi = (x + r).min(w - 1);
            horiz[y * w + x] = Cell::from_obstacle(prefix[hi + 1] > prefix[lo]);
        }
    }

    let cells = out.cells_mut();
    for x in 0..w {
        for y in 0..h {
            prefix[y + 1] = prefix[y] + u32::from(horiz[y * w + x].is_obstacle());
        }
        for y in 0..h {
            let lo = y.saturating_sub(r);
            let hi = (y + r).min(h - 1);
            cells[y * w + x] = Cell::from_obstacle(prefix[hi + 1] > prefix[lo]);
        }
    }
    out
}

/// A majority-vote rule over a square window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SmoothingRule {
    /// Window half-size. The window is `2 * radius + 1` cells on a side and
    /// includes the centre cell.
    pub radius: i32,
    /// A cell becomes an obstacle when at least this many cells of its
    /// window are obstacles, and free otherwise.
    pub cutoff: u32,
}

impl Default for SmoothingRule {
    fn default() -> Self {
        Self {
            radius: 2,
            cutoff: 17,
        }
    }
}

impl SmoothingRule {
    /// Number of cells in one window.
    pub fn window_len(&self) -> u32 {
        let side = (2 * self.radius.max(0) + 1) as u32;
        side * side
    }
}

/// Apply `rule` to every cell whose full window lies inside the mask. Cells
/// in the outer `rule.radius` margin are copied unchanged.
pub fn smooth(mask: &Mask, rule: &SmoothingRule) -> Mask {
    let mut out = mask.clone();
    let r = rule.radius.max(0) as usize;
    let w = mask.width() as usize;
    let h = mask.height() as usize;
    if w <= 2 * r || h <= 2 * r {
        return out;
    }

    // Summed-area table with a zero row and column in front.
    let stride = w + 1;
    let mut sat = vec![0u32; stride * (h + 1)];
    for y in 0..h {
        let mut row_sum = 0;
        for x in 0..w {
            row_sum += u32::from(mask.cells()[y * w + x].is_obstacle());
            sat[(y + 1) * stride + x + 1] = sat[y * stride + x + 1] + row_sum;
        }
    }
    let window = |x0: usize, y0: usize, x1: usize, y1: usize| {
        sat[y1 * stride + x1] + sat[y0 * stride + x0]
            - sat[y0 * stride + x1]
            - sat[y1 * stride + x0]
    };

    let cells = out.cells_mut();
    for y in r..h - r {
        for x in r..w - r {
            let count = window(x - r, y - r, x + r + 1, y + r + 1);
            cells[y * w + x] = Cell::from_obstacle(count >= rule.cutoff);
        }
    }
    out
}
