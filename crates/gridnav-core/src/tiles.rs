//! Fixed-size transmission tiles.
//!
//! [`partition`] cuts a [`Mask`] into square [`Tile`]s, left to right and top
//! to bottom; [`reassemble`] rebuilds a mask from any ordering of such tiles
//! by writing each one at its origin.

use std::fmt;

use crate::geom::{Point, Range};
use crate::grid::Mask;

/// Default tile edge length.
pub const DEFAULT_TILE_SIZE: i32 = 128;

/// A square sub-grid of a mask, anchored at `origin` in mask coordinates.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub origin: Point,
    pub data: Mask,
}

impl Tile {
    /// Edge length of the tile data (its width).
    #[inline]
    pub fn size(&self) -> i32 {
        self.data.width()
    }

    /// Area covered by the tile in mask coordinates.
    #[inline]
    pub fn range(&self) -> Range {
        Range::with_size(self.origin, self.data.width(), self.data.height())
    }
}

/// Errors raised by [`reassemble`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReassemblyError {
    /// No tiles were supplied.
    Empty,
    /// A tile's data is not square.
    NotSquare {
        index: usize,
        width: i32,
        height: i32,
    },
    /// A tile's edge length differs from the first tile's.
    InconsistentSize {
        index: usize,
        expected: i32,
        found: i32,
    },
    /// A tile has zero edge length.
    ZeroSize,
    /// A tile is anchored at a negative coordinate.
    NegativeOrigin { index: usize, origin: Point },
    /// A tile's far edge lies past `i32::MAX`.
    ExtentTooLarge { index: usize, origin: Point },
}

impl fmt::Display for ReassemblyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "tile list is empty"),
            Self::NotSquare {
                index,
                width,
                height,
            } => write!(f, "tile {index} is {width}x{height}, expected a square"),
            Self::InconsistentSize {
                index,
                expected,
                found,
            } => write!(f, "tile {index} has edge length {found}, expected {expected}"),
            Self::ZeroSize => write!(f, "tiles have zero edge length"),
            Self::NegativeOrigin { index, origin } => {
                write!(f, "tile {index} has negative origin {origin}")
            }
            Self::ExtentTooLarge { index, origin } => {
                write!(f, "tile {index} at {origin} extends past the coordinate range")
            }
        }
    }
}

impl std::error::Error for ReassemblyError {}

/// Split `mask` into `tile_size × tile_size` tiles.
///
/// Origins step by `tile_size` over `y`, then `x`, covering
/// `ceil(width / tile_size) × ceil(height / tile_size)` positions. Cells past
/// the mask edge are free. The order is the transmission order.
///
/// # Panics
///
/// Panics if `tile_size` is not positive.
pub fn partition(mask: &Mask, tile_size: i32) -> Vec<Tile> {
    assert!(tile_size > 0, "tile size must be positive, got {tile_size}");
    let cols = (mask.width() + tile_size - 1) / tile_size;
    let rows = (mask.height() + tile_size - 1) / tile_size;
    let mut tiles = Vec::with_capacity((cols.max(0) * rows.max(0)) as usize);

    for ty in 0..rows {
        for tx in 0..cols {
            let origin = Point::new(tx * tile_size, ty * tile_size);
            let mut data = Mask::new(tile_size, tile_size);
            let src = Range::with_size(origin, tile_size, tile_size).intersect(mask.bounds());
            for p in src {
                data.set(p - origin, mask.at(p));
            }
            tiles.push(Tile { origin, data });
        }
    }
    tiles
}

/// Validate `tiles` and return the range they span once reassembled.
///
/// The range always starts at the origin. This is the size [`reassemble`]
/// would allocate, so callers can bound it before committing to it.
pub fn tile_extent(tiles: &[Tile]) -> Result<Range, ReassemblyError> {
    let first = tiles.first().ok_or(ReassemblyError::Empty)?;
    let size = first.data.width();

    let mut max = Point::ZERO;
    for (index, tile) in tiles.iter().enumerate() {
        let (w, h) = (tile.data.width(), tile.data.height());
        if w != h {
            return Err(ReassemblyError::NotSquare {
                index,
                width: w,
                height: h,
            });
        }
        if w != size {
            return Err(ReassemblyError::InconsistentSize {
                index,
                expected: size,
                found: w,
            });
        }
        let origin = tile.origin;
        if origin.x < 0 || origin.y < 0 {
            return Err(ReassemblyError::NegativeOrigin { index, origin });
        }
        let (Some(x1), Some(y1)) = (origin.x.checked_add(w), origin.y.checked_add(h)) else {
            return Err(ReassemblyError::ExtentTooLarge { index, origin });
        };
        max = Point::new(max.x.max(x1), max.y.max(y1));
    }
    if size == 0 {
        return Err(ReassemblyError::ZeroSize);
    }
    Ok(Range::new(0, 0, max.x, max.y))
}

/// Rebuild one mask from `tiles`.
///
/// The result spans `[0, max origin + tile size)` on each axis. Tiles are
/// written in list order, so a later tile overwrites an earlier one where
/// they overlap; positions no tile covers are free.
pub fn reassemble(tiles: &[Tile]) -> Result<Mask, ReassemblyError> {
    let extent = tile_extent(tiles)?;
    let mut mask = Mask::new(extent.width(), extent.height());
    for tile in tiles {
        for (p, cell) in tile.data.iter() {
            mask.set(tile.origin + p, cell);
        }
    }
    Ok(mask)
}
