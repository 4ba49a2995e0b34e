//! Owned, row-major binary obstacle grids.
//!
//! Unlike a view type, a `Mask` owns its storage: every transformation in the
//! preprocessing pipeline produces a fresh mask and leaves its input intact.

use std::fmt;
use std::str::FromStr;

use crate::cell::Cell;
use crate::geom::{Point, Range};

/// Errors raised when building a [`Mask`] from external data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaskError {
    /// Row `row` has `found` cells where `expected` were required.
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A numeric cell value other than 0 or 1.
    InvalidValue { pos: Point, value: u8 },
    /// A text cell other than `#` or `.`.
    InvalidChar { pos: Point, ch: char },
}

impl fmt::Display for MaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RaggedRows {
                row,
                expected,
                found,
            } => write!(f, "row {row} has {found} cells, expected {expected}"),
            Self::InvalidValue { pos, value } => {
                write!(f, "invalid cell value {value} at {pos} (expected 0 or 1)")
            }
            Self::InvalidChar { pos, ch } => {
                write!(f, "invalid cell character {ch:?} at {pos}")
            }
        }
    }
}

impl std::error::Error for MaskError {}

/// A rectangular binary obstacle grid, `width × height`, row-major.
///
/// Dimensions are fixed at construction.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Mask {
    cells: Vec<Cell>,
    width: i32,
    height: i32,
}

impl Mask {
    /// Create an all-free mask. Negative dimensions are clamped to zero.
    pub fn new(width: i32, height: i32) -> Self {
        let w = width.max(0);
        let h = height.max(0);
        Self {
            cells: vec![Cell::Free; (w as usize) * (h as usize)],
            width: w,
            height: h,
        }
    }

    /// Build a mask from rows of cells. All rows must have equal length.
    pub fn from_rows<R: AsRef<[Cell]>>(rows: &[R]) -> Result<Self, MaskError> {
        let width = rows.first().map_or(0, |r| r.as_ref().len());
        let mut cells = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(MaskError::RaggedRows {
                    row: y,
                    expected: width,
                    found: row.len(),
                });
            }
            cells.extend_from_slice(row);
        }
        Ok(Self {
            cells,
            width: width as i32,
            height: rows.len() as i32,
        })
    }

    /// Build a mask from rows of wire values (`0` free, `1` obstacle).
    pub fn from_values<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, MaskError> {
        let mut converted = Vec::with_capacity(rows.len());
        for (y, row) in rows.iter().enumerate() {
            let row = row
                .as_ref()
                .iter()
                .enumerate()
                .map(|(x, &value)| {
                    Cell::try_from(value).map_err(|value| MaskError::InvalidValue {
                        pos: Point::new(x as i32, y as i32),
                        value,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            converted.push(row);
        }
        Self::from_rows(&converted)
    }

    /// Rows of wire values.
    pub fn to_values(&self) -> Vec<Vec<u8>> {
        self.rows()
            .map(|row| row.iter().map(|c| c.value()).collect())
            .collect()
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn size(&self) -> Point {
        Point::new(self.width, self.height)
    }

    /// The range `[0, width) × [0, height)`.
    #[inline]
    pub fn bounds(&self) -> Range {
        Range::new(0, 0, self.width, self.height)
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.width && p.y < self.height
    }

    #[inline]
    fn index(&self, p: Point) -> Option<usize> {
        if self.contains(p) {
            Some(p.y as usize * self.width as usize + p.x as usize)
        } else {
            None
        }
    }

    /// The cell at `p`, or `None` outside the mask.
    #[inline]
    pub fn get(&self, p: Point) -> Option<Cell> {
        self.index(p).map(|i| self.cells[i])
    }

    /// The cell at `p`. Outside the mask every cell reads as free.
    #[inline]
    pub fn at(&self, p: Point) -> Cell {
        self.get(p).unwrap_or_default()
    }

    /// Whether `p` is an in-bounds obstacle.
    #[inline]
    pub fn is_obstacle(&self, p: Point) -> bool {
        self.at(p).is_obstacle()
    }

    /// Whether `p` is in bounds and free (walkable).
    #[inline]
    pub fn is_free(&self, p: Point) -> bool {
        self.get(p).is_some_and(Cell::is_free)
    }

    /// Set the cell at `p`. No-op outside the mask.
    #[inline]
    pub fn set(&mut self, p: Point, cell: Cell) {
        if let Some(i) = self.index(p) {
            self.cells[i] = cell;
        }
    }

    pub fn fill(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    /// Flat row-major cell slice.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Row `y` as a slice. Panics if `y` is out of range.
    #[inline]
    pub fn row(&self, y: i32) -> &[Cell] {
        let w = self.width as usize;
        let start = y as usize * w;
        &self.cells[start..start + w]
    }

    /// Iterator over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        // chunks_exact(0) panics, and a zero-width mask has no cells anyway.
        let w = (self.width as usize).max(1);
        self.cells.chunks_exact(w)
    }

    /// Row-major iterator over `(Point, Cell)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Point, Cell)> + '_ {
        self.bounds().iter().zip(self.cells.iter().copied())
    }

    /// Number of cells equal to `cell`.
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// Copy of the part of the mask inside `rng`, re-anchored at (0, 0).
    pub fn crop(&self, rng: Range) -> Mask {
        let rng = rng.intersect(self.bounds());
        let mut out = Mask::new(rng.width(), rng.height());
        for p in rng {
            out.set(p - rng.min, self.at(p));
        }
        out
    }
}

impl fmt::Debug for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mask {}x{}", self.width, self.height)?;
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Mask {
    /// One line per row, `#` for obstacles and `.` for free cells.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for c in row {
                f.write_str(if c.is_obstacle() { "#" } else { "." })?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}

impl FromStr for Mask {
    type Err = MaskError;

    /// Parse the [`Display`](fmt::Display) format. Blank lines and
    /// surrounding whitespace are ignored.
    fn from_str(s: &str) -> Result<Self, MaskError> {
        let mut rows = Vec::new();
        for (y, line) in s.lines().map(str::trim).filter(|l| !l.is_empty()).enumerate() {
            let row = line
                .chars()
                .enumerate()
                .map(|(x, ch)| match ch {
                    '#' => Ok(Cell::Obstacle),
                    '.' => Ok(Cell::Free),
                    ch => Err(MaskError::InvalidChar {
                        pos: Point::new(x as i32, y as i32),
                        ch,
                    }),
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(row);
        }
        Self::from_rows(&rows)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Mask {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(self.height as usize))?;
        for row in self.rows() {
            seq.serialize_element(row)?;
        }
        seq.end()
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Mask {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rows = Vec::<Vec<Cell>>::deserialize(deserializer)?;
        Mask::from_rows(&rows).map_err(serde::de::Error::custom)
    }
}
