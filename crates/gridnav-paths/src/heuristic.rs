//! Distance estimates between grid cells.

use std::convert::Infallible;
use std::f64::consts::SQRT_2;
use std::fmt;
use std::str::FromStr;

/// A named distance estimate over absolute coordinate deltas `(dx, dy)`.
///
/// Names resolve with [`Heuristic::from_name`]; an unknown name falls back to
/// [`Heuristic::Manhattan`] rather than failing.
///
/// Under 8-way movement with √2 diagonals, `Euclidean`, `Octile` and
/// `Chebyshev` never overestimate. `Manhattan` does on diagonal runs, so
/// searches using it are not guaranteed shortest.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Heuristic {
    /// `dx + dy`
    #[default]
    Manhattan,
    /// `sqrt(dx² + dy²)`
    Euclidean,
    /// `max(dx, dy) + (√2 − 1)·min(dx, dy)`
    Octile,
    /// `max(dx, dy)`
    Chebyshev,
}

impl Heuristic {
    /// Every variant, in registry order.
    pub const ALL: [Heuristic; 4] = [
        Self::Manhattan,
        Self::Euclidean,
        Self::Octile,
        Self::Chebyshev,
    ];

    /// Resolve a registry name, falling back to `Manhattan`.
    pub fn from_name(name: &str) -> Self {
        Self::lookup(name).unwrap_or_else(|| {
            log::debug!("unknown heuristic {name:?}, using manhattan");
            Self::Manhattan
        })
    }

    /// Resolve a registry name exactly.
    pub fn lookup(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|h| h.name() == name)
    }

    /// Registry name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Manhattan => "manhattan",
            Self::Euclidean => "euclidean",
            Self::Octile => "octile",
            Self::Chebyshev => "chebyshev",
        }
    }

    /// Estimate the cost of covering `dx` columns and `dy` rows.
    #[inline]
    pub fn estimate(self, dx: u32, dy: u32) -> f64 {
        let (dx, dy) = (f64::from(dx), f64::from(dy));
        match self {
            Self::Manhattan => dx + dy,
            Self::Euclidean => dx.hypot(dy),
            Self::Octile => dx.max(dy) + (SQRT_2 - 1.0) * dx.min(dy),
            Self::Chebyshev => dx.max(dy),
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Heuristic {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Infallible> {
        Ok(Self::from_name(s))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Heuristic {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Heuristic {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from_name(&name))
    }
}
