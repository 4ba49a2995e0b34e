use std::fmt;
use std::str::FromStr;

use gridnav_core::Point;

/// When a diagonal step between two cells is allowed, based on the two
/// orthogonal cells it passes between.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum DiagonalMovement {
    /// Diagonals are always allowed, even between two blocked side cells
    /// (corner cutting).
    #[default]
    Always,
    /// 4-way movement only.
    Never,
    /// Allowed unless both side cells are blocked.
    IfAtMostOneObstacle,
    /// Allowed only when both side cells are free.
    OnlyWhenNoObstacles,
}

impl DiagonalMovement {
    pub const ALL: [DiagonalMovement; 4] = [
        Self::Always,
        Self::Never,
        Self::IfAtMostOneObstacle,
        Self::OnlyWhenNoObstacles,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Never => "never",
            Self::IfAtMostOneObstacle => "if-at-most-one-obstacle",
            Self::OnlyWhenNoObstacles => "only-when-no-obstacles",
        }
    }

    /// Whether a diagonal step is allowed given whether each side cell is
    /// passable.
    #[inline]
    pub const fn allows(self, side_a: bool, side_b: bool) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::IfAtMostOneObstacle => side_a || side_b,
            Self::OnlyWhenNoObstacles => side_a && side_b,
        }
    }
}

impl fmt::Display for DiagonalMovement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown [`DiagonalMovement`] name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown diagonal movement policy {0:?}")]
pub struct UnknownDiagonalMovement(pub String);

impl FromStr for DiagonalMovement {
    type Err = UnknownDiagonalMovement;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.name() == s)
            .ok_or_else(|| UnknownDiagonalMovement(s.to_string()))
    }
}

const CARDINALS: [Point; 4] = [
    Point::new(0, -1),
    Point::new(1, 0),
    Point::new(0, 1),
    Point::new(-1, 0),
];

const DIAGONALS: [Point; 4] = [
    Point::new(1, -1),
    Point::new(1, 1),
    Point::new(-1, 1),
    Point::new(-1, -1),
];

/// Append the passable moves from `p` into `buf`: cardinal steps first
/// (up, right, down, left), then the diagonals `policy` allows (up-right,
/// down-right, down-left, up-left).
pub fn push_moves(
    p: Point,
    policy: DiagonalMovement,
    passable: impl Fn(Point) -> bool,
    buf: &mut Vec<Point>,
) {
    for d in CARDINALS {
        let n = p + d;
        if passable(n) {
            buf.push(n);
        }
    }
    if policy == DiagonalMovement::Never {
        return;
    }
    for d in DIAGONALS {
        let n = p + d;
        if !passable(n) {
            continue;
        }
        let side_a = passable(p.shift(d.x, 0));
        let side_b = passable(p.shift(0, d.y));
        if policy.allows(side_a, side_b) {
            buf.push(n);
        }
    }
}
