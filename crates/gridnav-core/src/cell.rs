//! A single walkability value of a [`Mask`](crate::Mask).

/// A binary grid cell. The discriminants are the wire values (`0` / `1`).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Cell {
    #[default]
    Free = 0,
    Obstacle = 1,
}

impl Cell {
    /// Build a cell from an obstacle flag.
    #[inline]
    pub const fn from_obstacle(obstacle: bool) -> Self {
        if obstacle { Self::Obstacle } else { Self::Free }
    }

    #[inline]
    pub const fn is_obstacle(self) -> bool {
        matches!(self, Self::Obstacle)
    }

    #[inline]
    pub const fn is_free(self) -> bool {
        matches!(self, Self::Free)
    }

    /// Wire value of the cell.
    #[inline]
    pub const fn value(self) -> u8 {
        self as u8
    }
}

impl From<Cell> for u8 {
    fn from(c: Cell) -> Self {
        c.value()
    }
}

impl TryFrom<u8> for Cell {
    type Error = u8;

    /// Only `0` and `1` are valid; any other value is returned as the error.
    fn try_from(v: u8) -> Result<Self, u8> {
        match v {
            0 => Ok(Self::Free),
            1 => Ok(Self::Obstacle),
            other => Err(other),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Cell {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.value())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Cell {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let v = u8::deserialize(deserializer)?;
        Cell::try_from(v).map_err(|v| {
            serde::de::Error::invalid_value(
                serde::de::Unexpected::Unsigned(u64::from(v)),
                &"0 (free) or 1 (obstacle)",
            )
        })
    }
}
