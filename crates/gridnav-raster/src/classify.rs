//! Pixel classification by reference-color match.

use gridnav_core::{Cell, Mask, Point};
use image::{Rgb, RgbaImage};

use crate::error::ProcessingError;

/// Terrain colors that mark a pixel as an obstacle.
pub const REFERENCE_COLORS: [[u8; 3]; 7] = [
    [0x62, 0x56, 0x32],
    [0x20, 0x2c, 0x0c],
    [0x8d, 0x5e, 0x4a],
    [0x4a, 0x4a, 0x6c],
    [0x47, 0x6a, 0x99],
    [0x75, 0x8a, 0x7e],
    [0x4a, 0x72, 0x85],
];

/// Default per-channel match tolerance.
pub const DEFAULT_THRESHOLD: u8 = 10;

/// Reference obstacle colors plus a per-channel tolerance.
///
/// A pixel matches a reference color when each of its red, green and blue
/// channels is within `threshold` of the reference (an L∞ test, not a
/// Euclidean distance).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ColorRuleSet {
    pub colors: Vec<[u8; 3]>,
    pub threshold: u8,
}

impl Default for ColorRuleSet {
    fn default() -> Self {
        Self {
            colors: REFERENCE_COLORS.to_vec(),
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl ColorRuleSet {
    pub fn new(colors: impl Into<Vec<[u8; 3]>>, threshold: u8) -> Self {
        Self {
            colors: colors.into(),
            threshold,
        }
    }

    /// Whether `rgb` matches any reference color.
    #[inline]
    pub fn is_obstacle(&self, rgb: Rgb<u8>) -> bool {
        self.colors.iter().any(|reference| {
            reference
                .iter()
                .zip(rgb.0)
                .all(|(&r, c)| r.abs_diff(c) <= self.threshold)
        })
    }

    /// Classify every pixel of `img`, ignoring alpha.
    pub fn classify(&self, img: &RgbaImage) -> Result<Mask, ProcessingError> {
        let (w, h) = img.dimensions();
        let too_large = || ProcessingError::TooLarge {
            width: w,
            height: h,
        };
        let width = i32::try_from(w).map_err(|_| too_large())?;
        let height = i32::try_from(h).map_err(|_| too_large())?;

        let mut mask = Mask::new(width, height);
        for (x, y, px) in img.enumerate_pixels() {
            let [r, g, b, _] = px.0;
            if self.is_obstacle(Rgb([r, g, b])) {
                mask.set(Point::new(x as i32, y as i32), Cell::Obstacle);
            }
        }
        Ok(mask)
    }
}
