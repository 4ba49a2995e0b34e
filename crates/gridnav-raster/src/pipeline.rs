use std::time::Instant;

use gridnav_core::{CancelToken, DEFAULT_TILE_SIZE, Mask, Tile, partition};
use image::RgbaImage;

use crate::classify::ColorRuleSet;
use crate::decode::decode_image;
use crate::error::ProcessingError;
use crate::morph::{DEFAULT_BUFFER_RADIUS, SmoothingRule, dilate, smooth};

/// Image-to-tiles preprocessing: classify, dilate, smooth, partition.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Pipeline {
    pub rules: ColorRuleSet,
    /// Safety radius for obstacle dilation, in cells.
    pub buffer_radius: i32,
    pub smoothing: SmoothingRule,
    pub tile_size: i32,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            rules: ColorRuleSet::default(),
            buffer_radius: DEFAULT_BUFFER_RADIUS,
            smoothing: SmoothingRule::default(),
            tile_size: DEFAULT_TILE_SIZE,
        }
    }
}

/// Result of a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub width: i32,
    pub height: i32,
    /// The smoothed mask the tiles were cut from.
    pub mask: Mask,
    pub tiles: Vec<Tile>,
}

impl Pipeline {
    /// Check the parameters that would otherwise panic or be meaningless.
    pub fn validate(&self) -> Result<(), ProcessingError> {
        if self.tile_size <= 0 {
            return Err(ProcessingError::InvalidConfig(format!(
                "tile size must be positive, got {}",
                self.tile_size
            )));
        }
        if self.buffer_radius < 0 {
            return Err(ProcessingError::InvalidConfig(format!(
                "buffer radius must not be negative, got {}",
                self.buffer_radius
            )));
        }
        if self.smoothing.radius < 0 {
            return Err(ProcessingError::InvalidConfig(format!(
                "smoothing radius must not be negative, got {}",
                self.smoothing.radius
            )));
        }
        Ok(())
    }

    /// Run every stage on an RGBA image.
    pub fn run(&self, img: &RgbaImage) -> Result<PipelineOutput, ProcessingError> {
        self.run_with_cancel(img, &CancelToken::new())
    }

    /// Like [`run`](Self::run), but checks `cancel` before each stage and
    /// stops with [`ProcessingError::Cancelled`] once it is set.
    pub fn run_with_cancel(
        &self,
        img: &RgbaImage,
        cancel: &CancelToken,
    ) -> Result<PipelineOutput, ProcessingError> {
        self.validate()?;
        if img.width() == 0 || img.height() == 0 {
            return Err(ProcessingError::EmptyImage);
        }

        check(cancel)?;
        let start = Instant::now();
        let classified = self.rules.classify(img)?;
        log::debug!(
            "classified {}x{} image in {:?}: {} obstacle cells",
            classified.width(),
            classified.height(),
            start.elapsed(),
            classified.count(gridnav_core::Cell::Obstacle)
        );

        check(cancel)?;
        let start = Instant::now();
        let dilated = dilate(&classified, self.buffer_radius);
        check(cancel)?;
        let mask = smooth(&dilated, &self.smoothing);
        log::debug!(
            "dilated (r={}) and smoothed in {:?}",
            self.buffer_radius,
            start.elapsed()
        );

        check(cancel)?;
        let tiles = partition(&mask, self.tile_size);
        log::info!(
            "processed {}x{} map into {} tiles of {}",
            mask.width(),
            mask.height(),
            tiles.len(),
            self.tile_size
        );
        Ok(PipelineOutput {
            width: mask.width(),
            height: mask.height(),
            mask,
            tiles,
        })
    }

    /// Decode `bytes` and run the pipeline on the result.
    pub fn run_bytes(&self, bytes: &[u8]) -> Result<PipelineOutput, ProcessingError> {
        let img = decode_image(bytes)?;
        self.run(&img)
    }
}

fn check(cancel: &CancelToken) -> Result<(), ProcessingError> {
    if cancel.is_cancelled() {
        log::debug!("pipeline cancelled");
        return Err(ProcessingError::Cancelled);
    }
    Ok(())
}
