use gridnav_paths::{DiagonalMovement, Termination};
use gridnav_raster::Pipeline;
use serde::{Deserialize, Serialize};

/// Default cap on the number of tiles accepted by a find-path request.
pub const DEFAULT_MAX_TILES: usize = 4096;
/// Default cap on decoded image size, in pixels.
pub const DEFAULT_MAX_IMAGE_PIXELS: u64 = 16 * 1024 * 1024;
/// Default cap on the area of a reassembled find-path grid, in cells.
pub const DEFAULT_MAX_GRID_CELLS: u64 = 32 * 1024 * 1024;

/// Service-wide settings. Every field has a default, so a partial JSON
/// document only overrides what it names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    #[serde(flatten)]
    pub pipeline: Pipeline,
    pub diagonal: DiagonalMovement,
    pub termination: Termination,
    pub max_tiles: usize,
    pub max_image_pixels: u64,
    /// Largest grid a tile list may describe. Tile origins are not bounded
    /// otherwise, and a single far-away tile would size the whole grid.
    pub max_grid_cells: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            pipeline: Pipeline::default(),
            diagonal: DiagonalMovement::default(),
            termination: Termination::default(),
            max_tiles: DEFAULT_MAX_TILES,
            max_image_pixels: DEFAULT_MAX_IMAGE_PIXELS,
            max_grid_cells: DEFAULT_MAX_GRID_CELLS,
        }
    }
}

impl ServiceConfig {
    /// Parse a JSON configuration document.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        assert_eq!(ServiceConfig::from_json("{}").unwrap(), ServiceConfig::default());
    }

    #[test]
    fn partial_override() {
        let cfg = ServiceConfig::from_json(
            r#"{ "tile_size": 64, "diagonal": "never", "max_tiles": 10, "max_grid_cells": 4096 }"#,
        )
        .unwrap();
        assert_eq!(cfg.pipeline.tile_size, 64);
        assert_eq!(cfg.pipeline.buffer_radius, 2);
        assert_eq!(cfg.diagonal, DiagonalMovement::Never);
        assert_eq!(cfg.termination, Termination::Optimal);
        assert_eq!(cfg.max_tiles, 10);
        assert_eq!(cfg.max_grid_cells, 4096);
        assert_eq!(cfg.max_image_pixels, DEFAULT_MAX_IMAGE_PIXELS);
    }

    #[test]
    fn nested_smoothing_rule() {
        let cfg = ServiceConfig::from_json(r#"{ "smoothing": { "cutoff": 20 } }"#).unwrap();
        assert_eq!(cfg.pipeline.smoothing.cutoff, 20);
        assert_eq!(cfg.pipeline.smoothing.radius, 2);
    }
}
