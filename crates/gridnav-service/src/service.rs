use std::sync::Arc;

use gridnav_core::{Mask, Range, ReassemblyError, Tile, reassemble, tile_extent};
use gridnav_paths::{CancelToken, Heuristic, SearchError, SearchOptions, find_path_with_cancel};
use gridnav_raster::{ProcessingError, decode_image, image_dimensions};
use image::RgbaImage;

use crate::api::{ClassifyResponse, FindPathRequest, FindPathResponse};
use crate::config::ServiceConfig;
use crate::error::ServiceError;

/// Classify and find-path operations over a shared, read-only
/// [`ServiceConfig`].
///
/// The `*_blocking` methods run on the calling thread. The async methods
/// move the same work onto tokio's blocking pool so request handling is not
/// held up by grid computations.
#[derive(Clone, Debug, Default)]
pub struct GridService {
    config: Arc<ServiceConfig>,
}

/// Cancels its token when dropped, which stops work whose awaiting caller
/// has gone away.
struct CancelOnDrop(CancelToken);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

impl GridService {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    // ---------------------------------------------------------------------
    // Classify
    // ---------------------------------------------------------------------

    /// Decode an encoded image and classify it into tiles.
    pub fn classify_bytes_blocking(
        &self,
        bytes: &[u8],
        cancel: &CancelToken,
    ) -> Result<ClassifyResponse, ServiceError> {
        if bytes.is_empty() {
            return Err(ServiceError::validation("no image data"));
        }
        let (w, h) = image_dimensions(bytes)?;
        self.check_pixels(w, h)?;
        let img = decode_image(bytes)?;
        self.classify_image_blocking(&img, cancel)
    }

    /// Classify an already decoded RGBA image into tiles.
    pub fn classify_image_blocking(
        &self,
        img: &RgbaImage,
        cancel: &CancelToken,
    ) -> Result<ClassifyResponse, ServiceError> {
        self.check_pixels(img.width(), img.height())?;
        let pipeline = &self.config.pipeline;
        let out = pipeline.run_with_cancel(img, cancel)?;
        Ok(ClassifyResponse {
            tiles: out.tiles,
            width: out.width,
            height: out.height,
            tile_size: pipeline.tile_size,
        })
    }

    /// Run [`classify_bytes_blocking`](Self::classify_bytes_blocking) on the
    /// blocking pool. Dropping the returned future stops the pipeline at its
    /// next stage boundary.
    pub async fn classify_bytes(&self, bytes: Vec<u8>) -> Result<ClassifyResponse, ServiceError> {
        let token = CancelToken::new();
        let _guard = CancelOnDrop(token.clone());
        self.classify_bytes_with_token(bytes, token).await
    }

    /// Like [`classify_bytes`](Self::classify_bytes), but cancelled through a
    /// token the caller holds.
    pub async fn classify_bytes_with_token(
        &self,
        bytes: Vec<u8>,
        cancel: CancelToken,
    ) -> Result<ClassifyResponse, ServiceError> {
        let svc = self.clone();
        tokio::task::spawn_blocking(move || svc.classify_bytes_blocking(&bytes, &cancel))
            .await
            .map_err(|e| ServiceError::Worker(e.to_string()))?
    }

    fn check_pixels(&self, width: u32, height: u32) -> Result<(), ServiceError> {
        if width == 0 || height == 0 {
            return Err(ProcessingError::EmptyImage.into());
        }
        let pixels = u64::from(width) * u64::from(height);
        if pixels > self.config.max_image_pixels {
            return Err(ServiceError::validation(format!(
                "image of {width}x{height} pixels exceeds the limit of {}",
                self.config.max_image_pixels
            )));
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Find path
    // ---------------------------------------------------------------------

    /// Reassemble the request's tiles and search for a path.
    pub fn find_path_blocking(
        &self,
        req: &FindPathRequest,
        cancel: &CancelToken,
    ) -> Result<FindPathResponse, ServiceError> {
        let mask = self.request_mask(req)?;
        let opts = SearchOptions {
            heuristic: Heuristic::from_name(&req.heuristic_name),
            diagonal: req.diagonal.unwrap_or(self.config.diagonal),
            termination: self.config.termination,
        };
        let path = find_path_with_cancel(&mask, req.start(), req.end(), &opts, cancel)
            .map_err(|err| match err {
                SearchError::OutOfBounds(p) => ServiceError::validation(format!(
                    "point {p} is outside the {}x{} grid",
                    mask.width(),
                    mask.height()
                )),
                SearchError::Cancelled => ServiceError::Cancelled,
            })?;
        log::debug!(
            "find-path {} -> {} with {}: {} cells",
            req.start(),
            req.end(),
            opts.heuristic,
            path.len()
        );
        Ok(path.into_iter().collect())
    }

    /// Run [`find_path_blocking`](Self::find_path_blocking) on the blocking
    /// pool. Dropping the returned future cancels the search.
    pub async fn find_path(&self, req: FindPathRequest) -> Result<FindPathResponse, ServiceError> {
        let token = CancelToken::new();
        let _guard = CancelOnDrop(token.clone());
        self.find_path_with_token(req, token).await
    }

    /// Like [`find_path`](Self::find_path), but cancelled through a token
    /// the caller holds.
    pub async fn find_path_with_token(
        &self,
        req: FindPathRequest,
        cancel: CancelToken,
    ) -> Result<FindPathResponse, ServiceError> {
        let svc = self.clone();
        tokio::task::spawn_blocking(move || svc.find_path_blocking(&req, &cancel))
            .await
            .map_err(|e| ServiceError::Worker(e.to_string()))?
    }

    /// Validate the tile list and rebuild the grid it describes.
    fn request_mask(&self, req: &FindPathRequest) -> Result<Mask, ServiceError> {
        if req.tiles.is_empty() {
            return Err(ServiceError::validation("tile list is empty"));
        }
        if req.tiles.len() > self.config.max_tiles {
            return Err(ServiceError::validation(format!(
                "{} tiles exceed the limit of {}",
                req.tiles.len(),
                self.config.max_tiles
            )));
        }
        for (i, tile) in req.tiles.iter().enumerate() {
            check_tile(i, tile)?;
        }
        self.check_extent(&req.tiles)?;

        let mask = reassemble(&req.tiles)?;
        match (req.width, req.height) {
            (None, None) => Ok(mask),
            (w, h) => {
                let w = w.unwrap_or(mask.width());
                let h = h.unwrap_or(mask.height());
                if w <= 0 || h <= 0 {
                    return Err(ServiceError::validation(format!(
                        "grid dimensions must be positive, got {w}x{h}"
                    )));
                }
                Ok(mask.crop(Range::new(0, 0, w, h)))
            }
        }
    }

    /// Bound the grid the tiles describe before anything is allocated for it.
    fn check_extent(&self, tiles: &[Tile]) -> Result<(), ServiceError> {
        let extent = tile_extent(tiles).map_err(|err| match err {
            ReassemblyError::ExtentTooLarge { .. } => ServiceError::validation(err.to_string()),
            other => other.into(),
        })?;
        let cells = i64::from(extent.width()) * i64::from(extent.height());
        if cells.unsigned_abs() > self.config.max_grid_cells {
            return Err(ServiceError::validation(format!(
                "tiles span a {}x{} grid, over the limit of {} cells",
                extent.width(),
                extent.height(),
                self.config.max_grid_cells
            )));
        }
        Ok(())
    }
}

fn check_tile(index: usize, tile: &Tile) -> Result<(), ServiceError> {
    let data = &tile.data;
    if data.width() == 0 || data.height() == 0 {
        return Err(ServiceError::validation(format!("tile {index} has no cells")));
    }
    if data.width() != data.height() {
        return Err(ServiceError::validation(format!(
            "tile {index} is {}x{}, expected a square",
            data.width(),
            data.height()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridnav_core::{Cell, Point, partition};
    use gridnav_paths::{DiagonalMovement, Termination};

    fn request(
        mask: &Mask,
        tile_size: i32,
        start: (i32, i32),
        end: (i32, i32),
        heuristic: &str,
    ) -> FindPathRequest {
        FindPathRequest {
            tiles: partition(mask, tile_size),
            start_x: start.0,
            start_y: start.1,
            end_x: end.0,
            end_y: end.1,
            heuristic_name: heuristic.to_string(),
            width: None,
            height: None,
            diagonal: None,
        }
    }

    fn blocking(
        svc: &GridService,
        req: &FindPathRequest,
    ) -> Result<FindPathResponse, ServiceError> {
        svc.find_path_blocking(req, &CancelToken::new())
    }

    #[test]
    fn empty_tile_list_is_rejected() {
        let mut req = request(&Mask::new(2, 2), 2, (0, 0), (1, 1), "octile");
        req.tiles.clear();
        let err = blocking(&GridService::default(), &req).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)), "{err}");
    }

    #[test]
    fn too_many_tiles_is_rejected() {
        let svc = GridService::new(ServiceConfig {
            max_tiles: 3,
            ..ServiceConfig::default()
        });
        let req = request(&Mask::new(4, 4), 2, (0, 0), (3, 3), "octile");
        assert_eq!(req.tiles.len(), 4);
        assert!(matches!(blocking(&svc, &req), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn non_square_tile_is_rejected() {
        let mut req = request(&Mask::new(2, 2), 2, (0, 0), (1, 1), "octile");
        req.tiles[0].data = Mask::new(2, 1);
        assert!(matches!(
            blocking(&GridService::default(), &req),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn mixed_tile_sizes_fail_reassembly() {
        let mut req = request(&Mask::new(4, 4), 2, (0, 0), (1, 1), "octile");
        req.tiles[1].data = Mask::new(3, 3);
        let err = blocking(&GridService::default(), &req).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Reassembly);
    }

    fn far_tile(x: i32, y: i32) -> FindPathRequest {
        let mut req = request(&Mask::new(1, 1), 1, (0, 0), (0, 0), "octile");
        req.tiles[0].origin = Point::new(x, y);
        req
    }

    #[test]
    fn far_away_tile_is_rejected_before_allocating() {
        let req = far_tile(20_000, 20_000);
        let err = blocking(&GridService::default(), &req).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Validation);
        assert!(err.to_string().contains("20001x20001"), "{err}");
    }

    #[test]
    fn tile_at_coordinate_limit_is_rejected() {
        for (x, y) in [(i32::MAX, 0), (0, i32::MAX), (i32::MAX - 1, 5)] {
            let err = blocking(&GridService::default(), &far_tile(x, y)).unwrap_err();
            assert_eq!(err.kind(), crate::ErrorKind::Validation, "{err}");
        }
    }

    #[test]
    fn grid_limit_is_configurable() {
        let svc = GridService::new(ServiceConfig {
            max_grid_cells: 15,
            ..ServiceConfig::default()
        });
        let req = request(&Mask::new(4, 4), 2, (0, 0), (3, 3), "octile");
        assert!(matches!(blocking(&svc, &req), Err(ServiceError::Validation(_))));

        let svc = GridService::new(ServiceConfig {
            max_grid_cells: 16,
            ..ServiceConfig::default()
        });
        assert_eq!(blocking(&svc, &req).unwrap().path.len(), 4);
    }

    #[test]
    fn out_of_bounds_endpoint_is_validation() {
        let req = request(&Mask::new(4, 4), 4, (0, 0), (4, 0), "octile");
        let err = blocking(&GridService::default(), &req).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Validation);
    }

    #[test]
    fn crop_to_true_dimensions() {
        // 3x3 grid padded to one 4x4 tile; (3, 3) exists only as padding.
        let mask = Mask::new(3, 3);
        let mut req = request(&mask, 4, (0, 0), (3, 3), "chebyshev");
        assert_eq!(blocking(&GridService::default(), &req).unwrap().path.len(), 4);

        req.width = Some(3);
        req.height = Some(3);
        let err = blocking(&GridService::default(), &req).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Validation);

        req.width = Some(0);
        assert!(matches!(
            blocking(&GridService::default(), &req),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn diagonal_override() {
        let req = FindPathRequest {
            diagonal: Some(DiagonalMovement::Never),
            ..request(&Mask::new(3, 3), 3, (0, 0), (2, 2), "manhattan")
        };
        let resp = blocking(&GridService::default(), &req).unwrap();
        assert_eq!(resp.path.len(), 5);
        assert_eq!(resp.path.first(), Some(&[0, 0]));
        assert_eq!(resp.path.last(), Some(&[2, 2]));
    }

    #[test]
    fn configured_termination_is_used() {
        let svc = GridService::new(ServiceConfig {
            termination: Termination::FirstMeeting,
            ..ServiceConfig::default()
        });
        let req = request(&Mask::new(6, 6), 6, (0, 0), (5, 5), "octile");
        let resp = blocking(&svc, &req).unwrap();
        assert_eq!(resp.points().next(), Some(Point::new(0, 0)));
        assert_eq!(resp.points().last(), Some(Point::new(5, 5)));
    }

    #[test]
    fn cancelled_token_stops_search() {
        let req = request(&Mask::new(8, 8), 8, (0, 0), (7, 7), "octile");
        let token = CancelToken::new();
        token.cancel();
        let err = GridService::default().find_path_blocking(&req, &token).unwrap_err();
        assert!(matches!(err, ServiceError::Cancelled));
    }

    #[test]
    fn classify_rejects_empty_and_oversized_input() {
        let svc = GridService::default();
        let token = CancelToken::new();
        assert!(matches!(
            svc.classify_bytes_blocking(&[], &token),
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            svc.classify_bytes_blocking(b"not an image", &token),
            Err(ServiceError::Processing(_))
        ));

        let small = GridService::new(ServiceConfig {
            max_image_pixels: 10,
            ..ServiceConfig::default()
        });
        let img = RgbaImage::new(4, 4);
        assert!(matches!(
            small.classify_image_blocking(&img, &token),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn classify_image_reports_true_dimensions() {
        let img = RgbaImage::from_pixel(5, 3, image::Rgba([255, 255, 255, 255]));
        let resp = GridService::default()
            .classify_image_blocking(&img, &CancelToken::new())
            .unwrap();
        assert_eq!((resp.width, resp.height, resp.tile_size), (5, 3, 128));
        assert_eq!(resp.tiles.len(), 1);
        assert_eq!(resp.tiles[0].data.count(Cell::Obstacle), 0);
    }

    #[test]
    fn cancelled_token_stops_classify() {
        let img = RgbaImage::from_pixel(16, 16, image::Rgba([255, 255, 255, 255]));
        let token = CancelToken::new();
        token.cancel();
        let err = GridService::default()
            .classify_image_blocking(&img, &token)
            .unwrap_err();
        assert!(matches!(err, ServiceError::Cancelled), "{err}");
    }

    #[tokio::test]
    async fn async_classify_with_cancelled_token() {
        let img = RgbaImage::from_pixel(16, 16, image::Rgba([255, 255, 255, 255]));
        let mut bytes = std::io::Cursor::new(Vec::new());
        img.write_to(&mut bytes, image::ImageFormat::Png).unwrap();
        let token = CancelToken::new();
        token.cancel();
        let err = GridService::default()
            .classify_bytes_with_token(bytes.into_inner(), token)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Cancelled);
    }

    #[tokio::test]
    async fn async_find_path_matches_blocking() {
        let mut mask = Mask::new(10, 10);
        for y in 0..9 {
            mask.set(Point::new(5, y), Cell::Obstacle);
        }
        let svc = GridService::default();
        let req = request(&mask, 4, (0, 0), (9, 0), "octile");
        let sync = blocking(&svc, &req).unwrap();
        let asynch = svc.find_path(req).await.unwrap();
        assert_eq!(sync, asynch);
        assert!(asynch.points().any(|p| p == Point::new(5, 9)));
    }

    #[tokio::test]
    async fn async_find_path_with_cancelled_token() {
        let req = request(&Mask::new(8, 8), 8, (0, 0), (7, 7), "octile");
        let token = CancelToken::new();
        token.cancel();
        let err = GridService::default()
            .find_path_with_token(req, token)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Cancelled);
    }
}
