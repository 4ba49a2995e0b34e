//! Request and response payloads.
//!
//! Tiles travel as `{ "x": int, "y": int, "data": [[0|1, ...], ...] }` and
//! paths as arrays of `[x, y]` pairs.

use gridnav_core::{Point, Tile};
use gridnav_paths::DiagonalMovement;
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

/// Result of classifying a map image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyResponse {
    #[serde(alias = "clusters")]
    pub tiles: Vec<Tile>,
    /// True mask width, before padding to whole tiles.
    pub width: i32,
    pub height: i32,
    pub tile_size: i32,
}

/// A path query over a tile set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindPathRequest {
    #[serde(alias = "clusters")]
    pub tiles: Vec<Tile>,
    pub start_x: i32,
    pub start_y: i32,
    pub end_x: i32,
    pub end_y: i32,
    /// Unknown or missing names fall back to manhattan.
    #[serde(default, alias = "heuristicType")]
    pub heuristic_name: String,
    /// Crop the reassembled grid to these dimensions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<i32>,
    /// Override the configured diagonal policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagonal: Option<DiagonalMovement>,
}

impl FindPathRequest {
    /// Parse a JSON request. Any shape error is a validation failure.
    pub fn from_json(s: &str) -> Result<Self, ServiceError> {
        serde_json::from_str(s)
            .map_err(|e| ServiceError::validation(format!("malformed request: {e}")))
    }

    pub fn start(&self) -> Point {
        Point::new(self.start_x, self.start_y)
    }

    pub fn end(&self) -> Point {
        Point::new(self.end_x, self.end_y)
    }
}

/// Ordered `[x, y]` cells from start to end, empty when unreachable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindPathResponse {
    pub path: Vec<[i32; 2]>,
}

impl FindPathResponse {
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.path.iter().map(|&[x, y]| Point::new(x, y))
    }
}

impl FromIterator<Point> for FindPathResponse {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self {
            path: iter.into_iter().map(|p| [p.x, p.y]).collect(),
        }
    }
}
