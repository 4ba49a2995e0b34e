use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use gridnav_core::{Point, Tile};
use gridnav_paths::DiagonalMovement;
use gridnav_service::{ClassifyResponse, FindPathRequest, GridService, ServiceConfig};
use serde::Deserialize;

/// Build the service, reading the configuration file if one is given.
pub fn service(config: Option<&Path>) -> Result<GridService> {
    let Some(path) = config else {
        return Ok(GridService::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = ServiceConfig::from_json(&text)
        .with_context(|| format!("invalid config {}", path.display()))?;
    log::debug!("loaded config from {}", path.display());
    Ok(GridService::new(config))
}

pub async fn classify(service: &GridService, image: &Path, output: Option<&Path>) -> Result<()> {
    let bytes = fs::read(image).with_context(|| format!("failed to read {}", image.display()))?;
    let resp = service
        .classify_bytes(bytes)
        .await
        .with_context(|| format!("failed to classify {}", image.display()))?;
    let json = serde_json::to_string(&resp)?;
    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
            log::info!("wrote {} tiles to {}", resp.tiles.len(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Tile file contents: either a full `classify` result or a bare tile list.
#[derive(Deserialize)]
#[serde(untagged)]
enum TileFile {
    Classified(ClassifyResponse),
    Bare(Vec<Tile>),
}

impl TileFile {
    fn into_parts(self) -> (Vec<Tile>, Option<i32>, Option<i32>) {
        match self {
            Self::Classified(c) => (c.tiles, Some(c.width), Some(c.height)),
            Self::Bare(tiles) => (tiles, None, None),
        }
    }
}

pub async fn find_path(
    service: &GridService,
    tiles: &Path,
    start: Point,
    end: Point,
    heuristic: String,
    diagonal: Option<DiagonalMovement>,
) -> Result<()> {
    let text = fs::read_to_string(tiles)
        .with_context(|| format!("failed to read {}", tiles.display()))?;
    let file: TileFile = serde_json::from_str(&text)
        .with_context(|| format!("invalid tiles in {}", tiles.display()))?;
    let (tiles, width, height) = file.into_parts();

    let req = FindPathRequest {
        tiles,
        start_x: start.x,
        start_y: start.y,
        end_x: end.x,
        end_y: end.y,
        heuristic_name: heuristic,
        width,
        height,
        diagonal,
    };
    let resp = service.find_path(req).await?;
    if resp.path.is_empty() {
        log::info!("no path from {start} to {end}");
    }
    println!("{}", serde_json::to_string(&resp)?);
    Ok(())
}
