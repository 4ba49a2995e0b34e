//! Request-level operations for gridnav.
//!
//! [`GridService`] turns an uploaded map image into walkability tiles
//! ([`ClassifyResponse`]) and answers path queries over a tile set
//! ([`FindPathRequest`] → [`FindPathResponse`]). It owns no mutable state, so
//! one instance can serve concurrent requests; the async entry points run
//! the grid work on tokio's blocking pool.

mod api;
mod config;
mod error;
mod service;

pub use api::{ClassifyResponse, FindPathRequest, FindPathResponse};
pub use config::{
    DEFAULT_MAX_GRID_CELLS, DEFAULT_MAX_IMAGE_PIXELS, DEFAULT_MAX_TILES, ServiceConfig,
};
pub use error::{ErrorKind, ServiceError};
pub use service::GridService;
