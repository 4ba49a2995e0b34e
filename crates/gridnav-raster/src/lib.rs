//! Map image preprocessing for gridnav.
//!
//! Turns a decoded map image into a binary obstacle [`Mask`](gridnav_core::Mask)
//! by reference-color matching, grows obstacles by a safety margin, removes
//! noise with a majority filter and cuts the result into transmission tiles.

pub mod classify;
pub mod decode;
pub mod error;
pub mod morph;
pub mod pipeline;

pub use classify::{ColorRuleSet, DEFAULT_THRESHOLD, REFERENCE_COLORS};
pub use decode::{decode_image, image_dimensions, open_image};
pub use error::ProcessingError;
pub use morph::{DEFAULT_BUFFER_RADIUS, SmoothingRule, dilate, smooth};
pub use pipeline::{Pipeline, PipelineOutput};
