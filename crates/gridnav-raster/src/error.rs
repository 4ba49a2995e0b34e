use std::io;

/// Failures while turning a map image into tiles.
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("failed to read image: {0}")]
    Io(#[from] io::Error),
    #[error("image has no pixels")]
    EmptyImage,
    #[error("image of {width}x{height} pixels is too large")]
    TooLarge { width: u32, height: u32 },
    #[error("invalid pipeline configuration: {0}")]
    InvalidConfig(String),
    #[error("processing cancelled")]
    Cancelled,
}
