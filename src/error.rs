//! Crate-wide error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error("invalid output dimensions: width={width} height={height}")]
    DimensionError { width: u32, height: u32 },

    #[error("failed to read asset: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse glTF JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to decode base64 buffer: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, RenderError>;
