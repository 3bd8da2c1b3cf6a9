//! Pure-CPU software rasterizer for glTF 2.0 models: geometry transform,
//! z-buffered edge-function triangle rasterization with perspective-correct
//! attribute interpolation, Lambert + ambient shading, base-color texturing,
//! and a line rasterizer for grid overlays.

pub mod bitmap;
pub mod camera;
pub mod cli;
pub mod drawcall;
pub mod error;
pub mod geometry;
pub mod gltf;
pub mod material;
pub mod math;
pub mod raster;
pub mod render;
pub mod texture;

pub use camera::Camera;
pub use drawcall::{DrawCall, DrawMode};
pub use error::{RenderError, Result};
pub use material::{AlphaMode, Material};
pub use render::{render, RenderOptions};
