//! Canvas2D rendering module
//!
//! `shapes` is pure geometry and builds everywhere; the painter itself needs
//! a browser canvas.

pub mod shapes;

#[cfg(target_arch = "wasm32")]
mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::{CanvasRenderer, FrameInfo};
