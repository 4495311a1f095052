//! Contains everything related to drawing point clouds.
//!
//! The renderer is split into two parts: The [viewer::Viewer] holds the scene, camera and gpu
//! buffers independent of any windowing system, while a render backend owns the windows and
//! does the actual drawing.
mod vertex_data;

pub mod backends;
pub mod error;
pub mod geometry;
pub mod gpu;
pub mod settings;
pub mod viewer;
pub mod viewer_command;

pub use vertex_data::{OverlayPrimitive, OverlayVertex};
