//! Building blocks for the Terra demo: a textured rotating Earth inside a
//! rigid shell of orbiting stars.
//!
//! The sphere mesh generator, star field and per-frame transform pipeline
//! are plain data-in/data-out code with no GPU types, so they stay testable
//! without a window.  The wgpu renderer and the winit event loop live at the
//! edges and consume their output.

pub mod frame;
pub mod input;
pub mod mesh;
pub mod render;
pub mod starfield;
pub mod texture;

pub use frame::{Camera, FrameMatrices, FrameState};
pub use input::{InputState, KeyCode};
pub use mesh::{sphere, SphereMesh, Vertex};
pub use render::Renderer;
pub use starfield::Starfield;
pub use texture::{TextureError, TextureImage};
