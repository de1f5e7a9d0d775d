mod component;
mod render;
mod state;
mod surface;
mod types;

pub use component::NetworkCanvas;
pub use surface::{CanvasRenderer, CanvasSurface};
