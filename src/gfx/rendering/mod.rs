//! # Rendering
//!
//! The viewer does not draw by itself. Each frame it hands the scene and the
//! camera to a [`RenderBackend`], which is also where window-system events
//! come from. [`HeadlessRenderer`] is a backend without a window: it replays
//! scripted input and prepares draw data exactly as a GPU backend would,
//! without submitting it anywhere.

pub mod headless;

pub use headless::HeadlessRenderer;

use crate::error::Result;
use crate::gfx::camera::Camera;
use crate::gfx::events::EventQueue;
use crate::gfx::scene::NodeRef;

/// What a backend did for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// One per primitive set drawn
    pub draw_calls: u32,
    pub vertex_count: u32,
    /// Bytes of vertex and uniform data prepared for upload
    pub uploaded_bytes: usize,
}

/// The seam between the viewer loop and whatever puts pixels on screen
pub trait RenderBackend {
    /// Move pending window-system input into `queue`
    fn poll_events(&mut self, queue: &mut EventQueue);

    /// Draw one frame of `scene` as seen by `camera`
    fn render(&mut self, scene: Option<&NodeRef>, camera: &Camera) -> Result<RenderStats>;
}
