//! GPU rendering subsystem.
//!
//! Conventions:
//! - CPU geometry is in logical pixels (bottom-left origin, +Y up).
//! - The vertex shader converts to NDC using a viewport uniform.
//! - One shader serves every draw; untextured geometry samples a white texel.

mod ctx;
pub mod geometry;
mod pipeline;
mod recorder;
mod renderer;
mod texture;
mod vertex;

pub use ctx::{RenderCtx, RenderTarget, Viewport};
pub use recorder::{FrameRecorder, Segment, Topology};
pub use renderer::GpuRenderer;
pub use texture::{TextureId, TextureSlot, TextureStore};
pub use vertex::Vertex;
