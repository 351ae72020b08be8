//! GPU device + surface management.
//!
//! Creates the wgpu instance/adapter/device/queue for a window, keeps the
//! surface configured and runs one render callback per presented frame.

mod context;
mod error;
mod frame;
mod init;
mod surface;

pub use context::Gpu;
pub use error::{FrameOutcome, SurfaceErrorAction};
pub use frame::GpuFrame;
pub use init::GpuInit;
