//! Window + event pumping.
//!
//! Owns the `winit` EventLoop and Window and wires them to the GPU layer. The
//! caller drives the loop: each present pumps pending events once.

mod runtime;

pub use runtime::WindowRuntime;
