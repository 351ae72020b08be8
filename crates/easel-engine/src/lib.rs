//! Easel engine crate.
//!
//! Immediate-mode 2D drawing, text, input and sound for a single window.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`canvas`] | `Canvas`, transform stack, color/alignment registers |
//! | [`backend`] | host contracts and the winit + wgpu + cpal `DesktopBackend` |
//! | [`render`] | frame recorder, shaders, textures |
//! | [`text`] | font loading, measurement, glyph atlas |
//! | [`audio`] | WAV decoding, voice mixer, device output |
//! | [`time`] | clamped frame clock |
//!
//! # Quick start
//!
//! ```no_run
//! use easel_engine::{Canvas, CanvasConfig, Key};
//!
//! let mut canvas = Canvas::open(CanvasConfig::new("hello", 640, 480))?;
//! while !canvas.should_close() && !canvas.key_down(Key::Escape) {
//!     canvas.set_fore_color(1.0, 0.5, 0.0, 1.0);
//!     canvas.rectangle_fill(320.0, 240.0, 100.0, 50.0);
//!     canvas.render()?;
//! }
//! # Ok::<(), easel_engine::CanvasError>(())
//! ```

pub mod audio;
pub mod backend;
pub mod canvas;
pub mod device;
pub mod error;
pub mod input;
pub mod logging;
pub mod paint;
pub mod render;
pub mod text;
pub mod time;
pub mod window;

pub use audio::{SoundId, Voice};
pub use backend::{AudioConfig, Backend, CanvasConfig, DesktopBackend, WindowConfig};
pub use canvas::{Canvas, TextAlign};
pub use error::{CanvasError, Result};
pub use input::{Key, MouseButton};
pub use logging::{LoggingConfig, init_logging};
pub use paint::{BlendMode, Color};
pub use render::TextureId;
