//! Collaborator contracts consumed by [`Canvas`](crate::canvas::Canvas).
//!
//! The canvas owns the transform stack, the color/alignment registers, the
//! frame clock and the flush ordering. Everything that touches a window, a
//! GPU, a font or a sound device sits behind these traits.
//!
//! Batching contract:
//! - triangles, rectangles, circles and sprites are drawn immediately, in call
//!   order, with the modelview and color passed to the call;
//! - points, lines and text are queued and only drawn by the matching `flush_*`;
//!   the color of a queued primitive is the one passed when it was queued;
//! - blend mode changes affect primitives drawn (or flushed) afterwards.

mod config;
mod desktop;

use std::path::Path;
use std::time::Instant;

use glam::{Mat4, Vec2};

use crate::audio::{SoundId, Voice};
use crate::error::Result;
use crate::input::{Key, MouseButton};
use crate::paint::{BlendMode, Color};
use crate::render::TextureId;

pub use config::{AudioConfig, CanvasConfig, WindowConfig};
pub use desktop::DesktopBackend;

/// Drawing primitives, blend state, textures and fonts.
pub trait RenderBackend {
    fn set_clear_color(&mut self, color: Color);
    fn set_blend_mode(&mut self, mode: BlendMode);

    /// Unit triangle `(-0.5,-0.5) (0.5,-0.5) (0,0.5)` under `modelview`.
    fn triangle_fill(&mut self, modelview: &Mat4, color: Color);
    fn triangle_outline(&mut self, modelview: &Mat4, color: Color);

    /// Unit square centred on the origin under `modelview`.
    fn rectangle_fill(&mut self, modelview: &Mat4, color: Color);
    fn rectangle_outline(&mut self, modelview: &Mat4, color: Color);

    /// `segments`-sided polygon of `radius` around the modelview origin.
    fn circle_fill(&mut self, modelview: &Mat4, color: Color, radius: f32, segments: u32);
    fn circle_outline(&mut self, modelview: &Mat4, color: Color, radius: f32, segments: u32);

    /// Textured unit square; UVs become `uv * tiling + scroll`.
    fn sprite(&mut self, modelview: &Mat4, color: Color, texture: TextureId, tiling: Vec2, scroll: Vec2);

    /// Queues a point at the modelview origin.
    fn enqueue_point(&mut self, modelview: &Mat4, color: Color);
    /// Queues a segment between two points already in pixel space.
    fn enqueue_line(&mut self, color: Color, from: Vec2, to: Vec2);
    /// Queues a run of text whose baseline starts at the modelview origin.
    fn enqueue_text(&mut self, modelview: &Mat4, color: Color, text: &str);

    fn flush_points(&mut self);
    fn flush_lines(&mut self);
    /// Draws queued text. `transform` and `color` are the canvas registers at
    /// flush time.
    fn flush_text(&mut self, transform: &Mat4, color: Color);

    fn load_texture(&mut self, path: &Path) -> Result<TextureId>;

    fn set_font(&mut self, path: &Path, size: f32) -> Result<()>;
    fn set_font_size(&mut self, size: f32);
    fn text_width(&self, text: &str) -> f32;
    fn text_height(&self, text: &str) -> f32;
}

/// Window lifecycle, presentation, input and time.
pub trait WindowBackend {
    fn should_close(&self) -> bool;

    /// Shows everything drawn this frame, then polls window events.
    fn present(&mut self) -> Result<()>;

    /// Monotonic clock sample.
    fn now(&self) -> Instant;

    fn key_down(&self, key: Key) -> bool;
    fn mouse_button_down(&self, button: MouseButton) -> bool;

    /// Pointer position in drawing space (origin bottom-left, +Y up).
    fn mouse_position(&self) -> Vec2;
}

/// Sound loading and voice control.
pub trait AudioBackend {
    fn load_wav(&mut self, path: &Path) -> Result<SoundId>;

    /// Starts `sound` once on a free voice; `None` when every voice is busy.
    fn play(&mut self, sound: SoundId) -> Option<Voice>;
    /// Starts `sound` looping on a free voice; `None` when every voice is busy.
    fn play_looping(&mut self, sound: SoundId) -> Option<Voice>;

    fn pause(&mut self, voice: Voice);
    fn stop(&mut self, voice: Voice);
    fn is_playing(&self, voice: Voice) -> bool;
    fn is_looping(&self, voice: Voice) -> bool;

    fn pause_all(&mut self);
    fn resume_all(&mut self);
    fn stop_all(&mut self);
}

/// Everything a [`Canvas`](crate::canvas::Canvas) needs from its host.
pub trait Backend: RenderBackend + WindowBackend + AudioBackend {}

impl<T> Backend for T where T: RenderBackend + WindowBackend + AudioBackend {}
