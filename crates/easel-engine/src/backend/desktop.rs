use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use glam::{Mat4, Vec2};

use crate::audio::{Audio, SoundId, Voice};
use crate::device::FrameOutcome;
use crate::error::{CanvasError, Result};
use crate::input::{Key, MouseButton};
use crate::paint::{BlendMode, Color};
use crate::render::{GpuRenderer, TextureId};
use crate::window::WindowRuntime;

use super::{AudioBackend, CanvasConfig, RenderBackend, WindowBackend};

/// At most one desktop window per process.
static WINDOW_OPEN: AtomicBool = AtomicBool::new(false);

/// The process-wide window slot; released on drop.
#[derive(Debug)]
struct WindowClaim(());

impl WindowClaim {
    fn acquire() -> Result<Self> {
        if WINDOW_OPEN.swap(true, Ordering::AcqRel) {
            return Err(CanvasError::WindowAlreadyOpen);
        }
        Ok(Self(()))
    }
}

impl Drop for WindowClaim {
    fn drop(&mut self) {
        WINDOW_OPEN.store(false, Ordering::Release);
    }
}

/// The winit + wgpu + cpal host.
///
/// One can be open at a time. Once it is dropped, another may be opened on
/// the same thread; the event loop is carried over.
pub struct DesktopBackend {
    runtime: WindowRuntime,
    renderer: GpuRenderer,
    audio: Audio,
    last_pump: Instant,
    // Last: released only after the window and its loop are put away.
    _claim: WindowClaim,
}

impl DesktopBackend {
    pub fn open(config: CanvasConfig) -> Result<Self> {
        let claim = WindowClaim::acquire()?;

        let CanvasConfig { window, gpu, audio } = config;
        let runtime = WindowRuntime::open(window, gpu)?;

        let audio = Audio::new(&audio);
        if audio.is_silent() {
            log::info!("running without sound output");
        }

        Ok(Self {
            runtime,
            renderer: GpuRenderer::new(),
            audio,
            last_pump: Instant::now(),
            _claim: claim,
        })
    }

    pub fn renderer(&self) -> &GpuRenderer {
        &self.renderer
    }

    pub fn audio(&self) -> &Audio {
        &self.audio
    }
}

impl Drop for DesktopBackend {
    fn drop(&mut self) {
        self.audio.mixer_mut().stop_all();
    }
}

impl RenderBackend for DesktopBackend {
    fn set_clear_color(&mut self, color: Color) {
        self.renderer.set_clear_color(color);
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.renderer.set_blend_mode(mode);
    }

    fn triangle_fill(&mut self, modelview: &Mat4, color: Color) {
        self.renderer.triangle_fill(modelview, color);
    }

    fn triangle_outline(&mut self, modelview: &Mat4, color: Color) {
        self.renderer.triangle_outline(modelview, color);
    }

    fn rectangle_fill(&mut self, modelview: &Mat4, color: Color) {
        self.renderer.rectangle_fill(modelview, color);
    }

    fn rectangle_outline(&mut self, modelview: &Mat4, color: Color) {
        self.renderer.rectangle_outline(modelview, color);
    }

    fn circle_fill(&mut self, modelview: &Mat4, color: Color, radius: f32, segments: u32) {
        self.renderer.circle_fill(modelview, color, radius, segments);
    }

    fn circle_outline(&mut self, modelview: &Mat4, color: Color, radius: f32, segments: u32) {
        self.renderer.circle_outline(modelview, color, radius, segments);
    }

    fn sprite(&mut self, modelview: &Mat4, color: Color, texture: TextureId, tiling: Vec2, scroll: Vec2) {
        self.renderer.sprite(modelview, color, texture, tiling, scroll);
    }

    fn enqueue_point(&mut self, modelview: &Mat4, color: Color) {
        self.renderer.enqueue_point(modelview, color);
    }

    fn enqueue_line(&mut self, color: Color, from: Vec2, to: Vec2) {
        self.renderer.enqueue_line(color, from, to);
    }

    fn enqueue_text(&mut self, modelview: &Mat4, color: Color, text: &str) {
        self.renderer.enqueue_text(modelview, color, text);
    }

    fn flush_points(&mut self) {
        self.renderer.flush_points();
    }

    fn flush_lines(&mut self) {
        self.renderer.flush_lines();
    }

    // Queued glyphs already carry the modelview and color they were queued with.
    fn flush_text(&mut self, _transform: &Mat4, _color: Color) {
        self.renderer.flush_text();
    }

    fn load_texture(&mut self, path: &Path) -> Result<TextureId> {
        self.renderer.load_texture(path)
    }

    fn set_font(&mut self, path: &Path, size: f32) -> Result<()> {
        self.renderer.set_font(path, size)
    }

    fn set_font_size(&mut self, size: f32) {
        self.renderer.set_font_size(size);
    }

    fn text_width(&self, text: &str) -> f32 {
        self.renderer.text_width(text)
    }

    fn text_height(&self, text: &str) -> f32 {
        self.renderer.text_height(text)
    }
}

impl WindowBackend for DesktopBackend {
    fn should_close(&self) -> bool {
        self.runtime.close_requested()
    }

    fn present(&mut self) -> Result<()> {
        let renderer = &mut self.renderer;
        let outcome = self
            .runtime
            .draw_frame(|ctx, target| renderer.render(ctx, target))?;

        if outcome == FrameOutcome::Skipped {
            // Nothing reached the screen; drop the frame so the next one starts clean.
            renderer.discard_frame();
        }

        self.runtime.pump_events();

        let now = Instant::now();
        self.audio.pump(now.duration_since(self.last_pump));
        self.last_pump = now;
        Ok(())
    }

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn key_down(&self, key: Key) -> bool {
        self.runtime.input().key_down(key)
    }

    fn mouse_button_down(&self, button: MouseButton) -> bool {
        self.runtime.input().button_down(button)
    }

    fn mouse_position(&self) -> Vec2 {
        self.runtime.input().pointer
    }
}

impl AudioBackend for DesktopBackend {
    fn load_wav(&mut self, path: &Path) -> Result<SoundId> {
        self.audio.load_wav(path)
    }

    fn play(&mut self, sound: SoundId) -> Option<Voice> {
        self.audio.mixer_mut().play(sound, false)
    }

    fn play_looping(&mut self, sound: SoundId) -> Option<Voice> {
        self.audio.mixer_mut().play(sound, true)
    }

    fn pause(&mut self, voice: Voice) {
        self.audio.mixer_mut().pause(voice);
    }

    fn stop(&mut self, voice: Voice) {
        self.audio.mixer_mut().stop(voice);
    }

    fn is_playing(&self, voice: Voice) -> bool {
        self.audio.mixer().is_playing(voice)
    }

    fn is_looping(&self, voice: Voice) -> bool {
        self.audio.mixer().is_looping(voice)
    }

    fn pause_all(&mut self) {
        self.audio.mixer_mut().pause_all();
    }

    fn resume_all(&mut self) {
        self.audio.mixer_mut().resume_all();
    }

    fn stop_all(&mut self) {
        self.audio.mixer_mut().stop_all();
    }
}
