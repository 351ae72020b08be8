//! In-memory backend that records every call, for canvas tests.

use std::path::Path;
use std::time::{Duration, Instant};

use glam::{Mat4, Vec2, Vec3};

use crate::audio::{SoundId, Voice};
use crate::backend::{AudioBackend, RenderBackend, WindowBackend};
use crate::error::Result;
use crate::input::{Key, MouseButton};
use crate::paint::{BlendMode, Color};
use crate::render::TextureId;

/// Width of one character under the recording "font".
pub(crate) const CHAR_WIDTH: f32 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    ClearColor(Color),
    Blend(BlendMode),
    TriangleFill(Mat4, Color),
    TriangleOutline(Mat4, Color),
    RectangleFill(Mat4, Color),
    RectangleOutline(Mat4, Color),
    CircleFill(Mat4, Color, f32, u32),
    CircleOutline(Mat4, Color, f32, u32),
    Sprite(TextureId, Vec2, Vec2),
    EnqueuePoint(Mat4, Color),
    EnqueueLine(Color, Vec2, Vec2),
    EnqueueText(Mat4, Color, String),
    FlushPoints,
    FlushLines,
    FlushText(Mat4, Color),
    Present,
}

/// What actually reached the screen, in order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Drawn {
    Triangle,
    Rectangle,
    Circle,
    Sprite,
    Point(Vec2),
    Line(Vec2, Vec2),
    Text(String, Vec2),
}

#[derive(Debug, Default, Clone, Copy)]
struct VoiceSlot {
    busy: bool,
    paused: bool,
    looping: bool,
}

#[derive(Debug)]
pub(crate) struct RecordingBackend {
    pub calls: Vec<Call>,
    pub drawn: Vec<Drawn>,
    points: Vec<Vec2>,
    lines: Vec<(Vec2, Vec2)>,
    text: Vec<(String, Vec2)>,
    start: Instant,
    elapsed: Duration,
    sounds: u32,
    voices: [VoiceSlot; 4],
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            drawn: Vec::new(),
            points: Vec::new(),
            lines: Vec::new(),
            text: Vec::new(),
            start: Instant::now(),
            elapsed: Duration::ZERO,
            sounds: 0,
            voices: [VoiceSlot::default(); 4],
        }
    }
}

impl RecordingBackend {
    pub fn advance(&mut self, by: Duration) {
        self.elapsed += by;
    }

    pub fn pending_is_empty(&self) -> bool {
        self.points.is_empty() && self.lines.is_empty() && self.text.is_empty()
    }

    fn origin(m: &Mat4) -> Vec2 {
        m.transform_point3(Vec3::ZERO).truncate()
    }

    fn start_voice(&mut self, looping: bool) -> Option<Voice> {
        let index = self.voices.iter().position(|v| !v.busy)?;
        self.voices[index] = VoiceSlot { busy: true, paused: false, looping };
        Some(Voice(index))
    }
}

impl RenderBackend for RecordingBackend {
    fn set_clear_color(&mut self, color: Color) {
        self.calls.push(Call::ClearColor(color));
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.calls.push(Call::Blend(mode));
    }

    fn triangle_fill(&mut self, modelview: &Mat4, color: Color) {
        self.calls.push(Call::TriangleFill(*modelview, color));
        self.drawn.push(Drawn::Triangle);
    }

    fn triangle_outline(&mut self, modelview: &Mat4, color: Color) {
        self.calls.push(Call::TriangleOutline(*modelview, color));
        self.drawn.push(Drawn::Triangle);
    }

    fn rectangle_fill(&mut self, modelview: &Mat4, color: Color) {
        self.calls.push(Call::RectangleFill(*modelview, color));
        self.drawn.push(Drawn::Rectangle);
    }

    fn rectangle_outline(&mut self, modelview: &Mat4, color: Color) {
        self.calls.push(Call::RectangleOutline(*modelview, color));
        self.drawn.push(Drawn::Rectangle);
    }

    fn circle_fill(&mut self, modelview: &Mat4, color: Color, radius: f32, segments: u32) {
        self.calls.push(Call::CircleFill(*modelview, color, radius, segments));
        self.drawn.push(Drawn::Circle);
    }

    fn circle_outline(&mut self, modelview: &Mat4, color: Color, radius: f32, segments: u32) {
        self.calls.push(Call::CircleOutline(*modelview, color, radius, segments));
        self.drawn.push(Drawn::Circle);
    }

    fn sprite(&mut self, _modelview: &Mat4, _color: Color, texture: TextureId, tiling: Vec2, scroll: Vec2) {
        self.calls.push(Call::Sprite(texture, tiling, scroll));
        self.drawn.push(Drawn::Sprite);
    }

    fn enqueue_point(&mut self, modelview: &Mat4, color: Color) {
        self.calls.push(Call::EnqueuePoint(*modelview, color));
        self.points.push(Self::origin(modelview));
    }

    fn enqueue_line(&mut self, color: Color, from: Vec2, to: Vec2) {
        self.calls.push(Call::EnqueueLine(color, from, to));
        self.lines.push((from, to));
    }

    fn enqueue_text(&mut self, modelview: &Mat4, color: Color, text: &str) {
        self.calls.push(Call::EnqueueText(*modelview, color, text.to_string()));
        self.text.push((text.to_string(), Self::origin(modelview)));
    }

    fn flush_points(&mut self) {
        self.calls.push(Call::FlushPoints);
        self.drawn.extend(self.points.drain(..).map(Drawn::Point));
    }

    fn flush_lines(&mut self) {
        self.calls.push(Call::FlushLines);
        self.drawn.extend(self.lines.drain(..).map(|(a, b)| Drawn::Line(a, b)));
    }

    fn flush_text(&mut self, transform: &Mat4, color: Color) {
        self.calls.push(Call::FlushText(*transform, color));
        self.drawn.extend(self.text.drain(..).map(|(s, at)| Drawn::Text(s, at)));
    }

    fn load_texture(&mut self, _path: &Path) -> Result<TextureId> {
        Ok(TextureId(0))
    }

    fn set_font(&mut self, _path: &Path, _size: f32) -> Result<()> {
        Ok(())
    }

    fn set_font_size(&mut self, _size: f32) {}

    fn text_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * CHAR_WIDTH
    }

    fn text_height(&self, text: &str) -> f32 {
        if text.is_empty() { 0.0 } else { CHAR_WIDTH }
    }
}

impl WindowBackend for RecordingBackend {
    fn should_close(&self) -> bool {
        false
    }

    fn present(&mut self) -> Result<()> {
        self.calls.push(Call::Present);
        Ok(())
    }

    fn now(&self) -> Instant {
        self.start + self.elapsed
    }

    fn key_down(&self, _key: Key) -> bool {
        false
    }

    fn mouse_button_down(&self, _button: MouseButton) -> bool {
        false
    }

    fn mouse_position(&self) -> Vec2 {
        Vec2::ZERO
    }
}

impl AudioBackend for RecordingBackend {
    fn load_wav(&mut self, _path: &Path) -> Result<SoundId> {
        self.sounds += 1;
        Ok(SoundId(self.sounds - 1))
    }

    fn play(&mut self, _sound: SoundId) -> Option<Voice> {
        self.start_voice(false)
    }

    fn play_looping(&mut self, _sound: SoundId) -> Option<Voice> {
        self.start_voice(true)
    }

    fn pause(&mut self, voice: Voice) {
        if let Some(v) = self.voices.get_mut(voice.0) {
            v.paused = true;
        }
    }

    fn stop(&mut self, voice: Voice) {
        if let Some(v) = self.voices.get_mut(voice.0) {
            *v = VoiceSlot::default();
        }
    }

    fn is_playing(&self, voice: Voice) -> bool {
        self.voices.get(voice.0).is_some_and(|v| v.busy && !v.paused)
    }

    fn is_looping(&self, voice: Voice) -> bool {
        self.voices.get(voice.0).is_some_and(|v| v.busy && v.looping)
    }

    fn pause_all(&mut self) {
        self.voices.iter_mut().for_each(|v| v.paused = v.busy);
    }

    fn resume_all(&mut self) {
        self.voices.iter_mut().for_each(|v| v.paused = false);
    }

    fn stop_all(&mut self) {
        self.voices = [VoiceSlot::default(); 4];
    }
}
