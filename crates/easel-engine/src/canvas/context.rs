use std::path::Path;

use glam::{Mat4, Vec2, Vec3};

use crate::audio::{SoundId, Voice};
use crate::backend::{Backend, CanvasConfig, DesktopBackend};
use crate::error::Result;
use crate::input::{Key, MouseButton};
use crate::paint::{BlendMode, Color};
use crate::render::TextureId;
use crate::time::{FrameClock, FrameTime};

use super::state::{DrawState, TextAlign};
use super::transform_stack::TransformStack;

/// Immediate-mode 2D drawing context.
///
/// Coordinates are pixels with the origin at the bottom-left corner and +Y up.
/// Every draw call is placed by the current transform (see [`push`](Self::push),
/// [`translate`](Self::translate), ...) and colored by the foreground color.
///
/// Points, lines and text are batched by the backend. Before anything is drawn
/// through a different path, the batches queued earlier are flushed, so the
/// picture always stacks in call order.
pub struct Canvas<B: Backend> {
    backend: B,
    transforms: TransformStack,
    state: DrawState,
    clock: FrameClock,
}

impl Canvas<DesktopBackend> {
    /// Opens the window and initializes rendering and sound.
    ///
    /// Fails with [`CanvasError::WindowAlreadyOpen`](crate::error::CanvasError::WindowAlreadyOpen)
    /// while another canvas window exists. Once that one is closed, a new
    /// canvas may be opened from the same thread:
    ///
    /// ```no_run
    /// use easel_engine::{Canvas, CanvasConfig};
    ///
    /// let first = Canvas::open(CanvasConfig::new("first", 320, 240))?;
    /// first.close();
    /// let second = Canvas::open(CanvasConfig::new("second", 640, 480))?;
    /// second.close();
    /// # Ok::<(), easel_engine::CanvasError>(())
    /// ```
    pub fn open(config: CanvasConfig) -> Result<Self> {
        let backend = DesktopBackend::open(config).inspect_err(|e| log::error!("open: {e}"))?;
        Ok(Self::new(backend))
    }
}

impl<B: Backend> Canvas<B> {
    /// Wraps an already-initialized backend.
    ///
    /// The background is set to black and the foreground to white.
    pub fn new(mut backend: B) -> Self {
        backend.set_clear_color(Color::BLACK);
        let clock = FrameClock::starting_at(backend.now());
        Self {
            backend,
            transforms: TransformStack::new(),
            state: DrawState::default(),
            clock,
        }
    }

    /// Closes the window and releases every resource it owns.
    pub fn close(self) {
        log::info!("closing canvas after {} frames", self.clock.frame_index());
        drop(self);
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    // ── window & frame ────────────────────────────────────────────────────

    pub fn should_close(&self) -> bool {
        self.backend.should_close()
    }

    /// Finishes the frame: draws every pending batch, presents, polls input
    /// and advances the frame clock.
    pub fn render(&mut self) -> Result<()> {
        self.flush_all();
        self.backend.present()?;
        self.clock.tick_at(self.backend.now());
        Ok(())
    }

    /// Clamped duration of the previous frame, in seconds.
    pub fn delta_time(&self) -> f32 {
        self.clock.dt()
    }

    pub fn frame_time(&self) -> FrameTime {
        self.clock.snapshot()
    }

    // ── input ─────────────────────────────────────────────────────────────

    pub fn key_down(&self, key: Key) -> bool {
        self.backend.key_down(key)
    }

    pub fn mouse_button_down(&self, button: MouseButton) -> bool {
        self.backend.mouse_button_down(button)
    }

    pub fn mouse_position(&self) -> Vec2 {
        self.backend.mouse_position()
    }

    // ── color & blending ──────────────────────────────────────────────────

    pub fn set_back_color(&mut self, r: f32, g: f32, b: f32) {
        self.backend.set_clear_color(Color::rgb(r, g, b));
    }

    pub fn set_fore_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.state.fore_color = Color::new(r, g, b, a);
    }

    pub fn fore_color(&self) -> Color {
        self.state.fore_color
    }

    /// Switches between additive and normal blending.
    ///
    /// Queued points and lines are drawn first, under the old mode.
    pub fn set_additive_blend(&mut self, additive: bool) {
        self.backend.flush_points();
        self.backend.flush_lines();
        self.backend.set_blend_mode(BlendMode::from_additive(additive));
    }

    // ── transforms ────────────────────────────────────────────────────────

    pub fn push(&mut self) -> Result<()> {
        self.transforms.push().inspect_err(|e| log::error!("push: {e}"))
    }

    pub fn pop(&mut self) -> Result<()> {
        self.transforms.pop().inspect_err(|e| log::error!("pop: {e}"))
    }

    pub fn translate(&mut self, x: f32, y: f32) {
        self.transforms.translate(x, y);
    }

    /// Rotates counter-clockwise by `degrees`.
    pub fn rotate(&mut self, degrees: f32) {
        self.transforms.rotate(degrees);
    }

    pub fn scale(&mut self, x: f32, y: f32) {
        self.transforms.scale(x, y);
    }

    pub fn transform(&self) -> &Mat4 {
        self.transforms.current()
    }

    pub fn transform_depth(&self) -> usize {
        self.transforms.depth()
    }

    // ── resources ─────────────────────────────────────────────────────────

    pub fn load_texture(&mut self, path: impl AsRef<Path>) -> Result<TextureId> {
        let path = path.as_ref();
        self.backend
            .load_texture(path)
            .inspect_err(|e| log::error!("load_texture {path:?}: {e}"))
    }

    pub fn load_wav(&mut self, path: impl AsRef<Path>) -> Result<SoundId> {
        let path = path.as_ref();
        self.backend
            .load_wav(path)
            .inspect_err(|e| log::error!("load_wav {path:?}: {e}"))
    }

    // ── sound ─────────────────────────────────────────────────────────────

    pub fn sound_play(&mut self, sound: SoundId) -> Option<Voice> {
        self.backend.play(sound)
    }

    pub fn sound_loop(&mut self, sound: SoundId) -> Option<Voice> {
        self.backend.play_looping(sound)
    }

    pub fn sound_pause(&mut self, voice: Voice) {
        self.backend.pause(voice);
    }

    pub fn sound_stop(&mut self, voice: Voice) {
        self.backend.stop(voice);
    }

    pub fn sound_pause_all(&mut self) {
        self.backend.pause_all();
    }

    pub fn sound_resume_all(&mut self) {
        self.backend.resume_all();
    }

    pub fn sound_stop_all(&mut self) {
        self.backend.stop_all();
    }

    pub fn sound_playing(&self, voice: Voice) -> bool {
        self.backend.is_playing(voice)
    }

    pub fn sound_looping(&self, voice: Voice) -> bool {
        self.backend.is_looping(voice)
    }

    // ── shapes ────────────────────────────────────────────────────────────

    pub fn triangle_fill(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let modelview = self.placed(x, y, width, height);
        self.flush_all();
        self.backend.triangle_fill(&modelview, self.state.fore_color);
    }

    pub fn triangle_outline(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let modelview = self.placed(x, y, width, height);
        self.flush_all();
        self.backend.triangle_outline(&modelview, self.state.fore_color);
    }

    /// Rectangle centred on `(x, y)`.
    pub fn rectangle_fill(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let modelview = self.placed(x, y, width, height);
        self.flush_all();
        self.backend.rectangle_fill(&modelview, self.state.fore_color);
    }

    pub fn rectangle_outline(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let modelview = self.placed(x, y, width, height);
        self.flush_all();
        self.backend.rectangle_outline(&modelview, self.state.fore_color);
    }

    /// Circle approximated by a `num_vertices`-sided polygon.
    pub fn circle_fill(&mut self, x: f32, y: f32, radius: f32, num_vertices: u32) {
        let modelview = self.at(x, y);
        self.flush_all();
        self.backend.circle_fill(&modelview, self.state.fore_color, radius, num_vertices);
    }

    pub fn circle_outline(&mut self, x: f32, y: f32, radius: f32, num_vertices: u32) {
        let modelview = self.at(x, y);
        self.flush_all();
        self.backend.circle_outline(&modelview, self.state.fore_color, radius, num_vertices);
    }

    pub fn point(&mut self, x: f32, y: f32) {
        let modelview = self.at(x, y);
        self.backend.flush_lines();
        self.flush_text();
        self.backend.enqueue_point(&modelview, self.state.fore_color);
    }

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        let current = self.transforms.current();
        let from = current.transform_point3(Vec3::new(x1, y1, 0.0)).truncate();
        let to = current.transform_point3(Vec3::new(x2, y2, 0.0)).truncate();
        self.backend.flush_points();
        self.flush_text();
        self.backend.enqueue_line(self.state.fore_color, from, to);
    }

    // ── sprites ───────────────────────────────────────────────────────────

    pub fn set_sprite_tiling(&mut self, x: f32, y: f32) {
        self.state.sprite.tiling = Vec2::new(x, y);
    }

    pub fn set_sprite_scroll(&mut self, x: f32, y: f32) {
        self.state.sprite.scroll = Vec2::new(x, y);
    }

    /// Textured rectangle centred on `(x, y)`.
    pub fn sprite(&mut self, texture: TextureId, x: f32, y: f32, width: f32, height: f32) {
        let modelview = self.placed(x, y, width, height);
        self.flush_all();
        let sprite = self.state.sprite;
        self.backend
            .sprite(&modelview, self.state.fore_color, texture, sprite.tiling, sprite.scroll);
    }

    // ── text ──────────────────────────────────────────────────────────────

    pub fn set_text_align(&mut self, align: TextAlign) {
        self.state.text_align = align;
    }

    /// Sets alignment from its numeric code (0 left, 1 center, 2 right).
    ///
    /// An unknown code is rejected and the current alignment is kept.
    pub fn set_text_align_code(&mut self, code: i32) -> Result<()> {
        let align = TextAlign::try_from(code).inspect_err(|e| log::error!("set_text_align: {e}"))?;
        self.state.text_align = align;
        Ok(())
    }

    pub fn text_align(&self) -> TextAlign {
        self.state.text_align
    }

    pub fn text_width(&self, text: &str) -> f32 {
        self.backend.text_width(text)
    }

    pub fn text_height(&self, text: &str) -> f32 {
        self.backend.text_height(text)
    }

    pub fn set_font(&mut self, path: impl AsRef<Path>, size: f32) -> Result<()> {
        let path = path.as_ref();
        self.backend
            .set_font(path, size)
            .inspect_err(|e| log::error!("set_font {path:?}: {e}"))
    }

    pub fn set_font_size(&mut self, size: f32) {
        self.backend.set_font_size(size);
    }

    /// Draws `text` with its baseline at `(x, y)`, anchored per the alignment.
    pub fn text(&mut self, x: f32, y: f32, text: &str) {
        let mut modelview = self.at(x, y);
        let shift = self.state.text_align.offset(self.backend.text_width(text));
        if shift != 0.0 {
            modelview *= Mat4::from_translation(Vec3::new(shift, 0.0, 0.0));
        }

        self.backend.flush_points();
        self.backend.flush_lines();
        self.backend.enqueue_text(&modelview, self.state.fore_color, text);
    }

    // ── internals ─────────────────────────────────────────────────────────

    fn at(&self, x: f32, y: f32) -> Mat4 {
        *self.transforms.current() * Mat4::from_translation(Vec3::new(x, y, 0.0))
    }

    fn placed(&self, x: f32, y: f32, width: f32, height: f32) -> Mat4 {
        self.at(x, y) * Mat4::from_scale(Vec3::new(width, height, 1.0))
    }

    fn flush_text(&mut self) {
        let transform = *self.transforms.current();
        self.backend.flush_text(&transform, self.state.fore_color);
    }

    /// Points, then lines, then text.
    fn flush_all(&mut self) {
        self.backend.flush_points();
        self.backend.flush_lines();
        self.flush_text();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::canvas::recording::{Call, Drawn, RecordingBackend};
    use crate::error::CanvasError;

    fn canvas() -> Canvas<RecordingBackend> {
        Canvas::new(RecordingBackend::default())
    }

    fn flushes(c: &Canvas<RecordingBackend>) -> Vec<Call> {
        c.backend()
            .calls
            .iter()
            .filter(|c| matches!(c, Call::FlushPoints | Call::FlushLines | Call::FlushText(..)))
            .cloned()
            .collect()
    }

    fn clear(c: &mut Canvas<RecordingBackend>) {
        c.backend_mut().calls.clear();
    }

    // ── draw ordering ─────────────────────────────────────────────────────

    #[test]
    fn immediate_draw_flushes_earlier_points_first() {
        let mut c = canvas();
        c.point(10.0, 10.0);
        c.rectangle_fill(0.0, 0.0, 50.0, 50.0);
        c.point(40.0, 40.0);
        c.render().unwrap();

        assert_eq!(
            c.backend().drawn,
            vec![
                Drawn::Point(Vec2::new(10.0, 10.0)),
                Drawn::Rectangle,
                Drawn::Point(Vec2::new(40.0, 40.0)),
            ]
        );
    }

    #[test]
    fn shapes_and_sprites_flush_points_lines_text_in_order() {
        let identity = Mat4::IDENTITY;
        let white = Color::WHITE;
        let expected = vec![Call::FlushPoints, Call::FlushLines, Call::FlushText(identity, white)];

        let mut c = canvas();
        let draws: [fn(&mut Canvas<RecordingBackend>); 7] = [
            |c| c.triangle_fill(1.0, 1.0, 2.0, 2.0),
            |c| c.triangle_outline(1.0, 1.0, 2.0, 2.0),
            |c| c.rectangle_fill(1.0, 1.0, 2.0, 2.0),
            |c| c.rectangle_outline(1.0, 1.0, 2.0, 2.0),
            |c| c.circle_fill(1.0, 1.0, 2.0, 12),
            |c| c.circle_outline(1.0, 1.0, 2.0, 12),
            |c| c.sprite(TextureId(0), 1.0, 1.0, 2.0, 2.0),
        ];

        for draw in draws {
            clear(&mut c);
            draw(&mut c);
            assert_eq!(flushes(&c), expected);
        }
    }

    #[test]
    fn line_flushes_points_and_text_only() {
        let mut c = canvas();
        c.line(0.0, 0.0, 5.0, 5.0);
        assert_eq!(
            flushes(&c),
            vec![Call::FlushPoints, Call::FlushText(Mat4::IDENTITY, Color::WHITE)]
        );
    }

    #[test]
    fn point_flushes_lines_and_text_only() {
        let mut c = canvas();
        c.point(1.0, 2.0);
        assert_eq!(
            flushes(&c),
            vec![Call::FlushLines, Call::FlushText(Mat4::IDENTITY, Color::WHITE)]
        );
    }

    #[test]
    fn text_flushes_points_and_lines_only() {
        let mut c = canvas();
        c.text(0.0, 0.0, "hi");
        assert_eq!(flushes(&c), vec![Call::FlushPoints, Call::FlushLines]);
    }

    #[test]
    fn render_flushes_everything_then_presents() {
        let mut c = canvas();
        clear(&mut c);
        c.render().unwrap();
        assert_eq!(
            c.backend().calls,
            vec![
                Call::FlushPoints,
                Call::FlushLines,
                Call::FlushText(Mat4::IDENTITY, Color::WHITE),
                Call::Present,
            ]
        );
    }

    #[test]
    fn blend_change_flushes_points_and_lines() {
        let mut c = canvas();
        clear(&mut c);
        c.set_additive_blend(true);
        c.set_additive_blend(false);
        assert_eq!(
            c.backend().calls,
            vec![
                Call::FlushPoints,
                Call::FlushLines,
                Call::Blend(BlendMode::Additive),
                Call::FlushPoints,
                Call::FlushLines,
                Call::Blend(BlendMode::Normal),
            ]
        );
    }

    #[test]
    fn interleaved_lines_and_points_keep_call_order() {
        let mut c = canvas();
        c.line(0.0, 0.0, 1.0, 1.0);
        c.point(2.0, 2.0);
        c.line(3.0, 3.0, 4.0, 4.0);
        c.render().unwrap();

        assert_eq!(
            c.backend().drawn,
            vec![
                Drawn::Line(Vec2::ZERO, Vec2::ONE),
                Drawn::Point(Vec2::new(2.0, 2.0)),
                Drawn::Line(Vec2::new(3.0, 3.0), Vec2::new(4.0, 4.0)),
            ]
        );
    }

    #[test]
    fn nothing_queued_survives_the_frame() {
        let mut c = canvas();
        c.point(1.0, 1.0);
        c.line(0.0, 0.0, 1.0, 0.0);
        c.text(0.0, 0.0, "tail");
        c.render().unwrap();
        assert!(c.backend().pending_is_empty());
        assert_eq!(c.backend().drawn.len(), 3);
    }

    // ── placement ─────────────────────────────────────────────────────────

    #[test]
    fn shapes_are_placed_by_translate_then_scale() {
        let mut c = canvas();
        c.translate(100.0, 0.0);
        c.rectangle_fill(10.0, 20.0, 4.0, 6.0);

        let Some(Call::RectangleFill(m, _)) = c.backend().calls.last().cloned() else {
            panic!("expected a rectangle");
        };
        let corner = m.transform_point3(Vec3::new(0.5, 0.5, 0.0)).truncate();
        assert_eq!(corner, Vec2::new(112.0, 23.0));
    }

    #[test]
    fn line_endpoints_use_current_transform() {
        let mut c = canvas();
        c.translate(5.0, 5.0);
        c.scale(2.0, 2.0);
        c.line(1.0, 0.0, 0.0, 1.0);
        c.render().unwrap();
        assert_eq!(
            c.backend().drawn,
            vec![Drawn::Line(Vec2::new(7.0, 5.0), Vec2::new(5.0, 7.0))]
        );
    }

    #[test]
    fn text_alignment_shifts_by_measured_width() {
        // RecordingBackend measures 10px per char.
        let cases = [
            (TextAlign::Left, 50.0),
            (TextAlign::Center, 30.0),
            (TextAlign::Right, 10.0),
        ];
        for (align, x) in cases {
            let mut c = canvas();
            c.set_text_align(align);
            c.text(50.0, 0.0, "four");
            c.render().unwrap();
            assert_eq!(c.backend().drawn, vec![Drawn::Text("four".into(), Vec2::new(x, 0.0))]);
        }
    }

    #[test]
    fn text_flush_receives_flush_time_transform_and_color() {
        let mut c = canvas();
        c.text(0.0, 0.0, "queued");
        c.translate(9.0, 9.0);
        c.set_fore_color(1.0, 0.0, 0.0, 1.0);
        c.rectangle_fill(0.0, 0.0, 1.0, 1.0);

        let flushed = c
            .backend()
            .calls
            .iter()
            .find_map(|call| match call {
                Call::FlushText(m, color) => Some((*m, *color)),
                _ => None,
            })
            .unwrap();
        assert_eq!(flushed.0, Mat4::from_translation(Vec3::new(9.0, 9.0, 0.0)));
        assert_eq!(flushed.1, Color::new(1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn queued_color_is_captured_at_enqueue() {
        let mut c = canvas();
        c.set_fore_color(0.0, 1.0, 0.0, 1.0);
        c.point(1.0, 1.0);
        c.set_fore_color(1.0, 0.0, 0.0, 1.0);
        c.render().unwrap();

        let colors: Vec<Color> = c
            .backend()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::EnqueuePoint(_, color) => Some(*color),
                _ => None,
            })
            .collect();
        assert_eq!(colors, vec![Color::new(0.0, 1.0, 0.0, 1.0)]);
    }

    #[test]
    fn sprite_reads_tiling_and_scroll_registers() {
        let mut c = canvas();
        c.set_sprite_tiling(2.0, 3.0);
        c.set_sprite_scroll(0.25, 0.5);
        c.sprite(TextureId(4), 0.0, 0.0, 8.0, 8.0);
        c.sprite(TextureId(4), 0.0, 0.0, 8.0, 8.0);

        let sprites: Vec<_> = c
            .backend()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Sprite(id, tiling, scroll) => Some((*id, *tiling, *scroll)),
                _ => None,
            })
            .collect();
        assert_eq!(sprites.len(), 2);
        for s in sprites {
            assert_eq!(s, (TextureId(4), Vec2::new(2.0, 3.0), Vec2::new(0.25, 0.5)));
        }
    }

    // ── state & errors ────────────────────────────────────────────────────

    #[test]
    fn new_canvas_clears_to_black() {
        let c = canvas();
        assert_eq!(c.backend().calls, vec![Call::ClearColor(Color::BLACK)]);
    }

    #[test]
    fn back_color_is_forwarded_opaque() {
        let mut c = canvas();
        clear(&mut c);
        c.set_back_color(0.1, 0.2, 0.3);
        assert_eq!(c.backend().calls, vec![Call::ClearColor(Color::new(0.1, 0.2, 0.3, 1.0))]);
    }

    #[test]
    fn invalid_alignment_code_keeps_previous_alignment() {
        let mut c = canvas();
        c.set_text_align(TextAlign::Right);
        let err = c.set_text_align_code(7).unwrap_err();
        assert!(matches!(err, CanvasError::InvalidTextAlign(7)));
        assert_eq!(c.text_align(), TextAlign::Right);

        c.set_text_align_code(1).unwrap();
        assert_eq!(c.text_align(), TextAlign::Center);
    }

    #[test]
    fn stack_misuse_surfaces_as_errors() {
        let mut c = canvas();
        assert!(matches!(c.pop(), Err(CanvasError::StackUnderflow)));
        for _ in 0..31 {
            c.push().unwrap();
        }
        assert!(matches!(c.push(), Err(CanvasError::StackOverflow { .. })));
        assert_eq!(c.transform_depth(), 31);
    }

    #[test]
    fn render_ticks_clock_from_backend_time() {
        let mut c = canvas();
        c.backend_mut().advance(Duration::from_millis(40));
        c.render().unwrap();
        assert!((c.delta_time() - 0.04).abs() < 1e-6);

        c.backend_mut().advance(Duration::from_secs(3));
        c.render().unwrap();
        assert_eq!(c.delta_time(), 0.5);
        assert_eq!(c.frame_time().frame_index, 2);
    }

    #[test]
    fn sound_calls_are_forwarded() {
        let mut c = canvas();
        let sound = c.load_wav("boom.wav").unwrap();
        let voice = c.sound_loop(sound).unwrap();
        assert!(c.sound_playing(voice));
        assert!(c.sound_looping(voice));
        c.sound_pause_all();
        assert!(!c.sound_playing(voice));
        c.sound_resume_all();
        assert!(c.sound_playing(voice));
        c.sound_stop(voice);
        assert!(!c.sound_playing(voice));
    }
}
