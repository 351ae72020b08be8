use std::path::Path;

use anyhow::Result;
use easel_engine::{Canvas, CanvasConfig, Key, LoggingConfig, MouseButton, TextAlign, init_logging};

const WIDTH: f32 = 800.0;
const HEIGHT: f32 = 600.0;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let mut canvas = Canvas::open(CanvasConfig::new("easel demo", WIDTH as u32, HEIGHT as u32))?;
    canvas.set_back_color(0.08, 0.08, 0.12);

    match find_font() {
        Some(path) => canvas.set_font(path, 18.0)?,
        None => log::warn!("no system font found; text is skipped"),
    }

    // Optional WAV passed on the command line, played with Space.
    let sound = match std::env::args().nth(1) {
        Some(path) => Some(canvas.load_wav(&path)?),
        None => None,
    };
    let mut space_was_down = false;

    let mut angle = 0.0_f32;
    while !canvas.should_close() && !canvas.key_down(Key::Escape) {
        let dt = canvas.delta_time();
        angle = (angle + 90.0 * dt) % 360.0;

        // Spinning nested shapes.
        canvas.push()?;
        canvas.translate(WIDTH * 0.5, HEIGHT * 0.5);
        canvas.rotate(angle);
        canvas.set_fore_color(0.9, 0.3, 0.2, 1.0);
        canvas.rectangle_fill(0.0, 0.0, 160.0, 160.0);
        canvas.push()?;
        canvas.rotate(-2.0 * angle);
        canvas.scale(0.5, 0.5);
        canvas.set_fore_color(1.0, 0.9, 0.3, 1.0);
        canvas.triangle_fill(0.0, 0.0, 200.0, 200.0);
        canvas.pop()?;
        canvas.set_fore_color(1.0, 1.0, 1.0, 1.0);
        canvas.rectangle_outline(0.0, 0.0, 200.0, 200.0);
        canvas.pop()?;

        // Overlapping additive circles.
        canvas.set_additive_blend(true);
        canvas.set_fore_color(0.8, 0.1, 0.1, 0.8);
        canvas.circle_fill(140.0, 140.0, 60.0, 48);
        canvas.set_fore_color(0.1, 0.8, 0.1, 0.8);
        canvas.circle_fill(190.0, 140.0, 60.0, 48);
        canvas.set_fore_color(0.1, 0.1, 0.8, 0.8);
        canvas.circle_fill(165.0, 185.0, 60.0, 48);
        canvas.set_additive_blend(false);

        // A point grid and a line that follows the mouse.
        canvas.set_fore_color(0.6, 0.6, 0.7, 1.0);
        for i in 0..20 {
            for j in 0..10 {
                canvas.point(560.0 + i as f32 * 10.0, 80.0 + j as f32 * 10.0);
            }
        }
        let mouse = canvas.mouse_position();
        if canvas.mouse_button_down(MouseButton::Left) {
            canvas.set_fore_color(0.3, 1.0, 0.6, 1.0);
        }
        canvas.line(WIDTH * 0.5, HEIGHT * 0.5, mouse.x, mouse.y);
        canvas.circle_outline(mouse.x, mouse.y, 12.0, 24);

        // Labels.
        canvas.set_fore_color(1.0, 1.0, 1.0, 1.0);
        canvas.set_text_align(TextAlign::Center);
        canvas.text(WIDTH * 0.5, HEIGHT - 40.0, "easel");
        canvas.set_text_align(TextAlign::Left);
        let fps = 1.0 / dt;
        canvas.text(10.0, 10.0, &format!("{fps:.0} fps"));
        canvas.set_text_align(TextAlign::Right);
        canvas.text(WIDTH - 10.0, 10.0, "Esc quits, Space plays");

        let space_down = canvas.key_down(Key::Space);
        if space_down && !space_was_down {
            if let Some(sound) = sound {
                if canvas.sound_play(sound).is_none() {
                    log::debug!("no free voice");
                }
            }
        }
        space_was_down = space_down;

        canvas.render()?;
    }

    canvas.close();
    Ok(())
}

fn find_font() -> Option<&'static Path> {
    [
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/noto/NotoSans-Regular.ttf",
        "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ]
    .into_iter()
    .map(Path::new)
    .find(|p| p.exists())
}
