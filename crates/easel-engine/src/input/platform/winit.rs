use glam::Vec2;
use winit::event::{ElementState, MouseButton as WinitMouseButton, WindowEvent};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};
use winit::window::Window;

use crate::input::{InputEvent, Key, KeyState, Modifiers, MouseButton, MouseButtonState};

/// Translates a winit `WindowEvent` into an engine `InputEvent`.
///
/// `view_height` is the logical drawing height; pointer Y is flipped against it
/// so positions share the canvas's bottom-left origin. Returns `None` for events
/// the input subsystem does not track.
pub fn translate_window_event(window: &Window, view_height: f32, event: &WindowEvent) -> Option<InputEvent> {
    match event {
        WindowEvent::ModifiersChanged(m) => Some(InputEvent::ModifiersChanged(map_modifiers(m.state()))),

        WindowEvent::Focused(f) => Some(InputEvent::Focused(*f)),

        WindowEvent::CursorLeft { .. } => Some(InputEvent::PointerLeft),

        WindowEvent::CursorMoved { position, .. } => {
            let logical = position.to_logical::<f64>(window.scale_factor());
            Some(InputEvent::PointerMoved(to_drawing_space(
                Vec2::new(logical.x as f32, logical.y as f32),
                view_height,
            )))
        }

        WindowEvent::MouseInput { state, button, .. } => Some(InputEvent::PointerButton {
            button: map_mouse_button(*button),
            state: match state {
                ElementState::Pressed => MouseButtonState::Pressed,
                ElementState::Released => MouseButtonState::Released,
            },
        }),

        WindowEvent::KeyboardInput { event, .. } => {
            let key = match event.physical_key {
                PhysicalKey::Code(code) => map_key(code),
                PhysicalKey::Unidentified(_) => Key::Unknown(0),
            };
            let state = match event.state {
                ElementState::Pressed => KeyState::Pressed,
                ElementState::Released => KeyState::Released,
            };
            Some(InputEvent::Key { key, state })
        }

        _ => None,
    }
}

/// Window coordinates (top-left origin, +Y down) to drawing space.
#[inline]
pub fn to_drawing_space(window_pos: Vec2, view_height: f32) -> Vec2 {
    Vec2::new(window_pos.x, view_height - window_pos.y)
}

fn map_modifiers(m: ModifiersState) -> Modifiers {
    Modifiers {
        shift: m.shift_key(),
        ctrl: m.control_key(),
        alt: m.alt_key(),
        meta: m.super_key(),
    }
}

fn map_mouse_button(b: WinitMouseButton) -> MouseButton {
    match b {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Back,
        WinitMouseButton::Forward => MouseButton::Forward,
        WinitMouseButton::Other(v) => MouseButton::Other(v),
    }
}

fn map_key(code: KeyCode) -> Key {
    use KeyCode as C;

    const LETTERS: [Key; 26] = [
        Key::A, Key::B, Key::C, Key::D, Key::E, Key::F, Key::G, Key::H, Key::I,
        Key::J, Key::K, Key::L, Key::M, Key::N, Key::O, Key::P, Key::Q, Key::R,
        Key::S, Key::T, Key::U, Key::V, Key::W, Key::X, Key::Y, Key::Z,
    ];
    const LETTER_CODES: [KeyCode; 26] = [
        C::KeyA, C::KeyB, C::KeyC, C::KeyD, C::KeyE, C::KeyF, C::KeyG, C::KeyH, C::KeyI,
        C::KeyJ, C::KeyK, C::KeyL, C::KeyM, C::KeyN, C::KeyO, C::KeyP, C::KeyQ, C::KeyR,
        C::KeyS, C::KeyT, C::KeyU, C::KeyV, C::KeyW, C::KeyX, C::KeyY, C::KeyZ,
    ];
    const DIGITS: [(KeyCode, Key, KeyCode, Key); 10] = [
        (C::Digit0, Key::Digit0, C::Numpad0, Key::Keypad0),
        (C::Digit1, Key::Digit1, C::Numpad1, Key::Keypad1),
        (C::Digit2, Key::Digit2, C::Numpad2, Key::Keypad2),
        (C::Digit3, Key::Digit3, C::Numpad3, Key::Keypad3),
        (C::Digit4, Key::Digit4, C::Numpad4, Key::Keypad4),
        (C::Digit5, Key::Digit5, C::Numpad5, Key::Keypad5),
        (C::Digit6, Key::Digit6, C::Numpad6, Key::Keypad6),
        (C::Digit7, Key::Digit7, C::Numpad7, Key::Keypad7),
        (C::Digit8, Key::Digit8, C::Numpad8, Key::Keypad8),
        (C::Digit9, Key::Digit9, C::Numpad9, Key::Keypad9),
    ];
    const FUNCTION: [(KeyCode, Key); 12] = [
        (C::F1, Key::F1), (C::F2, Key::F2), (C::F3, Key::F3), (C::F4, Key::F4),
        (C::F5, Key::F5), (C::F6, Key::F6), (C::F7, Key::F7), (C::F8, Key::F8),
        (C::F9, Key::F9), (C::F10, Key::F10), (C::F11, Key::F11), (C::F12, Key::F12),
    ];

    if let Some(i) = LETTER_CODES.iter().position(|&c| c == code) {
        return LETTERS[i];
    }
    for (digit, key, pad, pad_key) in DIGITS {
        if code == digit {
            return key;
        }
        if code == pad {
            return pad_key;
        }
    }
    if let Some(&(_, key)) = FUNCTION.iter().find(|(c, _)| *c == code) {
        return key;
    }

    match code {
        C::Escape => Key::Escape,
        C::Enter => Key::Enter,
        C::NumpadEnter => Key::KeypadEnter,
        C::Tab => Key::Tab,
        C::Backspace => Key::Backspace,
        C::Space => Key::Space,
        C::Pause => Key::Pause,

        C::Insert => Key::Insert,
        C::Delete => Key::Delete,
        C::Home => Key::Home,
        C::End => Key::End,
        C::PageUp => Key::PageUp,
        C::PageDown => Key::PageDown,

        C::ArrowUp => Key::ArrowUp,
        C::ArrowDown => Key::ArrowDown,
        C::ArrowLeft => Key::ArrowLeft,
        C::ArrowRight => Key::ArrowRight,

        C::ShiftLeft | C::ShiftRight => Key::Shift,
        C::ControlLeft | C::ControlRight => Key::Control,
        C::AltLeft | C::AltRight => Key::Alt,
        C::SuperLeft | C::SuperRight => Key::Meta,

        other => Key::Unknown(other as u32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_y_is_flipped() {
        assert_eq!(to_drawing_space(Vec2::new(10.0, 0.0), 600.0), Vec2::new(10.0, 600.0));
        assert_eq!(to_drawing_space(Vec2::new(10.0, 600.0), 600.0), Vec2::new(10.0, 0.0));
    }

    #[test]
    fn keys_map_by_physical_position() {
        assert_eq!(map_key(KeyCode::KeyQ), Key::Q);
        assert_eq!(map_key(KeyCode::Digit7), Key::Digit7);
        assert_eq!(map_key(KeyCode::Numpad7), Key::Keypad7);
        assert_eq!(map_key(KeyCode::F11), Key::F11);
        assert_eq!(map_key(KeyCode::ShiftRight), Key::Shift);
        assert!(matches!(map_key(KeyCode::CapsLock), Key::Unknown(_)));
    }
}
