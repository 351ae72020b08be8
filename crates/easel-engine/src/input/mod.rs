//! Input subsystem.
//!
//! Public API is platform-agnostic; `platform` translates winit events into
//! [`InputEvent`]s in drawing space (+Y up).

pub(crate) mod platform;
mod state;
mod types;

pub use state::InputState;
pub use types::{InputEvent, Key, KeyState, Modifiers, MouseButton, MouseButtonState};
