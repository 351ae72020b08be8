//! The drawing context and its registers.

mod context;
mod state;
mod transform_stack;

#[cfg(test)]
pub(crate) mod recording;

pub use context::Canvas;
pub use state::{DrawState, SpriteState, TextAlign};
pub use transform_stack::{TransformStack, TRANSFORM_STACK_SIZE};
