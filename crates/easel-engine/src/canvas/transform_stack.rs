use glam::{Mat4, Vec3};

use crate::error::{CanvasError, Result};

/// Number of matrix slots in a [`TransformStack`].
///
/// The base slot is always occupied, so at most `TRANSFORM_STACK_SIZE - 1`
/// pushes may be outstanding.
pub const TRANSFORM_STACK_SIZE: usize = 32;

/// Fixed-depth stack of 2D model transforms.
///
/// Transforms compose on the right: `translate`, `rotate` and `scale` apply in
/// the local space of whatever is already on the stack, the usual model-matrix
/// convention for 2D scenes.
#[derive(Debug, Clone)]
pub struct TransformStack {
    slots: [Mat4; TRANSFORM_STACK_SIZE],
    cursor: usize,
}

impl TransformStack {
    pub fn new() -> Self {
        Self {
            slots: [Mat4::IDENTITY; TRANSFORM_STACK_SIZE],
            cursor: 0,
        }
    }

    /// Duplicates the current matrix into the next slot.
    ///
    /// Fails without touching the stack when it is already full.
    pub fn push(&mut self) -> Result<()> {
        if self.cursor >= TRANSFORM_STACK_SIZE - 1 {
            return Err(CanvasError::StackOverflow { capacity: TRANSFORM_STACK_SIZE });
        }
        self.cursor += 1;
        self.slots[self.cursor] = self.slots[self.cursor - 1];
        Ok(())
    }

    /// Discards the current matrix and returns to the parent.
    pub fn pop(&mut self) -> Result<()> {
        if self.cursor == 0 {
            return Err(CanvasError::StackUnderflow);
        }
        self.cursor -= 1;
        Ok(())
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.apply(Mat4::from_translation(Vec3::new(dx, dy, 0.0)));
    }

    /// Rotates counter-clockwise by `degrees` around the local origin.
    pub fn rotate(&mut self, degrees: f32) {
        self.apply(Mat4::from_rotation_z(degrees.to_radians()));
    }

    pub fn scale(&mut self, sx: f32, sy: f32) {
        self.apply(Mat4::from_scale(Vec3::new(sx, sy, 1.0)));
    }

    /// The top-of-stack matrix.
    #[inline]
    pub fn current(&self) -> &Mat4 {
        &self.slots[self.cursor]
    }

    /// Outstanding pushes.
    #[inline]
    pub fn depth(&self) -> usize {
        self.cursor
    }

    #[inline]
    fn apply(&mut self, local: Mat4) {
        let top = &mut self.slots[self.cursor];
        *top = *top * local;
    }
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}
