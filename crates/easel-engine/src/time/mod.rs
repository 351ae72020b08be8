//! Time subsystem.
//!
//! One `FrameClock` per canvas; `tick` once per presented frame.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime, IDEAL_FRAME_TIME, MAX_DELTA_TIME, MIN_DELTA_TIME};
