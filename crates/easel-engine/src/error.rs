//! Error type shared by the canvas and its backends.

use std::path::PathBuf;

use thiserror::Error;

/// Errors reported by canvas operations.
///
/// Usage errors (stack misuse, invalid alignment, a second window) indicate a
/// bug in the calling code; nothing in the engine retries or recovers from them.
#[derive(Error, Debug)]
pub enum CanvasError {
    /// `push` was called with the transform stack already full.
    #[error("push exceeded the maximum transform stack size of {capacity}")]
    StackOverflow { capacity: usize },

    /// `pop` was called with no outstanding `push`.
    #[error("cannot pop an empty transform stack")]
    StackUnderflow,

    /// A numeric alignment code outside Left (0), Center (1), Right (2).
    #[error("text alignment code {0} is not one of left (0), center (1) or right (2)")]
    InvalidTextAlign(i32),

    /// A window is already open in this process.
    #[error("a window is already open; only one canvas window may exist at a time")]
    WindowAlreadyOpen,

    #[error("failed to load texture {path:?}")]
    TextureLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to load sound {path:?}")]
    SoundLoad {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error("unsupported WAV file {path:?}: {reason}")]
    UnsupportedWav { path: PathBuf, reason: String },

    #[error("failed to load font {path:?}: {reason}")]
    FontLoad { path: PathBuf, reason: String },

    #[error("failed to read {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The presentation surface failed in a way that cannot be reconfigured.
    #[error("presentation surface failed: {0}")]
    Surface(String),

    /// Window, GPU or audio device setup failure.
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Result alias for canvas operations.
pub type Result<T> = std::result::Result<T, CanvasError>;
