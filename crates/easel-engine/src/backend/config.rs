use crate::device::GpuInit;

/// Window creation parameters.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    /// Logical width in pixels; also the drawing-space width.
    pub width: u32,
    /// Logical height in pixels; also the drawing-space height.
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "easel".to_string(),
            width: 800,
            height: 600,
        }
    }
}

/// Sound output parameters.
#[derive(Debug, Clone)]
pub struct AudioConfig {
    /// When false no output device is opened; sound calls still work but are silent.
    pub enabled: bool,
    /// Number of simultaneously playing sounds.
    pub voices: usize,
    /// Size of the mix-ahead ring buffer, in stereo frames.
    pub buffer_frames: usize,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            voices: 16,
            buffer_frames: 4096,
        }
    }
}

/// Everything needed to open a [`Canvas`](crate::canvas::Canvas) window.
///
/// ```no_run
/// use easel_engine::{Canvas, CanvasConfig};
///
/// let canvas = Canvas::open(CanvasConfig::new("demo", 640, 480).with_audio(false))?;
/// # Ok::<(), easel_engine::CanvasError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct CanvasConfig {
    pub window: WindowConfig,
    pub gpu: GpuInit,
    pub audio: AudioConfig,
}

impl CanvasConfig {
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            window: WindowConfig {
                title: title.into(),
                width,
                height,
            },
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.window.title = title.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.window.width = width;
        self.window.height = height;
        self
    }

    pub fn with_gpu(mut self, gpu: GpuInit) -> Self {
        self.gpu = gpu;
        self
    }

    pub fn with_audio(mut self, enabled: bool) -> Self {
        self.audio.enabled = enabled;
        self
    }

    pub fn with_voices(mut self, voices: usize) -> Self {
        self.audio.voices = voices;
        self
    }
}
