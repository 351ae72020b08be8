use std::io::Read;
use std::path::Path;

use hound::{SampleFormat, WavReader};

use crate::error::{CanvasError, Result};

/// Decoded sound: interleaved stereo `f32` frames at the file's sample rate.
#[derive(Debug, Clone)]
pub struct Sound {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Sound {
    /// Reads and decodes a WAV file.
    pub fn load(path: &Path) -> Result<Self> {
        let reader = WavReader::open(path).map_err(|source| CanvasError::SoundLoad {
            path: path.to_path_buf(),
            source,
        })?;
        let sound = Self::decode(reader, path)?;
        log::debug!(
            "loaded {path:?}: {} frames at {} Hz",
            sound.frames(),
            sound.sample_rate
        );
        Ok(sound)
    }

    /// Decodes PCM (8/16/24/32-bit integer or 32-bit float), mono or stereo.
    ///
    /// Mono is duplicated to both channels. `path` is only used for error reporting.
    pub fn decode<R: Read>(reader: WavReader<R>, path: &Path) -> Result<Self> {
        let spec = reader.spec();
        let load_err = |source| CanvasError::SoundLoad {
            path: path.to_path_buf(),
            source,
        };

        if spec.channels == 0 || spec.channels > 2 {
            return Err(CanvasError::UnsupportedWav {
                path: path.to_path_buf(),
                reason: format!("{} channels (only mono and stereo are supported)", spec.channels),
            });
        }
        if spec.sample_rate == 0 {
            return Err(CanvasError::UnsupportedWav {
                path: path.to_path_buf(),
                reason: "sample rate of 0 Hz".to_string(),
            });
        }

        let raw: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
            (SampleFormat::Float, 32) => reader
                .into_samples::<f32>()
                .collect::<std::result::Result<_, _>>()
                .map_err(load_err)?,
            (SampleFormat::Int, bits @ (8 | 16 | 24 | 32)) => {
                let scale = 1.0 / (1u64 << (bits - 1)) as f32;
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|v| v as f32 * scale))
                    .collect::<std::result::Result<_, _>>()
                    .map_err(load_err)?
            }
            (format, bits) => {
                return Err(CanvasError::UnsupportedWav {
                    path: path.to_path_buf(),
                    reason: format!("{bits}-bit {format:?} samples"),
                });
            }
        };

        let samples = if spec.channels == 1 {
            raw.iter().flat_map(|&s| [s, s]).collect()
        } else {
            raw
        };

        Ok(Self {
            samples,
            sample_rate: spec.sample_rate,
        })
    }

    #[inline]
    pub fn frames(&self) -> usize {
        self.samples.len() / 2
    }

    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// `(left, right)` of frame `index`, or silence past the end.
    #[inline]
    pub fn frame(&self, index: usize) -> (f32, f32) {
        match self.samples.get(index * 2..index * 2 + 2) {
            Some(&[l, r]) => (l, r),
            _ => (0.0, 0.0),
        }
    }

    #[cfg(test)]
    pub(crate) fn from_frames(frames: &[(f32, f32)], sample_rate: u32) -> Self {
        Self {
            samples: frames.iter().flat_map(|&(l, r)| [l, r]).collect(),
            sample_rate,
        }
    }
}
