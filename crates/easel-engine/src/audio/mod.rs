//! Sound loading, voice mixing and device output.
//!
//! Mixing happens on the main thread once per frame; the device callback only
//! drains a lock-free ring. Without an output device every call still behaves
//! the same, voices just advance against wall time in silence.

mod mixer;
mod output;
mod sound;

use std::path::Path;
use std::time::Duration;

pub use mixer::Mixer;
pub use output::AudioOutput;
pub use sound::Sound;

use crate::backend::AudioConfig;
use crate::error::Result;

/// Rate voices advance at when no output device is open.
const SILENT_RATE: u32 = 44_100;

/// Handle to a loaded sound.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SoundId(pub(crate) u32);

/// Handle to the voice a sound was started on.
///
/// A voice is reused once its sound finishes or is stopped, so a stale handle
/// may refer to a newer sound.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Voice(pub(crate) usize);

pub struct Audio {
    mixer: Mixer,
    output: Option<AudioOutput>,
    buffer_frames: usize,
    scratch: Vec<f32>,
    silent_carry: f64,
}

impl Audio {
    /// Opens the output device if enabled; on failure the mixer runs silent.
    pub fn new(config: &AudioConfig) -> Self {
        let output = if config.enabled {
            match AudioOutput::open(config.buffer_frames) {
                Ok(out) => Some(out),
                Err(e) => {
                    log::warn!("audio disabled: {e:#}");
                    None
                }
            }
        } else {
            log::debug!("audio output disabled by config");
            None
        };

        Self {
            mixer: Mixer::new(config.voices),
            output,
            buffer_frames: config.buffer_frames.max(1),
            scratch: Vec::new(),
            silent_carry: 0.0,
        }
    }

    pub fn is_silent(&self) -> bool {
        self.output.is_none()
    }

    pub fn load_wav(&mut self, path: &Path) -> Result<SoundId> {
        let sound = Sound::load(path)?;
        Ok(self.mixer.add_sound(sound))
    }

    pub fn mixer(&self) -> &Mixer {
        &self.mixer
    }

    pub fn mixer_mut(&mut self) -> &mut Mixer {
        &mut self.mixer
    }

    /// Mixes ahead. `elapsed` is the wall time since the previous call and only
    /// matters when running silent.
    pub fn pump(&mut self, elapsed: Duration) {
        let (frames, rate) = match &self.output {
            Some(out) => (out.vacant_frames().min(self.buffer_frames), out.sample_rate()),
            None => {
                let exact = elapsed.as_secs_f64() * SILENT_RATE as f64 + self.silent_carry;
                let whole = exact.floor();
                self.silent_carry = exact - whole;
                ((whole as usize).min(SILENT_RATE as usize), SILENT_RATE)
            }
        };
        if frames == 0 {
            return;
        }

        self.scratch.resize(frames * 2, 0.0);
        self.mixer.mix(&mut self.scratch, rate);

        if let Some(out) = self.output.as_mut() {
            out.push(&self.scratch);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn silent(voices: usize) -> Audio {
        Audio::new(&AudioConfig {
            enabled: false,
            voices,
            buffer_frames: 64,
        })
    }

    #[test]
    fn disabled_config_runs_silent() {
        assert!(silent(4).is_silent());
    }

    #[test]
    fn silent_voices_advance_with_wall_time() {
        let mut audio = silent(1);
        let id = audio.mixer_mut().add_sound(Sound::from_frames(&[(0.1, 0.1); 441], SILENT_RATE));
        let voice = audio.mixer_mut().play(id, false).unwrap();

        audio.pump(Duration::from_millis(5));
        assert!(audio.mixer().is_playing(voice));

        audio.pump(Duration::from_millis(6));
        assert!(!audio.mixer().is_playing(voice));
    }
}
