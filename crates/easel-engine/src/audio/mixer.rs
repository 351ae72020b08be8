use super::sound::Sound;
use super::{SoundId, Voice};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Phase {
    Idle,
    Playing,
    Paused,
}

#[derive(Debug, Copy, Clone)]
struct VoiceState {
    phase: Phase,
    sound: SoundId,
    looping: bool,
    /// Playhead in source frames.
    position: f64,
}

impl VoiceState {
    const IDLE: VoiceState = VoiceState {
        phase: Phase::Idle,
        sound: SoundId(0),
        looping: false,
        position: 0.0,
    };
}

/// Fixed pool of voices mixing loaded sounds into interleaved stereo.
///
/// Sources are resampled to the output rate with linear interpolation. A voice
/// that reaches the end of a one-shot sound returns to idle; a looping voice
/// wraps to the start.
#[derive(Debug)]
pub struct Mixer {
    sounds: Vec<Sound>,
    voices: Vec<VoiceState>,
}

impl Mixer {
    pub fn new(voices: usize) -> Self {
        Self {
            sounds: Vec::new(),
            voices: vec![VoiceState::IDLE; voices],
        }
    }

    pub fn add_sound(&mut self, sound: Sound) -> SoundId {
        self.sounds.push(sound);
        SoundId((self.sounds.len() - 1) as u32)
    }

    /// Starts `sound` on the first idle voice.
    pub fn play(&mut self, sound: SoundId, looping: bool) -> Option<Voice> {
        if self.sounds.get(sound.0 as usize).is_none() {
            log::warn!("play: unknown sound {sound:?}");
            return None;
        }
        let Some(index) = self.voices.iter().position(|v| v.phase == Phase::Idle) else {
            log::debug!("play: all {} voices busy", self.voices.len());
            return None;
        };

        self.voices[index] = VoiceState {
            phase: Phase::Playing,
            sound,
            looping,
            position: 0.0,
        };
        Some(Voice(index))
    }

    pub fn pause(&mut self, voice: Voice) {
        if let Some(v) = self.voices.get_mut(voice.0) {
            if v.phase == Phase::Playing {
                v.phase = Phase::Paused;
            }
        }
    }

    pub fn resume(&mut self, voice: Voice) {
        if let Some(v) = self.voices.get_mut(voice.0) {
            if v.phase == Phase::Paused {
                v.phase = Phase::Playing;
            }
        }
    }

    pub fn stop(&mut self, voice: Voice) {
        if let Some(v) = self.voices.get_mut(voice.0) {
            *v = VoiceState::IDLE;
        }
    }

    pub fn is_playing(&self, voice: Voice) -> bool {
        self.voices.get(voice.0).is_some_and(|v| v.phase == Phase::Playing)
    }

    pub fn is_looping(&self, voice: Voice) -> bool {
        self.voices
            .get(voice.0)
            .is_some_and(|v| v.phase != Phase::Idle && v.looping)
    }

    pub fn pause_all(&mut self) {
        for i in 0..self.voices.len() {
            self.pause(Voice(i));
        }
    }

    pub fn resume_all(&mut self) {
        for i in 0..self.voices.len() {
            self.resume(Voice(i));
        }
    }

    pub fn stop_all(&mut self) {
        self.voices.fill(VoiceState::IDLE);
    }

    /// Mixes `out.len() / 2` stereo frames at `output_rate` Hz, overwriting `out`.
    pub fn mix(&mut self, out: &mut [f32], output_rate: u32) {
        out.fill(0.0);
        if output_rate == 0 {
            return;
        }

        for voice in self.voices.iter_mut().filter(|v| v.phase == Phase::Playing) {
            let Some(sound) = self.sounds.get(voice.sound.0 as usize) else {
                *voice = VoiceState::IDLE;
                continue;
            };
            let len = sound.frames();
            if len == 0 {
                *voice = VoiceState::IDLE;
                continue;
            }
            let step = sound.sample_rate() as f64 / output_rate as f64;

            for frame in out.chunks_exact_mut(2) {
                if voice.position >= len as f64 {
                    if voice.looping {
                        voice.position %= len as f64;
                    } else {
                        *voice = VoiceState::IDLE;
                        break;
                    }
                }

                let index = voice.position as usize;
                let frac = (voice.position - index as f64) as f32;
                let next = if index + 1 < len {
                    index + 1
                } else if voice.looping {
                    0
                } else {
                    index
                };
                let (l0, r0) = sound.frame(index);
                let (l1, r1) = sound.frame(next);

                frame[0] += l0 + (l1 - l0) * frac;
                frame[1] += r0 + (r1 - r0) * frac;
                voice.position += step;
            }

            // A one-shot that ended exactly on the buffer boundary.
            if voice.phase == Phase::Playing && !voice.looping && voice.position >= len as f64 {
                *voice = VoiceState::IDLE;
            }
        }

        for s in out.iter_mut() {
            *s = s.clamp(-1.0, 1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixer_with(frames: &[(f32, f32)], rate: u32) -> (Mixer, SoundId) {
        let mut m = Mixer::new(2);
        let id = m.add_sound(Sound::from_frames(frames, rate));
        (m, id)
    }

    fn mix(m: &mut Mixer, frames: usize, rate: u32) -> Vec<f32> {
        let mut out = vec![9.0; frames * 2];
        m.mix(&mut out, rate);
        out
    }

    // ── voice allocation ──────────────────────────────────────────────────

    #[test]
    fn play_uses_first_idle_voice_and_reports_exhaustion() {
        let (mut m, id) = mixer_with(&[(0.1, 0.1)], 100);
        assert_eq!(m.play(id, false), Some(Voice(0)));
        assert_eq!(m.play(id, true), Some(Voice(1)));
        assert_eq!(m.play(id, false), None);

        m.stop(Voice(0));
        assert_eq!(m.play(id, false), Some(Voice(0)));
    }

    #[test]
    fn unknown_sound_does_not_start() {
        let mut m = Mixer::new(2);
        assert_eq!(m.play(SoundId(3), false), None);
    }

    // ── playback ──────────────────────────────────────────────────────────

    #[test]
    fn one_shot_plays_then_goes_idle() {
        let (mut m, id) = mixer_with(&[(0.5, -0.5), (0.25, -0.25)], 100);
        let v = m.play(id, false).unwrap();

        let out = mix(&mut m, 4, 100);
        assert_eq!(out, vec![0.5, -0.5, 0.25, -0.25, 0.0, 0.0, 0.0, 0.0]);
        assert!(!m.is_playing(v));
    }

    #[test]
    fn one_shot_ending_on_buffer_boundary_goes_idle() {
        let (mut m, id) = mixer_with(&[(0.5, 0.5), (0.5, 0.5)], 100);
        let v = m.play(id, false).unwrap();
        mix(&mut m, 2, 100);
        assert!(!m.is_playing(v));
    }

    #[test]
    fn looping_voice_wraps() {
        let (mut m, id) = mixer_with(&[(0.5, 0.5), (0.25, 0.25)], 100);
        let v = m.play(id, true).unwrap();

        let out = mix(&mut m, 5, 100);
        let left: Vec<f32> = out.iter().step_by(2).copied().collect();
        assert_eq!(left, vec![0.5, 0.25, 0.5, 0.25, 0.5]);
        assert!(m.is_playing(v));
        assert!(m.is_looping(v));
    }

    #[test]
    fn source_rate_is_resampled() {
        // Half-rate source: every source frame spans two output frames.
        let (mut m, id) = mixer_with(&[(0.0, 0.0), (1.0, 1.0)], 50);
        m.play(id, false).unwrap();
        let out = mix(&mut m, 3, 100);
        let left: Vec<f32> = out.iter().step_by(2).copied().collect();
        assert_eq!(left, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn voices_sum_and_clip() {
        let (mut m, id) = mixer_with(&[(0.75, -0.75)], 100);
        m.play(id, false).unwrap();
        m.play(id, false).unwrap();
        let out = mix(&mut m, 1, 100);
        assert_eq!(out, vec![1.0, -1.0]);
    }

    // ── pause / resume / stop ─────────────────────────────────────────────

    #[test]
    fn paused_voice_holds_position() {
        let (mut m, id) = mixer_with(&[(0.1, 0.1), (0.2, 0.2), (0.3, 0.3)], 100);
        let v = m.play(id, false).unwrap();
        mix(&mut m, 1, 100);

        m.pause(v);
        assert!(!m.is_playing(v));
        assert_eq!(mix(&mut m, 2, 100), vec![0.0; 4]);

        m.resume(v);
        assert_eq!(mix(&mut m, 1, 100), vec![0.2, 0.2]);
    }

    #[test]
    fn pause_all_pauses_and_resume_all_resumes() {
        let (mut m, id) = mixer_with(&[(0.1, 0.1); 8], 100);
        let a = m.play(id, false).unwrap();
        let b = m.play(id, true).unwrap();

        m.pause_all();
        assert!(!m.is_playing(a) && !m.is_playing(b));
        assert!(m.is_looping(b), "paused voice keeps its loop flag");

        m.resume_all();
        assert!(m.is_playing(a) && m.is_playing(b));
    }

    #[test]
    fn stop_all_frees_every_voice() {
        let (mut m, id) = mixer_with(&[(0.1, 0.1)], 100);
        let a = m.play(id, true).unwrap();
        m.stop_all();
        assert!(!m.is_playing(a));
        assert!(!m.is_looping(a));
        assert_eq!(m.play(id, false), Some(Voice(0)));
    }

    #[test]
    fn out_of_range_voice_is_ignored() {
        let (mut m, _) = mixer_with(&[(0.1, 0.1)], 100);
        m.pause(Voice(99));
        m.stop(Voice(99));
        assert!(!m.is_playing(Voice(99)));
    }
}
