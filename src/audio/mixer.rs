//! Voice mixer run inside the audio output callback.

use std::collections::HashMap;
use std::sync::Arc;

use super::Clip;
use crate::keymap::FlameKey;

/// One playing instance of a clip
struct Voice {
    clip: Arc<Clip>,
    /// Read position in clip frames (fractional while resampling)
    position: f64,
    rate: f32,
    gain: f32,
    /// Output frames left before a forced stop (one-second mode)
    frames_left: Option<u64>,
}

impl Voice {
    /// Clip frames advanced per output frame
    fn step(&self, output_rate: u32) -> f64 {
        self.clip.sample_rate() as f64 / output_rate as f64 * self.rate as f64
    }

    fn finished(&self) -> bool {
        self.frames_left == Some(0) || self.position as usize >= self.clip.frames()
    }

    /// Linearly interpolated sample at the current position
    fn sample(&self, channel: usize) -> f32 {
        let i = self.position.floor() as usize;
        let frac = (self.position - i as f64) as f32;
        let a = self.clip.sample(i, channel);
        let b = if i + 1 < self.clip.frames() {
            self.clip.sample(i + 1, channel)
        } else {
            a
        };
        a + (b - a) * frac
    }
}

/// Mixes at most one voice per key into interleaved output buffers
pub struct Mixer {
    output_rate: u32,
    channels: u16,
    limit: f32,
    voices: HashMap<FlameKey, Voice>,
}

impl Mixer {
    pub fn new(output_rate: u32, channels: u16, limit: f32) -> Self {
        Self {
            output_rate,
            channels: channels.max(1),
            limit,
            voices: HashMap::new(),
        }
    }

    /// Start `clip` from the top, cutting off whatever `key` was playing
    pub fn play(&mut self, key: FlameKey, clip: Arc<Clip>, rate: f32, gain: f32, max_seconds: Option<f32>) {
        let frames_left = max_seconds.map(|s| (s.max(0.0) * self.output_rate as f32).round() as u64);
        self.voices.insert(
            key,
            Voice {
                clip,
                position: 0.0,
                rate,
                gain,
                frames_left,
            },
        );
    }

    /// Returns whether a voice was playing
    pub fn stop(&mut self, key: FlameKey) -> bool {
        self.voices.remove(&key).is_some()
    }

    /// Change the playback rate of everything currently playing
    pub fn set_rate_all(&mut self, rate: f32) {
        for voice in self.voices.values_mut() {
            voice.rate = rate;
        }
    }

    pub fn is_playing(&self, key: FlameKey) -> bool {
        self.voices.contains_key(&key)
    }

    pub fn active_count(&self) -> usize {
        self.voices.len()
    }

    /// Fill `out` (interleaved, `channels` wide) with the mix
    pub fn render(&mut self, out: &mut [f32]) {
        out.fill(0.0);
        let channels = self.channels as usize;
        let output_rate = self.output_rate;

        for voice in self.voices.values_mut() {
            let step = voice.step(output_rate);
            for frame in out.chunks_exact_mut(channels) {
                if voice.finished() {
                    break;
                }
                for (ch, sample) in frame.iter_mut().enumerate() {
                    *sample += voice.sample(ch) * voice.gain;
                }
                voice.position += step;
                if let Some(left) = voice.frames_left.as_mut() {
                    *left -= 1;
                }
            }
        }
        self.voices.retain(|_, voice| !voice.finished());

        // Safety limiter: hard clip
        for sample in out.iter_mut() {
            *sample = sample.clamp(-self.limit, self.limit);
        }
    }
}
