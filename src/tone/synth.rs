//! Harmonic tone synthesis and WAV output.

use anyhow::Context;
use std::f32::consts::TAU;
use std::path::Path;

use crate::params::ToneConfig;

/// Render a tone at `freq_hz`: harmonic stack, attack/release envelope,
/// peak-normalised to `config.peak`
pub fn render_tone(freq_hz: f32, config: &ToneConfig) -> Vec<f32> {
    let total = config.total_samples();
    let rate = config.sample_rate_hz as f32;
    let attack = (config.attack_secs * rate) as usize;
    let release = (config.release_secs * rate) as usize;

    let mut samples: Vec<f32> = (0..total)
        .map(|i| {
            let t = i as f32 / rate;
            let tone: f32 = config
                .harmonics
                .iter()
                .enumerate()
                .map(|(n, amp)| amp * (TAU * freq_hz * (n + 1) as f32 * t).sin())
                .sum();
            tone * envelope(i, total, attack, release)
        })
        .collect();

    let max = samples.iter().fold(0.0f32, |m, s| m.max(s.abs()));
    if max > 0.0 {
        let gain = config.peak / max;
        samples.iter_mut().for_each(|s| *s *= gain);
    }
    samples
}

/// Linear ramps; release wins where the two overlap
fn envelope(i: usize, total: usize, attack: usize, release: usize) -> f32 {
    let mut level = 1.0;
    if i < attack {
        level = i as f32 / attack as f32;
    }
    let from_end = total - 1 - i;
    if from_end < release {
        level = level.min(from_end as f32 / release as f32);
    }
    level
}

/// Write samples in [-1, 1] as 16-bit mono PCM
pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) -> anyhow::Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for &sample in samples {
        let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer.write_sample(value)?;
    }
    writer
        .finalize()
        .with_context(|| format!("Failed to finalize {}", path.display()))?;
    Ok(())
}
