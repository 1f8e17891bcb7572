//! FFT analysis of the live mix into bass/mid/high bands.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f32::consts::PI;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use super::AudioBands;
use crate::params::FFTConfig;

/// Spawn FFT analysis thread; it exits once `running` is cleared
pub fn spawn_fft_thread(
    config: FFTConfig,
    fft_buffer: Arc<Mutex<Vec<f32>>>,
    audio_bands: Arc<Mutex<AudioBands>>,
    running: Arc<AtomicBool>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(config.fft_size);
        let mut scratch = vec![Complex::new(0.0, 0.0); config.fft_size];

        while running.load(Ordering::Relaxed) {
            thread::sleep(Duration::from_millis(config.update_interval_ms));

            let mut fft_buf = fft_buffer.lock().unwrap();
            if fft_buf.len() < config.fft_size {
                continue;
            }

            let bands = compute_bands(&fft_buf[..config.fft_size], &config, &*fft, &mut scratch);
            *audio_bands.lock().unwrap() = bands;

            // 50% overlap (drain half the buffer)
            fft_buf.drain(0..config.fft_size / 2);
        }
    })
}

/// Windowed FFT of one analysis frame, averaged per band
///
/// Magnitudes are scaled by the Hann window's coherent gain (`fft_size / 4`),
/// so a bin centred on a sine of amplitude A reads A at any FFT size.
/// `samples` and `scratch` must both be `config.fft_size` long.
pub fn compute_bands(
    samples: &[f32],
    config: &FFTConfig,
    fft: &dyn Fft<f32>,
    scratch: &mut [Complex<f32>],
) -> AudioBands {
    let size = config.fft_size;
    for (i, (slot, &sample)) in scratch.iter_mut().zip(samples).enumerate() {
        *slot = Complex::new(sample * hann_window(i, size), 0.0);
    }
    fft.process(scratch);

    let scale = 4.0 / size as f32;
    let band_mean = |bins: std::ops::Range<usize>| {
        let len = bins.len().max(1) as f32;
        scratch[bins].iter().map(|c| c.norm()).sum::<f32>() * scale / len
    };

    AudioBands {
        low: band_mean(config.bass_bins()),
        mid: band_mean(config.mid_bins()),
        high: band_mean(config.high_bins()),
    }
}

/// Hann window function for FFT analysis
fn hann_window(index: usize, size: usize) -> f32 {
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyse(freq_hz: f32) -> AudioBands {
        analyse_at(freq_hz, 1.0, FFTConfig::default())
    }

    fn analyse_at(freq_hz: f32, amplitude: f32, config: FFTConfig) -> AudioBands {
        let samples: Vec<f32> = (0..config.fft_size)
            .map(|i| amplitude * (2.0 * PI * freq_hz * i as f32 / config.sample_rate_hz as f32).sin())
            .collect();

        let fft = FftPlanner::<f32>::new().plan_fft_forward(config.fft_size);
        let mut scratch = vec![Complex::new(0.0, 0.0); config.fft_size];
        compute_bands(&samples, &config, &*fft, &mut scratch)
    }

    #[test]
    fn test_fft_config_hz_to_bin() {
        let config = FFTConfig::default();

        // At 44100 Hz sample rate and 1024 FFT size:
        // Bin resolution = 44100 / 1024 ≈ 43.07 Hz per bin
        assert_eq!(config.hz_to_bin(0.0), 0);
        assert_eq!(config.hz_to_bin(43.0), 0);
        assert_eq!(config.hz_to_bin(43.07), 1);
        assert_eq!(config.hz_to_bin(100.0), 2); // ~100 Hz ≈ bin 2
    }

    #[test]
    fn test_fft_config_band_ranges() {
        let config = FFTConfig::default();

        let bass = config.bass_bins();
        let mid = config.mid_bins();
        let high = config.high_bins();

        assert!(!bass.is_empty() && bass.end <= 10);
        assert!(mid.start >= bass.end && mid.end <= 50);
        assert!(high.start >= mid.end && high.end <= 200);
    }

    #[test]
    fn test_hann_window() {
        let size = 1024;

        // Hann window should be 0 at edges, 1 at center
        assert!((hann_window(0, size) - 0.0).abs() < 0.01);
        assert!((hann_window(size - 1, size) - 0.0).abs() < 0.01);
        assert!((hann_window(size / 2, size) - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_bands_follow_tone_frequency() {
        let bass = analyse(110.0);
        assert!(bass.low > bass.mid && bass.low > bass.high);

        let treble = analyse(2500.0);
        assert!(treble.high > treble.low && treble.high > treble.mid);
    }

    #[test]
    fn test_bands_are_per_unit_amplitude() {
        // Full-scale 110 Hz sine spreads over the four bass bins
        let full = analyse(110.0);
        assert!(full.low > 0.3 && full.low < 0.7, "low = {}", full.low);

        let half = analyse_at(110.0, 0.5, FFTConfig::default());
        assert!((half.low / full.low - 0.5).abs() < 1e-3);

        // Doubling the window keeps the peak bin at the same level
        let config = FFTConfig {
            fft_size: 2048,
            ..FFTConfig::default()
        };
        let bin_hz = config.sample_rate_hz as f32 / config.fft_size as f32;
        let on_bin = analyse_at(bin_hz * 4.0, 1.0, config.clone());
        let bins = config.bass_bins();
        let expected = 2.0 / bins.len() as f32; // peak 1.0 plus two 0.5 side bins
        assert!((on_bin.low - expected).abs() < 0.05, "low = {}", on_bin.low);
    }

    #[test]
    fn test_silence_has_no_energy() {
        let bands = analyse(0.0);
        assert_eq!(bands, AudioBands::default());
    }
}
