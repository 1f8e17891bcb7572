//! Audio playback and analysis configuration.

use std::ops::Range;

/// FFT analysis configuration with frequency band mappings
#[derive(Debug, Clone)]
pub struct FFTConfig {
    /// Audio sample rate the analysis assumes (Hz)
    /// Overwritten with the output device rate once the stream is open
    pub sample_rate_hz: usize,

    /// FFT window size (must be power of 2)
    pub fft_size: usize,

    /// FFT update interval (milliseconds)
    /// 50 = 20 Hz update rate
    pub update_interval_ms: u64,

    /// Bass frequency range (Hz)
    pub bass_range_hz: (f32, f32),

    /// Mid frequency range (Hz)
    pub mid_range_hz: (f32, f32),

    /// High frequency range (Hz)
    pub high_range_hz: (f32, f32),
}

impl Default for FFTConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 44100,
            fft_size: 1024,
            update_interval_ms: 50,
            bass_range_hz: (20.0, 200.0),
            mid_range_hz: (200.0, 1000.0),
            high_range_hz: (1000.0, 4000.0),
        }
    }
}

impl FFTConfig {
    /// Convert frequency (Hz) to FFT bin index
    pub fn hz_to_bin(&self, hz: f32) -> usize {
        ((hz * self.fft_size as f32) / self.sample_rate_hz as f32) as usize
    }

    /// Get FFT bin range for bass frequencies
    pub fn bass_bins(&self) -> Range<usize> {
        self.band_bins(self.bass_range_hz)
    }

    /// Get FFT bin range for mid frequencies
    pub fn mid_bins(&self) -> Range<usize> {
        self.band_bins(self.mid_range_hz)
    }

    /// Get FFT bin range for high frequencies
    pub fn high_bins(&self) -> Range<usize> {
        self.band_bins(self.high_range_hz)
    }

    // Never empty, never past Nyquist.
    fn band_bins(&self, (lo, hi): (f32, f32)) -> Range<usize> {
        let nyquist = self.fft_size / 2;
        let start = self.hz_to_bin(lo).min(nyquist - 1);
        let end = self.hz_to_bin(hi).clamp(start + 1, nyquist);
        start..end
    }

    /// Validate configuration (FFT size must be power of 2, etc.)
    pub fn validate(&self) -> Result<(), String> {
        if !self.fft_size.is_power_of_two() || self.fft_size < 4 {
            return Err(format!(
                "FFT size must be a power of 2 (>= 4), got {}",
                self.fft_size
            ));
        }
        if self.sample_rate_hz == 0 {
            return Err("Sample rate must be > 0".to_string());
        }
        Ok(())
    }
}

/// Playback policy knobs shared by the live scenes
#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    /// Master volume for the flame scene at startup (0.0 - 1.0)
    pub flame_initial_volume: f32,

    /// Master volume for the orb scene (0.0 - 1.0)
    /// The orb plays every clip at unity gain
    pub orb_volume: f32,

    /// Volume change per PageUp/PageDown press
    pub volume_step: f32,

    /// Clip length in one-second mode (seconds)
    pub one_shot_seconds: f32,

    /// Output hard limiter (absolute sample value)
    pub output_limit: f32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            flame_initial_volume: 0.5,
            orb_volume: 1.0,
            volume_step: 0.2,
            one_shot_seconds: 1.0,
            output_limit: 1.0,
        }
    }
}
