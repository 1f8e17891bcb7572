//! Colour-to-tone synthesis parameters.

/// Shape of the tones written by the `tone` command
#[derive(Debug, Clone)]
pub struct ToneConfig {
    /// Output sample rate (Hz)
    pub sample_rate_hz: u32,

    /// Tone length (seconds)
    pub duration_secs: f32,

    /// Amplitude of harmonic n+1 relative to the fundamental
    /// [1.0, 0.5, 0.25, 0.125] = four partials halving in level
    pub harmonics: Vec<f32>,

    /// Linear fade-in (seconds)
    pub attack_secs: f32,

    /// Linear fade-out at the end (seconds)
    pub release_secs: f32,

    /// Peak level after normalisation (0.0-1.0)
    pub peak: f32,
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 44100,
            duration_secs: 3.0,
            harmonics: vec![1.0, 0.5, 0.25, 0.125],
            attack_secs: 0.05,
            release_secs: 0.2,
            peak: 0.9,
        }
    }
}

impl ToneConfig {
    pub fn total_samples(&self) -> usize {
        (self.duration_secs * self.sample_rate_hz as f32).round() as usize
    }
}
