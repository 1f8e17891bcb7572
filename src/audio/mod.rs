//! Sound playback and live analysis.
//!
//! Clips are decoded from WAV files on the UI thread, mixed in the cpal
//! output callback, and the mix is analysed by FFT on a background thread
//! to extract frequency bands for the audio-reactive visuals.

mod clip;
mod fft;
mod mixer;
mod system;
mod transport;

// Re-export public types
pub use clip::{Clip, ClipCache};
pub use fft::{compute_bands, spawn_fft_thread};
pub use mixer::Mixer;
pub use system::AudioSystem;
pub use transport::{PlayRequest, Transport};

/// Mean band magnitudes in units of sine amplitude (shared between audio and
/// rendering threads)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AudioBands {
    pub low: f32,  // Bass (20-200 Hz)
    pub mid: f32,  // Mids (200-1000 Hz)
    pub high: f32, // Highs (1000-4000 Hz)
}
