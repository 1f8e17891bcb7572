//! Parameter definitions with units and documented semantics.
//!
//! All magic numbers are extracted here with:
//! - Units (pixels, radians, seconds, Hz, etc.)
//! - Documented ranges and meanings

mod audio;
mod render;
mod scene;
mod tone;

// Re-export all types
pub use audio::{FFTConfig, PlaybackConfig};
pub use render::{RecordingConfig, RenderConfig};
pub use scene::{FlameParams, OrbParams};
pub use tone::ToneConfig;
