//! Flame colour → tone conversion.
//!
//! Each sampled flame zone colour is reduced to its dominant wavelength,
//! mapped to a pitch and rendered as a short WAV file the live scenes can
//! play. A chart of the whole conversion is saved next to the files.

pub mod chart;
pub mod picker;
pub mod synth;
pub mod wavelength;

use anyhow::{bail, Context};
use log::debug;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::keymap::{Element, FlameKey, SoundLibrary, Zone};
use crate::palette::Rgb;
use crate::params::ToneConfig;

pub use chart::{analysis_path, save_chart};
pub use picker::{load_image, pick_colors};
pub use synth::{render_tone, write_wav};
pub use wavelength::{dominant_wavelength, frequency_for, DominantWavelength};

/// One converted zone
#[derive(Debug, Clone)]
pub struct ZoneTone {
    pub zone: Zone,
    pub color: Rgb,
    pub wavelength: DominantWavelength,
    pub frequency_hz: f32,
    pub path: PathBuf,
}

impl fmt::Display for ZoneTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.color.rounded();
        write!(f, "{:<12} RGB({:3}, {:3}, {:3})  ", self.zone.label(), r, g, b)?;
        match self.wavelength {
            DominantWavelength::Spectral(nm) => write!(f, "{:6.1} nm", nm)?,
            DominantWavelength::Complementary(nm) => write!(f, "{:6.1} nm (complementary)", nm)?,
            DominantWavelength::Achromatic => write!(f, "   n/a   ")?,
        }
        write!(f, "  {:6.1} Hz  → {}", self.frequency_hz, self.path.display())
    }
}

/// Output file for a zone: library naming when an element is given,
/// `flame_sound_<zone>.wav` otherwise
pub fn output_path(out_dir: &Path, element: Option<Element>, zone: Zone) -> PathBuf {
    match element {
        Some(element) => SoundLibrary::new(out_dir, SoundLibrary::DEFAULT_TEMPLATE)
            .path_for(FlameKey::new(element, zone)),
        None => out_dir.join(format!("flame_sound_{}.wav", zone.name())),
    }
}

/// Convert up to three colours (outer, inner, core) into tone files and
/// an analysis chart
pub fn convert(
    colors: &[Rgb],
    element: Option<Element>,
    out_dir: &Path,
    config: &ToneConfig,
) -> anyhow::Result<Vec<ZoneTone>> {
    if colors.is_empty() {
        bail!("No colours to convert");
    }
    if colors.len() > Zone::ALL.len() {
        bail!(
            "At most {} colours (outer, inner, core), got {}",
            Zone::ALL.len(),
            colors.len()
        );
    }

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let tones = Zone::ALL
        .iter()
        .zip(colors)
        .map(|(&zone, &color)| {
            let wavelength = dominant_wavelength(color);
            let frequency_hz = frequency_for(wavelength);
            let path = output_path(out_dir, element, zone);

            write_wav(&path, &render_tone(frequency_hz, config), config.sample_rate_hz)?;

            let tone = ZoneTone {
                zone,
                color,
                wavelength,
                frequency_hz,
                path,
            };
            debug!("{}", tone);
            Ok(tone)
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let chart = save_chart(&tones, out_dir)?;
    debug!("Analysis chart → {}", chart.display());
    Ok(tones)
}
