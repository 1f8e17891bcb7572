//! Command-line argument parsing.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::keymap::{Element, SoundLibrary};
use crate::palette::Rgb;
use crate::params::{RecordingConfig, RenderConfig};
use crate::scene::SceneKind;
use crate::tone;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "flamekeys")]
#[command(about = "Flame-test colours as a playable keyboard instrument", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open the live scene and play flame sounds from the keyboard
    Play(PlayArgs),
    /// Turn flame zone colours into tone WAV files
    Tone(ToneArgs),
}

#[derive(Args, Debug)]
pub struct PlayArgs {
    /// Visual scene
    #[arg(long, value_enum, default_value = "flame")]
    pub scene: SceneKind,

    /// Directory holding the per-key WAV files
    #[arg(long, value_name = "DIR", default_value = "sounds")]
    pub assets: PathBuf,

    /// Sound file name pattern ({element} and {zone} are substituted)
    #[arg(long, value_name = "PATTERN", default_value = SoundLibrary::DEFAULT_TEMPLATE)]
    pub template: String,

    /// Window width (pixels)
    #[arg(long, value_name = "PIXELS")]
    pub width: Option<u32>,

    /// Window height (pixels)
    #[arg(long, value_name = "PIXELS")]
    pub height: Option<u32>,

    /// Record frames and audio (duration in seconds)
    #[arg(long, value_name = "SECONDS")]
    pub record: Option<f32>,

    /// Seed for particle placement
    #[arg(long)]
    pub seed: Option<u64>,
}

impl PlayArgs {
    pub fn sound_library(&self) -> SoundLibrary {
        SoundLibrary::new(&self.assets, self.template.clone())
    }

    pub fn render_config(&self) -> RenderConfig {
        let defaults = RenderConfig::default();
        RenderConfig {
            window_width: self.width.unwrap_or(defaults.window_width).max(1),
            window_height: self.height.unwrap_or(defaults.window_height).max(1),
        }
    }

    /// Create recording configuration (and its directories) if recording
    pub fn create_recording_config(&self) -> anyhow::Result<Option<RecordingConfig>> {
        let Some(duration) = self.record else {
            return Ok(None);
        };
        if !(duration > 0.0) {
            bail!("Recording duration must be positive, got {}", duration);
        }
        let config = RecordingConfig::new(duration);
        std::fs::create_dir_all(config.frames_dir()).with_context(|| {
            format!("Failed to create frames directory {}", config.frames_dir().display())
        })?;
        Ok(Some(config))
    }
}

#[derive(Args, Debug)]
pub struct ToneArgs {
    /// Flame photograph to sample
    #[arg(long, value_name = "PATH", required_unless_present = "rgb")]
    pub image: Option<PathBuf>,

    /// Pixel to sample, in zone order outer, inner, core
    #[arg(long, value_name = "X,Y", value_parser = parse_point, requires = "image")]
    pub pick: Vec<(u32, u32)>,

    /// Colour given directly, in zone order outer, inner, core
    #[arg(long, value_name = "R,G,B", value_parser = parse_rgb, conflicts_with = "image")]
    pub rgb: Vec<Rgb>,

    /// Name the files for this element's sound library (e.g. Na)
    #[arg(long, value_name = "SYMBOL", value_parser = parse_element)]
    pub element: Option<Element>,

    /// Output directory
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub out: PathBuf,
}

impl ToneArgs {
    /// Colours to convert, picked from the image or given directly
    pub fn colors(&self) -> anyhow::Result<Vec<Rgb>> {
        let colors = match &self.image {
            Some(path) => {
                if self.pick.is_empty() {
                    bail!("--image needs at least one --pick X,Y");
                }
                let image = tone::load_image(path)?;
                tone::pick_colors(&image, &self.pick)?
            }
            None => self.rgb.clone(),
        };
        if colors.len() > 3 {
            bail!("At most 3 colours (outer, inner, core), got {}", colors.len());
        }
        Ok(colors)
    }
}

fn parse_numbers<const N: usize>(s: &str) -> Result<[u32; N], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != N {
        return Err(format!("expected {} comma-separated numbers, got '{}'", N, s));
    }
    let mut out = [0; N];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = part
            .parse()
            .map_err(|_| format!("'{}' is not a non-negative integer", part))?;
    }
    Ok(out)
}

fn parse_point(s: &str) -> Result<(u32, u32), String> {
    let [x, y] = parse_numbers::<2>(s)?;
    Ok((x, y))
}

fn parse_rgb(s: &str) -> Result<Rgb, String> {
    let [r, g, b] = parse_numbers::<3>(s)?;
    if r > 255 || g > 255 || b > 255 {
        return Err(format!("colour components must be 0-255, got '{}'", s));
    }
    Ok(Rgb::from_u8([r as u8, g as u8, b as u8]))
}

fn parse_element(s: &str) -> Result<Element, String> {
    Element::from_symbol(s).ok_or_else(|| {
        let known: Vec<&str> = Element::ALL.iter().map(|e| e.symbol()).collect();
        format!("unknown element '{}' (expected one of {})", s, known.join(", "))
    })
}
