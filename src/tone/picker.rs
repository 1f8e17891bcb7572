//! Colour picking from flame photographs.

use anyhow::{bail, Context};
use image::RgbImage;
use std::path::Path;

use crate::palette::Rgb;

pub fn load_image(path: &Path) -> anyhow::Result<RgbImage> {
    let img = image::open(path).with_context(|| format!("Failed to load image {}", path.display()))?;
    Ok(img.to_rgb8())
}

/// Colours at the given pixel coordinates, in order
pub fn pick_colors(image: &RgbImage, points: &[(u32, u32)]) -> anyhow::Result<Vec<Rgb>> {
    points
        .iter()
        .map(|&(x, y)| {
            if x >= image.width() || y >= image.height() {
                bail!(
                    "Pixel ({}, {}) is outside the {}x{} image",
                    x,
                    y,
                    image.width(),
                    image.height()
                );
            }
            Ok(Rgb::from_u8(image.get_pixel(x, y).0))
        })
        .collect()
}
