//! Analysis chart for a conversion: colours, wavelengths and pitches.
//!
//! Three stacked panels with one column per zone (outer, inner, core):
//! the picked colour as a swatch, the dominant wavelength as a bar
//! (purple when complementary, a grey stub when achromatic) and the tone
//! frequency as a bar.

use glam::Vec2;
use std::path::{Path, PathBuf};

use super::{DominantWavelength, ZoneTone};
use crate::canvas::Canvas;
use crate::keymap::Zone;
use crate::palette::Rgb;

pub const ANALYSIS_FILE: &str = "flame_sound_analysis.png";

/// Chart width (pixels)
pub const CHART_WIDTH: u32 = 600;
/// Height of each of the three panels (pixels)
pub const PANEL_HEIGHT: u32 = 150;

const COLUMN_WIDTH: f32 = CHART_WIDTH as f32 / 3.0;
const BAR_HALF_WIDTH: f32 = 50.0;
const MARGIN: f32 = 15.0;

/// Full bar heights
const WAVELENGTH_SCALE_NM: f32 = 780.0;
const FREQUENCY_SCALE_HZ: f32 = 880.0;

const BACKGROUND: Rgb = Rgb::WHITE;
const AXIS: Rgb = Rgb {
    r: 160.0,
    g: 160.0,
    b: 160.0,
};
const SPECTRAL_BAR: Rgb = Rgb {
    r: 0.0,
    g: 128.0,
    b: 0.0,
};
const COMPLEMENTARY_BAR: Rgb = Rgb {
    r: 128.0,
    g: 0.0,
    b: 128.0,
};
const FREQUENCY_BAR: Rgb = Rgb {
    r: 255.0,
    g: 165.0,
    b: 0.0,
};

pub fn analysis_path(out_dir: &Path) -> PathBuf {
    out_dir.join(ANALYSIS_FILE)
}

/// Horizontal span of a zone's column content
pub fn column_span(zone: Zone) -> (f32, f32) {
    let center = COLUMN_WIDTH * (zone as usize as f32 + 0.5);
    (center - BAR_HALF_WIDTH, center + BAR_HALF_WIDTH)
}

pub fn render_chart(tones: &[ZoneTone]) -> Canvas {
    let mut canvas = Canvas::new(CHART_WIDTH, PANEL_HEIGHT * 3);
    canvas.clear(BACKGROUND);

    for panel in 1..3 {
        let y = (panel * PANEL_HEIGHT) as f32;
        canvas.draw_line(
            Vec2::new(0.0, y),
            Vec2::new(CHART_WIDTH as f32, y),
            1.0,
            AXIS,
            1.0,
        );
    }

    for tone in tones {
        let (x0, x1) = column_span(tone.zone);

        // Colour swatch
        canvas.fill_rect(
            Vec2::new(x0, MARGIN),
            Vec2::new(x1, PANEL_HEIGHT as f32 - MARGIN),
            tone.color,
            1.0,
        );

        // Wavelength
        let (bar, fraction) = match tone.wavelength {
            DominantWavelength::Spectral(nm) => (SPECTRAL_BAR, nm / WAVELENGTH_SCALE_NM),
            DominantWavelength::Complementary(nm) => (COMPLEMENTARY_BAR, nm / WAVELENGTH_SCALE_NM),
            DominantWavelength::Achromatic => (AXIS, 0.0),
        };
        draw_bar(&mut canvas, 1, (x0, x1), fraction, bar);

        // Frequency
        draw_bar(
            &mut canvas,
            2,
            (x0, x1),
            tone.frequency_hz / FREQUENCY_SCALE_HZ,
            FREQUENCY_BAR,
        );
    }

    canvas
}

/// Bar rising from the baseline of `panel`; never shorter than a 3 px stub
fn draw_bar(canvas: &mut Canvas, panel: u32, (x0, x1): (f32, f32), fraction: f32, color: Rgb) {
    let baseline = ((panel + 1) * PANEL_HEIGHT) as f32 - MARGIN;
    let full = PANEL_HEIGHT as f32 - 2.0 * MARGIN;
    let height = (fraction.clamp(0.0, 1.0) * full).max(3.0);
    canvas.fill_rect(
        Vec2::new(x0, baseline - height),
        Vec2::new(x1, baseline),
        color,
        1.0,
    );
    canvas.draw_line(
        Vec2::new(x0 - 10.0, baseline),
        Vec2::new(x1 + 10.0, baseline),
        1.0,
        AXIS,
        1.0,
    );
}

pub fn save_chart(tones: &[ZoneTone], out_dir: &Path) -> anyhow::Result<PathBuf> {
    let path = analysis_path(out_dir);
    render_chart(tones).save_png(&path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(zone: Zone, rgb: [u8; 3], wavelength: DominantWavelength, frequency_hz: f32) -> ZoneTone {
        ZoneTone {
            zone,
            color: Rgb::from_u8(rgb),
            wavelength,
            frequency_hz,
            path: PathBuf::new(),
        }
    }

    fn center_x(zone: Zone) -> u32 {
        let (x0, x1) = column_span(zone);
        ((x0 + x1) / 2.0) as u32
    }

    #[test]
    fn test_swatches_in_zone_columns() {
        let tones = [
            tone(Zone::Outer, [200, 30, 40], DominantWavelength::Spectral(610.0), 300.0),
            tone(Zone::Inner, [20, 40, 220], DominantWavelength::Spectral(465.0), 700.0),
        ];
        let chart = render_chart(&tones);
        assert_eq!((chart.width(), chart.height()), (600, 450));

        let y = PANEL_HEIGHT / 2;
        assert_eq!(chart.pixel(center_x(Zone::Outer), y).unwrap().rgb(), [200, 30, 40]);
        assert_eq!(chart.pixel(center_x(Zone::Inner), y).unwrap().rgb(), [20, 40, 220]);
        // No core colour given
        assert_eq!(chart.pixel(center_x(Zone::Core), y).unwrap().rgb(), [255, 255, 255]);
    }

    #[test]
    fn test_bars_scale_and_mark_complementary() {
        let tones = [
            tone(Zone::Outer, [255, 0, 0], DominantWavelength::Spectral(612.0), 300.0),
            tone(Zone::Inner, [255, 0, 255], DominantWavelength::Complementary(550.0), 800.0),
            tone(Zone::Core, [128, 128, 128], DominantWavelength::Achromatic, 440.0),
        ];
        let chart = render_chart(&tones);

        let just_above = |panel: u32, zone: Zone| {
            chart
                .pixel(center_x(zone), (panel + 1) * PANEL_HEIGHT - MARGIN as u32 - 2)
                .unwrap()
                .rgb()
        };
        assert_eq!(just_above(1, Zone::Outer), [0, 128, 0]);
        assert_eq!(just_above(1, Zone::Inner), [128, 0, 128]);
        assert_eq!(just_above(1, Zone::Core), [160, 160, 160]);
        assert_eq!(just_above(2, Zone::Core), [255, 165, 0]);

        // 800 Hz bar reaches higher than the 300 Hz one
        let y = 2 * PANEL_HEIGHT + 2 * MARGIN as u32;
        assert_eq!(chart.pixel(center_x(Zone::Inner), y).unwrap().rgb(), [255, 165, 0]);
        assert_eq!(chart.pixel(center_x(Zone::Outer), y).unwrap().rgb(), [255, 255, 255]);
    }
}
