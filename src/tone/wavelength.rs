//! sRGB colour → CIE 1931 dominant wavelength → audible pitch.

use glam::DVec2;

use crate::palette::Rgb;

/// D65 white point chromaticity (CIE 1931 2°)
pub const WHITE_POINT: DVec2 = DVec2::new(0.3127, 0.3290);

/// Chromaticity distance from white treated as grey (absorbs matrix rounding)
const ACHROMATIC_RADIUS: f64 = 1e-3;

/// CIE 1931 2° spectral locus chromaticities, 380-700 nm in 5 nm steps.
/// Beyond 700 nm the locus does not move (to four decimals).
const SPECTRAL_LOCUS: [(f64, f64, f64); 65] = [
    (380.0, 0.1741, 0.0050),
    (385.0, 0.1740, 0.0050),
    (390.0, 0.1738, 0.0049),
    (395.0, 0.1736, 0.0049),
    (400.0, 0.1733, 0.0048),
    (405.0, 0.1730, 0.0048),
    (410.0, 0.1726, 0.0048),
    (415.0, 0.1721, 0.0048),
    (420.0, 0.1714, 0.0051),
    (425.0, 0.1703, 0.0058),
    (430.0, 0.1689, 0.0069),
    (435.0, 0.1669, 0.0086),
    (440.0, 0.1644, 0.0109),
    (445.0, 0.1611, 0.0138),
    (450.0, 0.1566, 0.0177),
    (455.0, 0.1510, 0.0227),
    (460.0, 0.1440, 0.0297),
    (465.0, 0.1355, 0.0399),
    (470.0, 0.1241, 0.0578),
    (475.0, 0.1096, 0.0868),
    (480.0, 0.0913, 0.1327),
    (485.0, 0.0687, 0.2007),
    (490.0, 0.0454, 0.2950),
    (495.0, 0.0235, 0.4127),
    (500.0, 0.0082, 0.5384),
    (505.0, 0.0039, 0.6548),
    (510.0, 0.0139, 0.7502),
    (515.0, 0.0389, 0.8120),
    (520.0, 0.0743, 0.8338),
    (525.0, 0.1142, 0.8262),
    (530.0, 0.1547, 0.8059),
    (535.0, 0.1929, 0.7816),
    (540.0, 0.2296, 0.7543),
    (545.0, 0.2658, 0.7243),
    (550.0, 0.3016, 0.6923),
    (555.0, 0.3373, 0.6589),
    (560.0, 0.3731, 0.6245),
    (565.0, 0.4087, 0.5896),
    (570.0, 0.4441, 0.5547),
    (575.0, 0.4788, 0.5202),
    (580.0, 0.5125, 0.4866),
    (585.0, 0.5448, 0.4544),
    (590.0, 0.5752, 0.4242),
    (595.0, 0.6029, 0.3965),
    (600.0, 0.6270, 0.3725),
    (605.0, 0.6482, 0.3514),
    (610.0, 0.6658, 0.3340),
    (615.0, 0.6801, 0.3197),
    (620.0, 0.6915, 0.3083),
    (625.0, 0.7006, 0.2993),
    (630.0, 0.7079, 0.2920),
    (635.0, 0.7140, 0.2859),
    (640.0, 0.7190, 0.2809),
    (645.0, 0.7230, 0.2770),
    (650.0, 0.7260, 0.2740),
    (655.0, 0.7283, 0.2717),
    (660.0, 0.7300, 0.2700),
    (665.0, 0.7311, 0.2689),
    (670.0, 0.7320, 0.2680),
    (675.0, 0.7327, 0.2673),
    (680.0, 0.7334, 0.2666),
    (685.0, 0.7340, 0.2660),
    (690.0, 0.7344, 0.2656),
    (695.0, 0.7346, 0.2654),
    (700.0, 0.7347, 0.2653),
];

/// Visible range used for the pitch mapping (nm)
const MIN_WAVELENGTH_NM: f32 = 380.0;
const MAX_WAVELENGTH_NM: f32 = 780.0;

/// Pitch range: A3 to A5 (Hz)
const MIN_FREQ_HZ: f32 = 220.0;
const MAX_FREQ_HZ: f32 = 880.0;

/// Pitch for colours without a usable wavelength: A4
pub const FALLBACK_FREQ_HZ: f32 = 440.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DominantWavelength {
    /// Hue of a spectral light (nm)
    Spectral(f32),
    /// Purple/magenta hue: the wavelength of its complementary colour (nm)
    Complementary(f32),
    /// Grey: no hue
    Achromatic,
}

impl DominantWavelength {
    pub fn nanometers(self) -> Option<f32> {
        match self {
            DominantWavelength::Spectral(nm) | DominantWavelength::Complementary(nm) => Some(nm),
            DominantWavelength::Achromatic => None,
        }
    }
}

/// sRGB (0-255) → CIE xy chromaticity, D65
pub fn chromaticity(rgb: Rgb) -> Option<DVec2> {
    let r = srgb_decode(rgb.r as f64 / 255.0);
    let g = srgb_decode(rgb.g as f64 / 255.0);
    let b = srgb_decode(rgb.b as f64 / 255.0);

    let x = 0.4124 * r + 0.3576 * g + 0.1805 * b;
    let y = 0.2126 * r + 0.7152 * g + 0.0722 * b;
    let z = 0.0193 * r + 0.1192 * g + 0.9505 * b;

    let sum = x + y + z;
    (sum > 0.0).then(|| DVec2::new(x / sum, y / sum))
}

fn srgb_decode(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

pub fn dominant_wavelength(rgb: Rgb) -> DominantWavelength {
    let Some(xy) = chromaticity(rgb) else {
        return DominantWavelength::Achromatic;
    };
    let dir = xy - WHITE_POINT;
    if dir.length() < ACHROMATIC_RADIUS {
        return DominantWavelength::Achromatic;
    }

    // Cast from the white point through the colour; if the forward ray
    // leaves through the purple line, the hue has no spectral match and
    // the backward ray gives the complementary wavelength
    if let Some(nm) = locus_hit(dir) {
        DominantWavelength::Spectral(nm)
    } else if let Some(nm) = locus_hit(-dir) {
        DominantWavelength::Complementary(nm)
    } else {
        DominantWavelength::Achromatic
    }
}

/// Wavelength where the ray `WHITE_POINT + s * dir` (s > 0) crosses the
/// spectral locus, nearest crossing first
fn locus_hit(dir: DVec2) -> Option<f32> {
    let mut best: Option<(f64, f64)> = None;
    for pair in SPECTRAL_LOCUS.windows(2) {
        let (wl1, x1, y1) = pair[0];
        let (wl2, x2, y2) = pair[1];
        let p1 = DVec2::new(x1, y1);
        let edge = DVec2::new(x2, y2) - p1;

        let denom = cross(dir, edge);
        if denom.abs() < 1e-12 {
            continue;
        }
        let w = p1 - WHITE_POINT;
        let t = cross(w, dir) / denom;
        let s = cross(w, edge) / denom;
        if (0.0..=1.0).contains(&t) && s > 0.0 && best.map_or(true, |(best_s, _)| s < best_s) {
            best = Some((s, wl1 + t * (wl2 - wl1)));
        }
    }
    best.map(|(_, nm)| nm as f32)
}

fn cross(a: DVec2, b: DVec2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Map a wavelength onto two octaves, short wavelengths high
///
/// Log-spaced so equal wavelength steps sound like equal intervals.
pub fn frequency_for(wavelength: DominantWavelength) -> f32 {
    let Some(nm) = wavelength.nanometers() else {
        return FALLBACK_FREQ_HZ;
    };
    if !(MIN_WAVELENGTH_NM..=MAX_WAVELENGTH_NM).contains(&nm) {
        return FALLBACK_FREQ_HZ;
    }
    let normalized = (MAX_WAVELENGTH_NM - nm) / (MAX_WAVELENGTH_NM - MIN_WAVELENGTH_NM);
    MIN_FREQ_HZ * (MAX_FREQ_HZ / MIN_FREQ_HZ).powf(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nm(rgb: [u8; 3]) -> DominantWavelength {
        dominant_wavelength(Rgb::from_u8(rgb))
    }

    #[test]
    fn test_white_and_black_are_achromatic() {
        assert_eq!(nm([255, 255, 255]), DominantWavelength::Achromatic);
        assert_eq!(nm([128, 128, 128]), DominantWavelength::Achromatic);
        assert_eq!(nm([0, 0, 0]), DominantWavelength::Achromatic);
    }

    #[test]
    fn test_primaries() {
        let DominantWavelength::Spectral(red) = nm([255, 0, 0]) else {
            panic!("red should be spectral");
        };
        assert!((605.0..=620.0).contains(&red), "red = {}", red);

        let DominantWavelength::Spectral(green) = nm([0, 255, 0]) else {
            panic!("green should be spectral");
        };
        assert!((540.0..=555.0).contains(&green), "green = {}", green);

        let DominantWavelength::Spectral(blue) = nm([0, 0, 255]) else {
            panic!("blue should be spectral");
        };
        assert!((460.0..=470.0).contains(&blue), "blue = {}", blue);
    }

    #[test]
    fn test_flame_colors() {
        // Sodium yellow
        let DominantWavelength::Spectral(na) = nm([255, 247, 55]) else {
            panic!("yellow should be spectral");
        };
        assert!((570.0..=585.0).contains(&na), "na = {}", na);
    }

    #[test]
    fn test_magenta_is_complementary_green() {
        let DominantWavelength::Complementary(wl) = nm([255, 0, 255]) else {
            panic!("magenta should be complementary");
        };
        assert!((490.0..=570.0).contains(&wl), "magenta = {}", wl);
    }

    #[test]
    fn test_frequency_mapping() {
        let f = |nm| frequency_for(DominantWavelength::Spectral(nm));
        assert!((f(380.0) - 880.0).abs() < 1e-2);
        assert!((f(780.0) - 220.0).abs() < 1e-2);
        assert!((f(580.0) - 440.0).abs() < 1e-2);
        assert_eq!(f(300.0), FALLBACK_FREQ_HZ);
        assert_eq!(frequency_for(DominantWavelength::Achromatic), FALLBACK_FREQ_HZ);

        // Shorter wavelength, higher pitch
        assert!(f(450.0) > f(650.0));
    }
}
