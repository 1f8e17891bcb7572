//! Colours: RGB triples, easing, blending and the per-scene key palettes.

use crate::keymap::FlameKey;

/// RGB colour with components kept in [0, 255]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb {
        r: 255.0,
        g: 255.0,
        b: 255.0,
    };

    pub const BLACK: Rgb = Rgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self {
            r: r.clamp(0.0, 255.0),
            g: g.clamp(0.0, 255.0),
            b: b.clamp(0.0, 255.0),
        }
    }

    pub fn from_u8([r, g, b]: [u8; 3]) -> Self {
        Self::new(r as f32, g as f32, b as f32)
    }

    pub fn grey(level: u8) -> Self {
        Self::from_u8([level, level, level])
    }

    /// Move each component `factor` of the way toward `target`
    pub fn lerp_toward(&mut self, target: Rgb, factor: f32) {
        *self = Rgb::new(
            self.r + (target.r - self.r) * factor,
            self.g + (target.g - self.g) * factor,
            self.b + (target.b - self.b) * factor,
        );
    }

    /// Component-wise mean of two colours
    pub fn mix(a: Rgb, b: Rgb) -> Rgb {
        Rgb::new((a.r + b.r) / 2.0, (a.g + b.g) / 2.0, (a.b + b.b) / 2.0)
    }

    /// Scale green and blue, keep red (darker, redder edge of the orb)
    pub fn scale_gb(self, factor: f32) -> Rgb {
        Rgb::new(self.r, self.g * factor, self.b * factor)
    }

    /// Red and blue swapped
    pub fn swap_rb(self) -> Rgb {
        Rgb::new(self.b, self.g, self.r)
    }

    pub fn rounded(self) -> [u8; 3] {
        [
            self.r.round() as u8,
            self.g.round() as u8,
            self.b.round() as u8,
        ]
    }

    pub fn max_channel_distance(self, other: Rgb) -> f32 {
        (self.r - other.r)
            .abs()
            .max((self.g - other.g).abs())
            .max((self.b - other.b).abs())
    }
}

/// Colour assigned to each flame key
#[derive(Debug, Clone)]
pub struct Palette {
    colors: [[u8; 3]; 21],
}

impl Palette {
    /// Orb scene colours
    pub fn orb() -> Self {
        Self {
            colors: [
                [241, 70, 58],   // Q red
                [255, 87, 87],   // A pink
                [247, 147, 38],  // Z orange-yellow
                [247, 207, 38],  // W gold
                [246, 238, 58],  // S bright yellow
                [255, 250, 146], // X soft yellow
                [234, 129, 255], // E purple pink
                [203, 108, 230], // D purple red
                [197, 167, 255], // C light purple
                [241, 70, 58],   // R deep red
                [237, 104, 29],  // F orange-red
                [255, 144, 89],  // V light orange
                [246, 47, 47],   // T deep red
                [247, 57, 38],   // G deep red
                [255, 138, 129], // B light red
                [32, 198, 123],  // Y green
                [126, 217, 87],  // H yellow-green
                [201, 226, 101], // N
                [0, 203, 173],   // U cyan-green
                [92, 230, 143],  // J green
                [106, 235, 207], // M
            ],
        }
    }

    /// Flame scene colours
    pub fn flame() -> Self {
        Self {
            colors: [
                [241, 70, 58],
                [239, 106, 106],
                [247, 147, 38],
                [247, 205, 25],
                [255, 247, 55],
                [255, 250, 154],
                [234, 129, 255],
                [197, 88, 228],
                [197, 167, 255],
                [241, 70, 58],
                [237, 104, 29],
                [255, 144, 89],
                [244, 34, 34],
                [255, 71, 53],
                [255, 138, 129],
                [32, 198, 123],
                [126, 217, 87],
                [201, 226, 101],
                [0, 192, 164],
                [92, 230, 143],
                [111, 250, 220],
            ],
        }
    }

    pub fn color(&self, key: FlameKey) -> Rgb {
        Rgb::from_u8(self.colors[key.index()])
    }
}

/// The given colours followed by the mean of every pair (i < j)
pub fn blend_combinations(colors: &[Rgb]) -> Vec<Rgb> {
    let mut all = colors.to_vec();
    for (i, &a) in colors.iter().enumerate() {
        for &b in &colors[i + 1..] {
            all.push(Rgb::mix(a, b));
        }
    }
    all
}
