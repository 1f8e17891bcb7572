//! Software RGBA raster that the scenes draw into.
//!
//! Every primitive is anti-aliased by pixel coverage and composited with
//! source-over blending onto an opaque surface. Anything outside the
//! surface is clipped.

use std::path::Path;

use anyhow::Context;
use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::palette::Rgb;

/// One RGBA8 pixel, laid out for direct texture upload
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    pub fn opaque(color: Rgb) -> Self {
        let [r, g, b] = color.rounded();
        Self { r, g, b, a: 255 }
    }

    pub fn rgb(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Colour stop of a radial gradient (offset and alpha in [0, 1])
#[derive(Clone, Copy, Debug)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Rgb,
    pub alpha: f32,
}

impl ColorStop {
    pub fn new(offset: f32, color: Rgb, alpha: f32) -> Self {
        Self {
            offset,
            color,
            alpha,
        }
    }
}

/// Radial gradient between a focal circle and an enclosing circle
#[derive(Clone, Debug)]
pub struct RadialGradient {
    pub focal: Vec2,
    pub focal_radius: f32,
    pub center: Vec2,
    pub radius: f32,
    pub stops: Vec<ColorStop>,
}

impl RadialGradient {
    /// Gradient position of `p`: 0 on the focal circle, 1 on the outer circle
    pub fn offset_at(&self, p: Vec2) -> f32 {
        let v = p - self.focal;
        let dist = v.length();
        if dist <= self.focal_radius {
            return 0.0;
        }
        let u = v / dist;

        // Distance from the focal point to the outer circle along u
        let w = self.focal - self.center;
        let wu = w.dot(u);
        let disc = wu * wu - (w.length_squared() - self.radius * self.radius);
        let reach = -wu + disc.max(0.0).sqrt();
        if reach <= self.focal_radius {
            return 1.0;
        }

        ((dist - self.focal_radius) / (reach - self.focal_radius)).clamp(0.0, 1.0)
    }

    /// Interpolated colour and alpha at a gradient offset
    pub fn sample(&self, t: f32) -> (Rgb, f32) {
        let Some(first) = self.stops.first() else {
            return (Rgb::BLACK, 0.0);
        };
        if t <= first.offset {
            return (first.color, first.alpha);
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.offset {
                let span = (b.offset - a.offset).max(f32::EPSILON);
                let f = (t - a.offset) / span;
                let color = Rgb::new(
                    a.color.r + (b.color.r - a.color.r) * f,
                    a.color.g + (b.color.g - a.color.g) * f,
                    a.color.b + (b.color.b - a.color.b) * f,
                );
                return (color, a.alpha + (b.alpha - a.alpha) * f);
            }
        }
        let last = self.stops[self.stops.len() - 1];
        (last.color, last.alpha)
    }
}

/// Point on an ellipse centred at `center`, rotated by `rotation` radians
pub fn ellipse_point(center: Vec2, rx: f32, ry: f32, rotation: f32, theta: f32) -> Vec2 {
    let local = Vec2::new(rx * theta.cos(), ry * theta.sin());
    center + Vec2::from_angle(rotation).rotate(local)
}

/// Software drawing surface
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Pixel::opaque(Rgb::BLACK); (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        if x < self.width && y < self.height {
            Some(self.pixels[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Resize the surface; contents are cleared to black
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels = vec![Pixel::opaque(Rgb::BLACK); (width * height) as usize];
    }

    pub fn clear(&mut self, color: Rgb) {
        self.pixels.fill(Pixel::opaque(color));
    }

    /// Paint a translucent colour over the whole surface
    pub fn fade(&mut self, color: Rgb, alpha: f32) {
        let alpha = alpha.clamp(0.0, 1.0);
        for px in &mut self.pixels {
            *px = blend(*px, color, alpha);
        }
    }

    /// Source-over blend a single pixel; coordinates outside are ignored
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Rgb, alpha: f32) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 || alpha <= 0.0 {
            return;
        }
        let idx = (y as u32 * self.width + x as u32) as usize;
        self.pixels[idx] = blend(self.pixels[idx], color, alpha.min(1.0));
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32) {
        self.for_each_in_box(center - radius - 1.0, center + radius + 1.0, |canvas, x, y, p| {
            let coverage = (radius + 0.5 - p.distance(center)).clamp(0.0, 1.0);
            canvas.blend_pixel(x, y, color, alpha * coverage);
        });
    }

    /// Axis-aligned rectangle covering pixel centres in [min, max)
    pub fn fill_rect(&mut self, min: Vec2, max: Vec2, color: Rgb, alpha: f32) {
        self.for_each_in_box(min, max, |canvas, x, y, p| {
            if p.x >= min.x && p.x < max.x && p.y >= min.y && p.y < max.y {
                canvas.blend_pixel(x, y, color, alpha);
            }
        });
    }

    /// Soft halo around a disc (stand-in for a canvas shadow blur)
    pub fn glow(&mut self, center: Vec2, radius: f32, blur: f32, color: Rgb, alpha: f32) {
        if blur <= 0.0 {
            return;
        }
        let reach = radius + blur;
        self.for_each_in_box(center - reach, center + reach, |canvas, x, y, p| {
            let d = p.distance(center);
            if d >= reach {
                return;
            }
            let falloff = if d <= radius {
                1.0
            } else {
                let f = 1.0 - (d - radius) / blur;
                f * f
            };
            canvas.blend_pixel(x, y, color, alpha * falloff);
        });
    }

    /// Fill the outer circle of `gradient`
    pub fn fill_radial_gradient(&mut self, gradient: &RadialGradient) {
        let (center, radius) = (gradient.center, gradient.radius);
        self.for_each_in_box(center - radius - 1.0, center + radius + 1.0, |canvas, x, y, p| {
            let coverage = (radius + 0.5 - p.distance(center)).clamp(0.0, 1.0);
            if coverage <= 0.0 {
                return;
            }
            let (color, alpha) = gradient.sample(gradient.offset_at(p));
            canvas.blend_pixel(x, y, color, alpha * coverage);
        });
    }

    /// Anti-aliased line segment with round caps
    pub fn draw_line(&mut self, a: Vec2, b: Vec2, width: f32, color: Rgb, alpha: f32) {
        let half = width / 2.0;
        let pad = half + 1.0;
        let ab = b - a;
        let len_sq = ab.length_squared();
        self.for_each_in_box(a.min(b) - pad, a.max(b) + pad, |canvas, x, y, p| {
            let t = if len_sq > 0.0 {
                ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let d = p.distance(a + ab * t);
            let coverage = (half + 0.5 - d).clamp(0.0, 1.0);
            canvas.blend_pixel(x, y, color, alpha * coverage);
        });
    }

    /// Stroke a rotated ellipse; `paint` maps the distance from the centre
    /// (as a fraction of `rx`) to a colour and alpha
    pub fn stroke_ellipse(
        &mut self,
        center: Vec2,
        rx: f32,
        ry: f32,
        rotation: f32,
        width: f32,
        paint: impl Fn(f32) -> (Rgb, f32),
    ) {
        let segments = ((rx.max(ry) * 0.5) as usize).clamp(24, 256);
        let step = std::f32::consts::TAU / segments as f32;
        let mut prev = ellipse_point(center, rx, ry, rotation, 0.0);
        for k in 1..=segments {
            let next = ellipse_point(center, rx, ry, rotation, step * k as f32);
            let mid = (prev + next) / 2.0;
            let (color, alpha) = paint(mid.distance(center) / rx.max(1.0));
            self.draw_line(prev, next, width, color, alpha);
            prev = next;
        }
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        image::save_buffer(
            path,
            self.as_bytes(),
            self.width,
            self.height,
            image::ColorType::Rgba8,
        )
        .with_context(|| format!("Failed to save frame {}", path.display()))
    }

    /// Visit every pixel centre inside the clipped box [min, max]
    fn for_each_in_box(&mut self, min: Vec2, max: Vec2, mut f: impl FnMut(&mut Self, i32, i32, Vec2)) {
        let x0 = (min.x.floor() as i32).max(0);
        let y0 = (min.y.floor() as i32).max(0);
        let x1 = (max.x.ceil() as i32).min(self.width as i32 - 1);
        let y1 = (max.y.ceil() as i32).min(self.height as i32 - 1);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                f(self, x, y, p);
            }
        }
    }
}

fn blend(dst: Pixel, color: Rgb, alpha: f32) -> Pixel {
    let mix = |d: u8, s: f32| (s * alpha + d as f32 * (1.0 - alpha)).round().clamp(0.0, 255.0) as u8;
    Pixel {
        r: mix(dst.r, color.r),
        g: mix(dst.g, color.g),
        b: mix(dst.b, color.b),
        a: 255,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_and_fade() {
        let mut canvas = Canvas::new(4, 3);
        canvas.clear(Rgb::grey(200));
        assert_eq!(canvas.pixel(3, 2).unwrap().rgb(), [200, 200, 200]);

        canvas.fade(Rgb::BLACK, 0.5);
        assert_eq!(canvas.pixel(0, 0).unwrap().rgb(), [100, 100, 100]);
        assert_eq!(canvas.pixel(4, 0), None);
    }

    #[test]
    fn test_fill_circle_covers_center_only() {
        let mut canvas = Canvas::new(40, 40);
        canvas.fill_circle(Vec2::new(20.0, 20.0), 5.0, Rgb::WHITE, 1.0);

        assert_eq!(canvas.pixel(20, 20).unwrap().rgb(), [255, 255, 255]);
        assert_eq!(canvas.pixel(2, 2).unwrap().rgb(), [0, 0, 0]);
        assert_eq!(canvas.pixel(20, 30).unwrap().rgb(), [0, 0, 0]);
    }

    #[test]
    fn test_drawing_off_surface_is_clipped() {
        let mut canvas = Canvas::new(10, 10);
        canvas.fill_circle(Vec2::new(-50.0, -50.0), 10.0, Rgb::WHITE, 1.0);
        canvas.draw_line(Vec2::new(-5.0, 5.0), Vec2::new(50.0, 5.0), 2.0, Rgb::WHITE, 1.0);
        canvas.glow(Vec2::new(100.0, 100.0), 5.0, 20.0, Rgb::WHITE, 1.0);

        assert_eq!(canvas.pixel(0, 0).unwrap().rgb(), [0, 0, 0]);
        assert_eq!(canvas.pixel(9, 5).unwrap().rgb(), [255, 255, 255]);
    }

    #[test]
    fn test_fill_rect_edges() {
        let mut canvas = Canvas::new(10, 10);
        canvas.fill_rect(Vec2::new(2.0, 3.0), Vec2::new(5.0, 4.0), Rgb::WHITE, 1.0);

        assert_eq!(canvas.pixel(2, 3).unwrap().rgb(), [255, 255, 255]);
        assert_eq!(canvas.pixel(4, 3).unwrap().rgb(), [255, 255, 255]);
        assert_eq!(canvas.pixel(5, 3).unwrap().rgb(), [0, 0, 0]);
        assert_eq!(canvas.pixel(2, 4).unwrap().rgb(), [0, 0, 0]);
    }

    #[test]
    fn test_line_width() {
        let mut canvas = Canvas::new(20, 20);
        canvas.draw_line(Vec2::new(2.0, 10.0), Vec2::new(18.0, 10.0), 2.0, Rgb::WHITE, 1.0);

        assert_eq!(canvas.pixel(10, 9).unwrap().rgb(), [255, 255, 255]);
        assert_eq!(canvas.pixel(10, 10).unwrap().rgb(), [255, 255, 255]);
        assert_eq!(canvas.pixel(10, 14).unwrap().rgb(), [0, 0, 0]);
    }

    #[test]
    fn test_radial_gradient_offsets() {
        let gradient = RadialGradient {
            focal: Vec2::new(7.0, 7.0),
            focal_radius: 1.0,
            center: Vec2::new(10.0, 10.0),
            radius: 10.0,
            stops: vec![
                ColorStop::new(0.0, Rgb::WHITE, 1.0),
                ColorStop::new(1.0, Rgb::BLACK, 0.0),
            ],
        };

        assert_eq!(gradient.offset_at(Vec2::new(7.0, 7.0)), 0.0);
        assert!((gradient.offset_at(Vec2::new(20.0, 10.0)) - 1.0).abs() < 1e-3);
        let mid = gradient.offset_at(Vec2::new(13.0, 10.0));
        assert!(mid > 0.1 && mid < 0.9);

        let (color, alpha) = gradient.sample(0.5);
        assert!((color.r - 127.5).abs() < 1e-3);
        assert!((alpha - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_ellipse_point_rotation() {
        let p = ellipse_point(Vec2::ZERO, 10.0, 2.0, std::f32::consts::FRAC_PI_2, 0.0);
        assert!(p.x.abs() < 1e-4);
        assert!((p.y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_save_png() {
        let mut canvas = Canvas::new(8, 6);
        canvas.clear(Rgb::from_u8([10, 20, 30]));

        let path = std::env::temp_dir().join("flamekeys_canvas_test.png");
        canvas.save_png(&path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (8, 6));
        assert_eq!(img.get_pixel(3, 3).0, [10, 20, 30, 255]);
        let _ = std::fs::remove_file(path);
    }
}
