//! Glowing orb with breathing radius and three orbiting elliptical rings.

use std::f32::consts::{PI, TAU};

use glam::Vec2;

use crate::audio::AudioBands;
use crate::canvas::{ellipse_point, Canvas, ColorStop, RadialGradient};
use crate::keymap::FlameKey;
use crate::palette::{Palette, Rgb};
use crate::params::OrbParams;

/// Geometry of one ring for the current frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ring {
    /// Ring angle including its phase offset (radians)
    pub local_angle: f32,
    pub rx: f32,
    pub ry: f32,
    pub rotation: f32,
    /// Stroke opacity (0.0 - 1.0)
    pub alpha: f32,
    pub line_width: f32,
    pub glow: f32,
}

impl Ring {
    /// Positions of `count` particles spread evenly around the ring
    pub fn particles(&self, center: Vec2, count: usize) -> Vec<Vec2> {
        (0..count)
            .map(|j| {
                let theta = self.local_angle + TAU / count as f32 * j as f32;
                ellipse_point(center, self.rx, self.ry, self.rotation, theta)
            })
            .collect()
    }
}

pub struct OrbScene {
    params: OrbParams,
    palette: Palette,
    center: Vec2,
    min_radius: f32,
    max_radius: f32,
    color: Rgb,
    target: Rgb,
    angle: f32,
    radius: f32,
}

impl OrbScene {
    pub fn new(width: u32, height: u32, params: OrbParams, palette: Palette) -> Self {
        let color = Rgb::from_u8(params.initial_color);
        let mut scene = Self {
            params,
            palette,
            center: Vec2::ZERO,
            min_radius: 0.0,
            max_radius: 0.0,
            color,
            target: color,
            angle: 0.0,
            radius: 0.0,
        };
        scene.resize(width, height);
        scene.radius = scene.min_radius + (scene.max_radius - scene.min_radius) * 0.5;
        scene
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.center = Vec2::new(width as f32 / 2.0, height as f32 / 2.0);
        self.max_radius = width.min(height) as f32 * self.params.max_radius_ratio;
        self.min_radius = self.max_radius * self.params.min_radius_ratio;
    }

    /// Start easing toward the key's colour
    pub fn key_down(&mut self, key: FlameKey) {
        self.target = self.palette.color(key);
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn target(&self) -> Rgb {
        self.target
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn radius_range(&self) -> (f32, f32) {
        (self.min_radius, self.max_radius)
    }

    /// Advance one frame
    pub fn update(&mut self, bands: &AudioBands) {
        self.color.lerp_toward(self.target, self.params.color_ease);

        let scale = (self.angle.sin() + 1.0) / 2.0;
        self.radius = self.min_radius
            + (self.max_radius - self.min_radius) * scale
            + bands.low * self.params.bass_to_pulse_px;
        self.angle += self.params.angle_step;
    }

    pub fn rings(&self) -> Vec<Ring> {
        let radius = self.radius;
        (0..self.params.ring_count)
            .map(|i| {
                let i = i as f32;
                let local_angle = self.angle + i * PI * 0.5;
                let pulse = (local_angle * 0.5 + i).sin() * 50.0;
                let rx = radius * (1.3 + i * 0.25) + pulse;
                let ry = radius * (0.3 + 0.12 * i) + (local_angle * 0.5).sin() * radius * 0.35;
                Ring {
                    local_angle,
                    rx: rx.max(1.0),
                    ry: ry.max(1.0),
                    rotation: local_angle * (1.5 + i * 0.15),
                    alpha: (0.15 + 0.2 * local_angle.sin()).max(0.0),
                    line_width: 10.0 - i,
                    glow: 50.0 + i * 10.0,
                }
            })
            .collect()
    }

    pub fn draw(&self, canvas: &mut Canvas) {
        canvas.clear(Rgb::BLACK);

        let color = self.color;
        for ring in self.rings() {
            let alpha = ring.alpha;
            // Wide faint pass stands in for the stroke's shadow blur
            canvas.stroke_ellipse(
                self.center,
                ring.rx,
                ring.ry,
                ring.rotation,
                ring.line_width + ring.glow * 0.5,
                |_| (color, alpha * 0.15),
            );
            canvas.stroke_ellipse(
                self.center,
                ring.rx,
                ring.ry,
                ring.rotation,
                ring.line_width,
                |t| (lerp_rgb(color, color.swap_rb(), t), alpha),
            );

            for p in ring.particles(self.center, self.params.particles_per_ring) {
                canvas.fill_circle(p, self.params.particle_radius_px, Rgb::WHITE, 0.8);
            }
        }

        self.draw_ball(canvas);
    }

    fn draw_ball(&self, canvas: &mut Canvas) {
        let radius = self.radius.max(1.0);
        canvas.glow(self.center, radius, self.params.ball_glow_px, self.color, 0.5);

        let gradient = RadialGradient {
            focal: self.center - Vec2::splat(radius * 0.3),
            focal_radius: radius * 0.1,
            center: self.center,
            radius,
            stops: vec![
                ColorStop::new(0.0, self.color, 1.0),
                ColorStop::new(0.7, self.color.scale_gb(0.6), 0.8),
                ColorStop::new(1.0, Rgb::BLACK, 0.0),
            ],
        };
        canvas.fill_radial_gradient(&gradient);
    }
}

fn lerp_rgb(a: Rgb, b: Rgb, t: f32) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    Rgb::new(
        a.r + (b.r - a.r) * t,
        a.g + (b.g - a.g) * t,
        a.b + (b.b - a.b) * t,
    )
}
