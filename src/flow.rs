//! Upward-biased flow field sampled from 3D Perlin noise.

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec2;
use noise::{NoiseFn, Perlin};

use crate::params::FlameParams;

/// Grid of steering vectors, one per `cell_size` square of the window
pub struct FlowField {
    cols: usize,
    rows: usize,
    cell_size: f32,
    vectors: Vec<Vec2>,
    perlin: Perlin,
    zoff: f64,
    increment: f64,
    time_step: f64,
    row_scale: f64,
    col_scale: f64,
    magnitude: f32,
}

impl FlowField {
    pub fn new(width: u32, height: u32, params: &FlameParams) -> Self {
        let mut field = Self {
            cols: 0,
            rows: 0,
            cell_size: params.cell_size_px,
            vectors: Vec::new(),
            perlin: Perlin::new(params.noise_seed),
            zoff: 0.0,
            increment: params.noise_increment,
            time_step: params.noise_time_step,
            row_scale: params.noise_row_scale,
            col_scale: params.noise_col_scale,
            magnitude: params.flow_magnitude,
        };
        field.resize(width, height);
        field
    }

    /// Regrid for a new window size; vectors are zero until the next update
    pub fn resize(&mut self, width: u32, height: u32) {
        self.cols = (width as f32 / self.cell_size).floor() as usize;
        self.rows = (height as f32 / self.cell_size).floor() as usize;
        self.vectors = vec![Vec2::ZERO; self.cols * self.rows];
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn vectors(&self) -> &[Vec2] {
        &self.vectors
    }

    /// Resample every cell at the current noise time, then advance time
    pub fn update(&mut self) {
        let mut yoff = 0.0;
        for y in 0..self.rows {
            let mut xoff = 0.0;
            for x in 0..self.cols {
                let n = self.noise01(yoff * self.row_scale, xoff * self.col_scale, self.zoff);
                // Noise hovers around 0.5, so the quarter turn puts the
                // mean heading at 3π/2: straight up the screen
                let angle = n * TAU + FRAC_PI_2;
                self.vectors[x + y * self.cols] = flow_vector(angle, self.magnitude);
                xoff += self.increment;
            }
            yoff += self.increment;
        }
        self.zoff += self.time_step;
    }

    /// Steering vector of the cell containing `pos` (clamped to the grid)
    pub fn force_at(&self, pos: Vec2) -> Vec2 {
        if self.vectors.is_empty() {
            return Vec2::ZERO;
        }
        let x = ((pos.x / self.cell_size).floor().max(0.0) as usize).min(self.cols - 1);
        let y = ((pos.y / self.cell_size).floor().max(0.0) as usize).min(self.rows - 1);
        self.vectors[x + y * self.cols]
    }

    /// Perlin noise remapped from [-1, 1] to [0, 1]
    fn noise01(&self, x: f64, y: f64, z: f64) -> f32 {
        ((self.perlin.get([x, y, z]) as f32 + 1.0) / 2.0).clamp(0.0, 1.0)
    }
}

/// Vector of length `magnitude` in screen space (y grows downward)
fn flow_vector(angle: f32, magnitude: f32) -> Vec2 {
    Vec2::from_angle(angle) * magnitude
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_grid_dimensions() {
        let params = FlameParams::default();
        let field = FlowField::new(1285, 719, &params);

        assert_eq!(field.cols(), 128);
        assert_eq!(field.rows(), 71);
        assert_eq!(field.vectors().len(), 128 * 71);
    }

    #[test]
    fn test_resize_keeps_length_invariant() {
        let params = FlameParams::default();
        let mut field = FlowField::new(200, 100, &params);
        field.update();

        field.resize(640, 480);
        assert_eq!(field.vectors().len(), field.cols() * field.rows());
        field.update();
        assert_eq!(field.vectors().len(), 64 * 48);
    }

    #[test]
    fn test_vectors_have_fixed_magnitude() {
        let params = FlameParams::default();
        let mut field = FlowField::new(320, 240, &params);
        field.update();

        for v in field.vectors() {
            assert!((v.length() - params.flow_magnitude).abs() < 1e-4);
        }
    }

    #[test]
    fn test_flow_vector_points_up() {
        let up = flow_vector(PI + FRAC_PI_2, 1.0);
        assert!(up.x.abs() < 1e-6);
        assert!((up.y + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_mean_heading_is_upward() {
        let params = FlameParams::default();
        let mut field = FlowField::new(640, 480, &params);
        field.update();

        let sum: Vec2 = field.vectors().iter().copied().sum();
        assert!(sum.y < 0.0);
    }

    #[test]
    fn test_field_evolves_over_time() {
        let params = FlameParams::default();
        let mut field = FlowField::new(320, 240, &params);
        field.update();
        let first = field.vectors().to_vec();
        for _ in 0..50 {
            field.update();
        }
        assert_ne!(first, field.vectors());
    }

    #[test]
    fn test_force_lookup_clamps_to_grid() {
        let params = FlameParams::default();
        let mut field = FlowField::new(100, 50, &params);
        field.update();

        let last = *field.vectors().last().unwrap();
        assert_eq!(field.force_at(Vec2::new(100.0, 50.0)), last);
        assert_eq!(field.force_at(Vec2::new(-3.0, -3.0)), field.vectors()[0]);

        let empty = FlowField::new(5, 5, &params);
        assert_eq!(empty.force_at(Vec2::new(1.0, 1.0)), Vec2::ZERO);
    }
}
