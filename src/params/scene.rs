//! Scene animation parameters (pixels, radians, per-frame rates).

/// Orb scene: glowing ball with orbiting elliptical rings
#[derive(Debug, Clone)]
pub struct OrbParams {
    /// Colour easing per frame (fraction of remaining distance)
    pub color_ease: f32,

    /// Animation angle advance per frame (radians)
    pub angle_step: f32,

    /// Maximum ball radius as a fraction of the shorter window side
    pub max_radius_ratio: f32,

    /// Minimum ball radius as a fraction of the maximum radius
    pub min_radius_ratio: f32,

    /// Number of rings around the ball
    pub ring_count: usize,

    /// Particles riding each ring
    pub particles_per_ring: usize,

    /// Ring particle radius (pixels)
    pub particle_radius_px: f32,

    /// Ball glow radius (pixels)
    pub ball_glow_px: f32,

    /// Bass band level → extra ball radius (pixels per unit amplitude)
    pub bass_to_pulse_px: f32,

    /// Starting colour before any key is pressed
    pub initial_color: [u8; 3],
}

impl Default for OrbParams {
    fn default() -> Self {
        Self {
            color_ease: 0.08,
            angle_step: 0.02,
            max_radius_ratio: 0.5,
            min_radius_ratio: 0.3,
            ring_count: 3,
            particles_per_ring: 30,
            particle_radius_px: 6.0,
            ball_glow_px: 80.0,
            bass_to_pulse_px: 60.0,
            initial_color: [192, 232, 255],
        }
    }
}

/// Flame scene: flow-field particles with fading trails
#[derive(Debug, Clone)]
pub struct FlameParams {
    /// Number of particles
    pub particle_count: usize,

    /// Flow field cell size (pixels)
    pub cell_size_px: f32,

    /// Noise offset advance per cell
    pub noise_increment: f64,

    /// Noise time advance per frame
    pub noise_time_step: f64,

    /// Noise stretch along rows and columns
    pub noise_row_scale: f64,
    pub noise_col_scale: f64,

    /// Flow vector magnitude (pixels per frame squared)
    pub flow_magnitude: f32,

    /// Particle speed cap (pixels per frame)
    pub max_speed: f32,

    /// Bass band level → extra speed cap (pixels per frame per unit amplitude)
    pub bass_to_speed: f32,

    /// Trail line width (pixels)
    pub line_width_px: f32,

    /// Trail alpha at the bottom and the top of the window (0-255)
    pub alpha_bottom: f32,
    pub alpha_top: f32,

    /// Per-frame black overlay alpha (0-255); lower = longer trails
    pub fade_alpha: f32,

    /// Background grey level painted once at startup
    pub background: u8,

    /// Perlin noise seed
    pub noise_seed: u32,
}

impl Default for FlameParams {
    fn default() -> Self {
        Self {
            particle_count: 2000,
            cell_size_px: 10.0,
            noise_increment: 0.05,
            noise_time_step: 0.003,
            noise_row_scale: 1.2,
            noise_col_scale: 0.5,
            flow_magnitude: 0.95,
            max_speed: 2.8,
            bass_to_speed: 4.0,
            line_width_px: 1.6,
            alpha_bottom: 20.0,
            alpha_top: 255.0,
            fade_alpha: 15.0,
            background: 10,
            noise_seed: 0,
        }
    }
}
