//! Flow-field flame: particles drift upward through Perlin noise and leave
//! fading trails in the colours of the selected keys.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::Rng;

use crate::audio::AudioBands;
use crate::canvas::Canvas;
use crate::flow::FlowField;
use crate::keymap::FlameKey;
use crate::palette::{blend_combinations, Palette, Rgb};
use crate::params::FlameParams;

/// Which key colours the particles are painted with
///
/// A single held key sets a single colour. As soon as two keys are down
/// together the selection switches to multi mode and keeps accumulating
/// every key pressed afterwards until [`ColorSelection::reset`].
#[derive(Debug, Clone, Default)]
pub struct ColorSelection {
    held: Vec<FlameKey>,
    single: Option<FlameKey>,
    multi: Vec<FlameKey>,
    multi_mode: bool,
}

impl ColorSelection {
    pub fn press(&mut self, key: FlameKey) {
        if !self.held.contains(&key) {
            self.held.push(key);
        }

        if self.held.len() > 1 {
            if !self.multi_mode {
                self.multi_mode = true;
                if let Some(single) = self.single.take() {
                    push_unique(&mut self.multi, single);
                }
                for &held in &self.held {
                    push_unique(&mut self.multi, held);
                }
            }
            push_unique(&mut self.multi, key);
        } else if self.multi_mode {
            push_unique(&mut self.multi, key);
        } else if self.multi.is_empty() {
            self.single = Some(key);
        }
    }

    /// Releasing never changes the colours, it only ends the chord
    pub fn release(&mut self, key: FlameKey) {
        self.held.retain(|&k| k != key);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_multi(&self) -> bool {
        self.multi_mode
    }

    pub fn single(&self) -> Option<FlameKey> {
        self.single
    }

    pub fn multi(&self) -> &[FlameKey] {
        &self.multi
    }

    /// Colours to cycle across the particles (never empty)
    pub fn colors(&self, palette: &Palette) -> Vec<Rgb> {
        if self.multi_mode && !self.multi.is_empty() {
            let active: Vec<Rgb> = self.multi.iter().map(|&k| palette.color(k)).collect();
            blend_combinations(&active)
        } else if let Some(key) = self.single {
            vec![palette.color(key)]
        } else {
            vec![Rgb::WHITE]
        }
    }
}

fn push_unique(keys: &mut Vec<FlameKey>, key: FlameKey) {
    if !keys.contains(&key) {
        keys.push(key);
    }
}

#[derive(Debug, Clone)]
pub struct FlameParticle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub acc: Vec2,
    pub prev: Vec2,
    pub color: Rgb,
}

impl FlameParticle {
    pub fn at(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            acc: Vec2::ZERO,
            prev: pos,
            color: Rgb::WHITE,
        }
    }

    pub fn spawn(rng: &mut StdRng, size: Vec2) -> Self {
        Self::at(random_point(rng, size))
    }

    pub fn follow(&mut self, field: &FlowField) {
        self.acc += field.force_at(self.pos);
    }

    pub fn update(&mut self, max_speed: f32) {
        self.vel = (self.vel + self.acc).clamp_length_max(max_speed);
        self.pos += self.vel;
        self.acc = Vec2::ZERO;
    }

    /// Respawn somewhere random once the particle leaves the window
    pub fn edges(&mut self, size: Vec2, rng: &mut StdRng) {
        if self.pos.x > size.x || self.pos.x < 0.0 || self.pos.y > size.y || self.pos.y < 0.0 {
            *self = Self {
                color: self.color,
                ..Self::spawn(rng, size)
            };
        }
    }

    /// Trail opacity (0-255): faint at the bottom, solid at the top
    pub fn trail_alpha(&self, height: f32, bottom: f32, top: f32) -> f32 {
        let y_ratio = if height > 0.0 {
            1.0 - self.pos.y / height
        } else {
            0.0
        };
        bottom + (top - bottom) * y_ratio
    }
}

fn random_point(rng: &mut StdRng, size: Vec2) -> Vec2 {
    Vec2::new(
        rng.gen::<f32>() * size.x.max(0.0),
        rng.gen::<f32>() * size.y.max(0.0),
    )
}

pub struct FlameScene {
    params: FlameParams,
    palette: Palette,
    field: FlowField,
    particles: Vec<FlameParticle>,
    selection: ColorSelection,
    rng: StdRng,
    size: Vec2,
    max_speed: f32,
    needs_background: bool,
}

impl FlameScene {
    pub fn new(width: u32, height: u32, params: FlameParams, palette: Palette, mut rng: StdRng) -> Self {
        let size = Vec2::new(width as f32, height as f32);
        let field = FlowField::new(width, height, &params);
        let particles = (0..params.particle_count)
            .map(|_| FlameParticle::spawn(&mut rng, size))
            .collect();
        let max_speed = params.max_speed;
        Self {
            params,
            palette,
            field,
            particles,
            selection: ColorSelection::default(),
            rng,
            size,
            max_speed,
            needs_background: true,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.size = Vec2::new(width as f32, height as f32);
        self.field.resize(width, height);
        for p in &mut self.particles {
            p.edges(self.size, &mut self.rng);
        }
        self.needs_background = true;
    }

    pub fn key_down(&mut self, key: FlameKey) {
        self.selection.press(key);
    }

    pub fn key_up(&mut self, key: FlameKey) {
        self.selection.release(key);
    }

    /// Back to white particles
    pub fn reset(&mut self) {
        self.selection.reset();
    }

    pub fn selection(&self) -> &ColorSelection {
        &self.selection
    }

    pub fn particles(&self) -> &[FlameParticle] {
        &self.particles
    }

    pub fn field(&self) -> &FlowField {
        &self.field
    }

    /// Advance one frame
    pub fn update(&mut self, bands: &AudioBands) {
        self.field.update();

        let colors = self.selection.colors(&self.palette);
        for (i, p) in self.particles.iter_mut().enumerate() {
            p.color = colors[i % colors.len()];
        }

        self.max_speed = self.params.max_speed + bands.low * self.params.bass_to_speed;
        for p in &mut self.particles {
            p.follow(&self.field);
            p.update(self.max_speed);
            p.edges(self.size, &mut self.rng);
        }
    }

    /// Fade the previous frame, then extend each particle's trail
    pub fn draw(&mut self, canvas: &mut Canvas) {
        if self.needs_background {
            canvas.clear(Rgb::grey(self.params.background));
            self.needs_background = false;
        }
        canvas.fade(Rgb::BLACK, self.params.fade_alpha / 255.0);

        let height = self.size.y;
        for p in &mut self.particles {
            let alpha = p.trail_alpha(height, self.params.alpha_bottom, self.params.alpha_top);
            canvas.draw_line(p.prev, p.pos, self.params.line_width_px, p.color, alpha / 255.0);
            p.prev = p.pos;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::{Element, Zone};
    use rand::SeedableRng;

    fn key(letter: char) -> FlameKey {
        FlameKey::from_letter(letter).unwrap()
    }

    fn scene(count: usize) -> FlameScene {
        let params = FlameParams {
            particle_count: count,
            ..FlameParams::default()
        };
        FlameScene::new(320, 240, params, Palette::flame(), StdRng::seed_from_u64(7))
    }

    #[test]
    fn test_selection_defaults_to_white() {
        let selection = ColorSelection::default();
        assert_eq!(selection.colors(&Palette::flame()), vec![Rgb::WHITE]);
    }

    #[test]
    fn test_single_key_persists_after_release() {
        let palette = Palette::flame();
        let mut selection = ColorSelection::default();

        selection.press(key('Q'));
        selection.release(key('Q'));
        assert_eq!(selection.colors(&palette), vec![palette.color(key('Q'))]);

        // A new lone key replaces the single colour
        selection.press(key('Y'));
        selection.release(key('Y'));
        assert_eq!(selection.single(), Some(key('Y')));
        assert!(!selection.is_multi());
    }

    #[test]
    fn test_chord_enters_multi_mode_with_blends() {
        let palette = Palette::flame();
        let mut selection = ColorSelection::default();

        selection.press(key('Q'));
        selection.press(key('W'));
        assert!(selection.is_multi());
        assert_eq!(selection.single(), None);
        assert_eq!(selection.multi(), &[key('Q'), key('W')]);

        let colors = selection.colors(&palette);
        assert_eq!(colors.len(), 3);
        assert_eq!(
            colors[2],
            Rgb::mix(palette.color(key('Q')), palette.color(key('W')))
        );
    }

    #[test]
    fn test_multi_mode_accumulates_until_reset() {
        let mut selection = ColorSelection::default();

        selection.press(key('Q'));
        selection.press(key('W'));
        selection.release(key('Q'));
        selection.release(key('W'));

        // Lone presses keep accumulating in multi mode
        selection.press(key('E'));
        selection.release(key('E'));
        selection.press(key('Q'));
        assert_eq!(selection.multi(), &[key('Q'), key('W'), key('E')]);
        assert_eq!(selection.colors(&Palette::flame()).len(), 6);

        selection.reset();
        assert!(!selection.is_multi());
        assert!(selection.multi().is_empty());
        assert_eq!(selection.colors(&Palette::flame()), vec![Rgb::WHITE]);
    }

    #[test]
    fn test_particle_speed_is_limited() {
        let mut p = FlameParticle::at(Vec2::new(50.0, 50.0));
        for _ in 0..10 {
            p.acc += Vec2::new(0.0, -0.95);
            p.update(2.8);
            assert!(p.vel.length() <= 2.8 + 1e-5);
            assert_eq!(p.acc, Vec2::ZERO);
        }
        assert!(p.pos.y < 50.0);
    }

    #[test]
    fn test_particle_respawns_inside_window() {
        let mut rng = StdRng::seed_from_u64(1);
        let size = Vec2::new(100.0, 80.0);
        let mut p = FlameParticle::at(Vec2::new(50.0, -1.0));
        p.vel = Vec2::new(1.0, -2.0);
        p.color = Rgb::from_u8([1, 2, 3]);

        p.edges(size, &mut rng);
        assert!(p.pos.x >= 0.0 && p.pos.x <= size.x);
        assert!(p.pos.y >= 0.0 && p.pos.y <= size.y);
        assert_eq!(p.vel, Vec2::ZERO);
        assert_eq!(p.prev, p.pos);
        assert_eq!(p.color, Rgb::from_u8([1, 2, 3]));
    }

    #[test]
    fn test_trail_alpha_by_height() {
        let bottom = FlameParticle::at(Vec2::new(0.0, 240.0));
        let top = FlameParticle::at(Vec2::new(0.0, 0.0));
        let middle = FlameParticle::at(Vec2::new(0.0, 120.0));

        assert!((bottom.trail_alpha(240.0, 20.0, 255.0) - 20.0).abs() < 1e-4);
        assert!((top.trail_alpha(240.0, 20.0, 255.0) - 255.0).abs() < 1e-4);
        assert!((middle.trail_alpha(240.0, 20.0, 255.0) - 137.5).abs() < 1e-4);
    }

    #[test]
    fn test_update_assigns_colors_round_robin() {
        let mut flame = scene(10);
        flame.key_down(FlameKey::new(Element::Li, Zone::Outer));
        flame.key_down(FlameKey::new(Element::Na, Zone::Outer));
        flame.update(&AudioBands::default());

        let colors = flame.selection().colors(&Palette::flame());
        assert_eq!(colors.len(), 3);
        for (i, p) in flame.particles().iter().enumerate() {
            assert_eq!(p.color, colors[i % 3]);
        }
    }

    #[test]
    fn test_particles_stay_in_window() {
        let mut flame = scene(200);
        let mut canvas = Canvas::new(320, 240);
        for _ in 0..120 {
            flame.update(&AudioBands::default());
            flame.draw(&mut canvas);
        }
        for p in flame.particles() {
            assert!(p.pos.x >= 0.0 && p.pos.x <= 320.0);
            assert!(p.pos.y >= 0.0 && p.pos.y <= 240.0);
            assert_eq!(p.prev, p.pos);
        }
        assert_eq!(flame.field().vectors().len(), 32 * 24);
    }

    #[test]
    fn test_resize_regrids_field() {
        let mut flame = scene(50);
        flame.resize(100, 60);
        assert_eq!(flame.field().vectors().len(), 10 * 6);
        for p in flame.particles() {
            assert!(p.pos.x <= 100.0 && p.pos.y <= 60.0);
        }
    }
}
