//! The two live scenes and the per-frame dispatch between them.

mod flame;
mod orb;

pub use flame::{ColorSelection, FlameParticle, FlameScene};
pub use orb::{OrbScene, Ring};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::audio::AudioBands;
use crate::canvas::Canvas;
use crate::keymap::FlameKey;
use crate::palette::Palette;
use crate::params::{FlameParams, OrbParams};

/// Which scene to run
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum SceneKind {
    /// Glowing orb with orbiting rings; sounds stop when the key is released
    Orb,
    /// Flow-field flame particles; sounds play out, with rate/volume controls
    Flame,
}

pub enum Scene {
    Orb(OrbScene),
    Flame(FlameScene),
}

impl Scene {
    /// `seed` fixes particle placement; `None` seeds from the OS
    pub fn new(kind: SceneKind, width: u32, height: u32, seed: Option<u64>) -> Self {
        match kind {
            SceneKind::Orb => Scene::Orb(OrbScene::new(
                width,
                height,
                OrbParams::default(),
                Palette::orb(),
            )),
            SceneKind::Flame => {
                let rng = match seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };
                Scene::Flame(FlameScene::new(
                    width,
                    height,
                    FlameParams::default(),
                    Palette::flame(),
                    rng,
                ))
            }
        }
    }

    pub fn kind(&self) -> SceneKind {
        match self {
            Scene::Orb(_) => SceneKind::Orb,
            Scene::Flame(_) => SceneKind::Flame,
        }
    }

    pub fn key_down(&mut self, key: FlameKey) {
        match self {
            Scene::Orb(orb) => orb.key_down(key),
            Scene::Flame(flame) => flame.key_down(key),
        }
    }

    pub fn key_up(&mut self, key: FlameKey) {
        if let Scene::Flame(flame) = self {
            flame.key_up(key);
        }
    }

    pub fn reset(&mut self) {
        if let Scene::Flame(flame) = self {
            flame.reset();
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        match self {
            Scene::Orb(orb) => orb.resize(width, height),
            Scene::Flame(flame) => flame.resize(width, height),
        }
    }

    pub fn update(&mut self, bands: &AudioBands) {
        match self {
            Scene::Orb(orb) => orb.update(bands),
            Scene::Flame(flame) => flame.update(bands),
        }
    }

    pub fn draw(&mut self, canvas: &mut Canvas) {
        match self {
            Scene::Orb(orb) => orb.draw(canvas),
            Scene::Flame(flame) => flame.draw(canvas),
        }
    }
}
