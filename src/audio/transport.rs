//! Playback policy: how a key press turns into a play request.

use log::info;

use crate::keymap::FlameKey;
use crate::params::PlaybackConfig;

/// Everything the mixer needs to start a clip
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayRequest {
    pub key: FlameKey,
    pub rate: f32,
    pub gain: f32,
    /// Cut the clip after this long (seconds)
    pub max_seconds: Option<f32>,
}

/// Rate, volume and clip-length state for one scene
#[derive(Debug, Clone)]
pub struct Transport {
    rate: f32,
    volume: f32,
    volume_step: f32,
    one_second: bool,
    one_shot_seconds: f32,
    stop_on_release: bool,
    adjustable: bool,
}

impl Transport {
    /// Orb: unity gain, fixed rate, sound stops when the key is released
    pub fn for_orb(config: &PlaybackConfig) -> Self {
        Self {
            rate: 1.0,
            volume: config.orb_volume.clamp(0.0, 1.0),
            volume_step: config.volume_step,
            one_second: false,
            one_shot_seconds: config.one_shot_seconds,
            stop_on_release: true,
            adjustable: false,
        }
    }

    /// Flame: keyboard-adjustable rate/volume, sounds play out after release
    pub fn for_flame(config: &PlaybackConfig) -> Self {
        Self {
            rate: 1.0,
            volume: config.flame_initial_volume.clamp(0.0, 1.0),
            volume_step: config.volume_step,
            one_second: false,
            one_shot_seconds: config.one_shot_seconds,
            stop_on_release: false,
            adjustable: true,
        }
    }

    pub fn request(&self, key: FlameKey) -> PlayRequest {
        PlayRequest {
            key,
            rate: self.rate,
            gain: self.volume,
            max_seconds: self.one_second.then_some(self.one_shot_seconds),
        }
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn stop_on_release(&self) -> bool {
        self.stop_on_release
    }

    /// Returns false when this scene has fixed playback settings
    pub fn set_rate(&mut self, rate: f32) -> bool {
        if !self.adjustable {
            return false;
        }
        self.rate = rate;
        info!("Playback rate: {}x", rate);
        true
    }

    pub fn volume_up(&mut self) -> bool {
        self.nudge_volume(self.volume_step)
    }

    pub fn volume_down(&mut self) -> bool {
        self.nudge_volume(-self.volume_step)
    }

    fn nudge_volume(&mut self, delta: f32) -> bool {
        if !self.adjustable {
            return false;
        }
        self.volume = (self.volume + delta).clamp(0.0, 1.0);
        info!("Volume: {:.2}", self.volume);
        true
    }

    pub fn set_one_second_mode(&mut self, on: bool) -> bool {
        if !self.adjustable {
            return false;
        }
        self.one_second = on;
        if on {
            info!("One-second playback mode on");
        } else {
            info!("Normal playback mode");
        }
        true
    }
}
