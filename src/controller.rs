//! Key dispatch: turns key events into scene changes and playback.

use winit::keyboard::KeyCode;

use crate::audio::{AudioBands, AudioSystem, PlayRequest, Transport};
use crate::canvas::Canvas;
use crate::input::{command_for, Command};
use crate::keymap::FlameKey;
use crate::params::PlaybackConfig;
use crate::scene::{Scene, SceneKind};

/// Where playback commands go
pub trait AudioSink {
    fn play(&mut self, request: PlayRequest);
    fn stop(&mut self, key: FlameKey);
    fn set_rate_all(&mut self, rate: f32);
}

impl AudioSink for AudioSystem {
    fn play(&mut self, request: PlayRequest) {
        AudioSystem::play(self, request);
    }

    fn stop(&mut self, key: FlameKey) {
        AudioSystem::stop(self, key);
    }

    fn set_rate_all(&mut self, rate: f32) {
        AudioSystem::set_rate_all(self, rate);
    }
}

/// What the event loop should do after a key event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyResponse {
    Continue,
    Quit,
}

/// The running scene and its playback policy
pub struct Controller {
    scene: Scene,
    transport: Transport,
}

impl Controller {
    pub fn new(scene: Scene, playback: &PlaybackConfig) -> Self {
        let transport = match scene.kind() {
            SceneKind::Orb => Transport::for_orb(playback),
            SceneKind::Flame => Transport::for_flame(playback),
        };
        Self { scene, transport }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.scene.resize(width, height);
    }

    /// Advance the scene one frame and draw it
    pub fn frame(&mut self, bands: &AudioBands, canvas: &mut Canvas) {
        self.scene.update(bands);
        self.scene.draw(canvas);
    }

    /// Handle one physical key event; auto-repeats are dropped so a held
    /// key triggers once
    pub fn key_event(
        &mut self,
        code: KeyCode,
        pressed: bool,
        repeat: bool,
        audio: Option<&mut dyn AudioSink>,
    ) -> KeyResponse {
        if repeat {
            return KeyResponse::Continue;
        }
        let Some(command) = command_for(code) else {
            return KeyResponse::Continue;
        };
        if pressed {
            self.press(command, audio)
        } else {
            self.release(command, audio);
            KeyResponse::Continue
        }
    }

    fn press(&mut self, command: Command, audio: Option<&mut dyn AudioSink>) -> KeyResponse {
        match command {
            Command::Flame(key) => {
                self.scene.key_down(key);
                if let Some(audio) = audio {
                    audio.play(self.transport.request(key));
                }
            }
            Command::PlaybackRate(rate) => {
                if self.transport.set_rate(rate) {
                    if let Some(audio) = audio {
                        audio.set_rate_all(rate);
                    }
                }
            }
            Command::VolumeUp => {
                self.transport.volume_up();
            }
            Command::VolumeDown => {
                self.transport.volume_down();
            }
            Command::OneSecondMode(on) => {
                self.transport.set_one_second_mode(on);
            }
            Command::Reset => self.scene.reset(),
            Command::Quit => return KeyResponse::Quit,
        }
        KeyResponse::Continue
    }

    fn release(&mut self, command: Command, audio: Option<&mut dyn AudioSink>) {
        let Command::Flame(key) = command else {
            return;
        };
        self.scene.key_up(key);
        if self.transport.stop_on_release() {
            if let Some(audio) = audio {
                audio.stop(key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::{Element, Zone};

    #[derive(Debug, PartialEq)]
    enum Event {
        Play(PlayRequest),
        Stop(FlameKey),
        Rate(f32),
    }

    #[derive(Default)]
    struct Log(Vec<Event>);

    impl AudioSink for Log {
        fn play(&mut self, request: PlayRequest) {
            self.0.push(Event::Play(request));
        }

        fn stop(&mut self, key: FlameKey) {
            self.0.push(Event::Stop(key));
        }

        fn set_rate_all(&mut self, rate: f32) {
            self.0.push(Event::Rate(rate));
        }
    }

    fn controller(kind: SceneKind) -> Controller {
        Controller::new(Scene::new(kind, 160, 120, Some(5)), &PlaybackConfig::default())
    }

    fn key_q() -> FlameKey {
        FlameKey::new(Element::Li, Zone::Outer)
    }

    fn send(c: &mut Controller, log: &mut Log, code: KeyCode, pressed: bool, repeat: bool) -> KeyResponse {
        c.key_event(code, pressed, repeat, Some(log as &mut dyn AudioSink))
    }

    #[test]
    fn test_auto_repeat_is_ignored() {
        let mut c = controller(SceneKind::Flame);
        let mut log = Log::default();

        send(&mut c, &mut log, KeyCode::KeyQ, true, false);
        send(&mut c, &mut log, KeyCode::KeyQ, true, true);
        send(&mut c, &mut log, KeyCode::KeyQ, true, true);
        assert_eq!(log.0.len(), 1);
        assert!(matches!(log.0[0], Event::Play(PlayRequest { key, .. }) if key == key_q()));
    }

    #[test]
    fn test_orb_stops_sound_on_release() {
        let mut c = controller(SceneKind::Orb);
        let mut log = Log::default();

        send(&mut c, &mut log, KeyCode::KeyQ, true, false);
        send(&mut c, &mut log, KeyCode::KeyQ, false, false);
        assert_eq!(log.0.len(), 2);
        assert_eq!(log.0[1], Event::Stop(key_q()));
    }

    #[test]
    fn test_flame_plays_through_release() {
        let mut c = controller(SceneKind::Flame);
        let mut log = Log::default();

        send(&mut c, &mut log, KeyCode::KeyQ, true, false);
        send(&mut c, &mut log, KeyCode::KeyQ, false, false);
        assert_eq!(log.0.len(), 1);
        assert!(matches!(log.0[0], Event::Play(_)));
    }

    #[test]
    fn test_rate_reaches_playing_voices_only_when_adjustable() {
        let mut flame = controller(SceneKind::Flame);
        let mut log = Log::default();
        send(&mut flame, &mut log, KeyCode::Digit4, true, false);
        assert_eq!(log.0, vec![Event::Rate(0.5)]);

        // Later presses use the new rate
        send(&mut flame, &mut log, KeyCode::KeyW, true, false);
        assert!(matches!(log.0[1], Event::Play(PlayRequest { rate, .. }) if rate == 0.5));

        let mut orb = controller(SceneKind::Orb);
        let mut log = Log::default();
        send(&mut orb, &mut log, KeyCode::Digit2, true, false);
        assert!(log.0.is_empty());
        assert_eq!(orb.transport().rate(), 1.0);
    }

    #[test]
    fn test_volume_and_one_second_mode_shape_requests() {
        let mut c = controller(SceneKind::Flame);
        let mut log = Log::default();
        send(&mut c, &mut log, KeyCode::PageUp, true, false);
        send(&mut c, &mut log, KeyCode::KeyP, true, false);
        send(&mut c, &mut log, KeyCode::KeyQ, true, false);

        let Event::Play(request) = &log.0[0] else {
            panic!("expected a play request");
        };
        assert!((request.gain - 0.7).abs() < 1e-6);
        assert_eq!(request.max_seconds, Some(1.0));
    }

    #[test]
    fn test_space_resets_selection() {
        let mut c = controller(SceneKind::Flame);
        let mut log = Log::default();
        send(&mut c, &mut log, KeyCode::KeyQ, true, false);
        send(&mut c, &mut log, KeyCode::KeyW, true, false);
        send(&mut c, &mut log, KeyCode::Space, true, false);

        let Scene::Flame(flame) = c.scene() else {
            panic!("expected flame scene");
        };
        assert!(!flame.selection().is_multi());
        assert_eq!(flame.selection().single(), None);
    }

    #[test]
    fn test_escape_quits_and_unmapped_keys_do_nothing() {
        let mut c = controller(SceneKind::Flame);
        let mut log = Log::default();
        assert_eq!(send(&mut c, &mut log, KeyCode::Escape, true, false), KeyResponse::Quit);
        assert_eq!(send(&mut c, &mut log, KeyCode::F5, true, false), KeyResponse::Continue);
        assert!(log.0.is_empty());

        // No audio sink: visuals still follow the keys
        assert_eq!(c.key_event(KeyCode::KeyQ, true, false, None), KeyResponse::Continue);
    }
}
