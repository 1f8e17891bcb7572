//! Physical key → command mapping.

use winit::keyboard::KeyCode;

use crate::keymap::FlameKey;

/// What a key press asks the app to do
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Colour/sound key
    Flame(FlameKey),
    /// Set playback rate of playing and future clips
    PlaybackRate(f32),
    VolumeUp,
    VolumeDown,
    /// Cut clips after one second (true) or let them play out (false)
    OneSecondMode(bool),
    /// Clear the colour selection
    Reset,
    Quit,
}

pub fn command_for(code: KeyCode) -> Option<Command> {
    let command = match code {
        KeyCode::Digit1 => Command::PlaybackRate(1.0),
        KeyCode::Digit2 => Command::PlaybackRate(2.0),
        KeyCode::Digit3 => Command::PlaybackRate(3.0),
        KeyCode::Digit4 => Command::PlaybackRate(0.5),
        KeyCode::PageUp => Command::VolumeUp,
        KeyCode::PageDown => Command::VolumeDown,
        KeyCode::KeyP => Command::OneSecondMode(true),
        KeyCode::KeyO => Command::OneSecondMode(false),
        KeyCode::Space => Command::Reset,
        KeyCode::Escape => Command::Quit,
        other => return letter_for(other).and_then(FlameKey::from_letter).map(Command::Flame),
    };
    Some(command)
}

fn letter_for(code: KeyCode) -> Option<char> {
    let letter = match code {
        KeyCode::KeyA => 'A',
        KeyCode::KeyB => 'B',
        KeyCode::KeyC => 'C',
        KeyCode::KeyD => 'D',
        KeyCode::KeyE => 'E',
        KeyCode::KeyF => 'F',
        KeyCode::KeyG => 'G',
        KeyCode::KeyH => 'H',
        KeyCode::KeyJ => 'J',
        KeyCode::KeyM => 'M',
        KeyCode::KeyN => 'N',
        KeyCode::KeyQ => 'Q',
        KeyCode::KeyR => 'R',
        KeyCode::KeyS => 'S',
        KeyCode::KeyT => 'T',
        KeyCode::KeyU => 'U',
        KeyCode::KeyV => 'V',
        KeyCode::KeyW => 'W',
        KeyCode::KeyX => 'X',
        KeyCode::KeyY => 'Y',
        KeyCode::KeyZ => 'Z',
        _ => return None,
    };
    Some(letter)
}
