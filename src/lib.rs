//! Flamekeys library - flame-test colours as a playable, audio-reactive instrument

pub mod audio;
pub mod canvas;
pub mod cli;
pub mod controller;
pub mod flow;
pub mod input;
pub mod keymap;
pub mod palette;
pub mod params;
pub mod rendering;
pub mod scene;
pub mod tone;
