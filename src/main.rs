//! Flamekeys - play the colours of a flame test from the keyboard
//!
//! Each key stands for one zone of one element's flame: pressing it
//! shows the colour and plays the tone derived from it.

use anyhow::Context;
use clap::Parser;
use log::{error, info, warn};
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use flamekeys::audio::AudioSystem;
use flamekeys::canvas::Canvas;
use flamekeys::cli::{Cli, Command, PlayArgs, ToneArgs};
use flamekeys::controller::{AudioSink, Controller, KeyResponse};
use flamekeys::params::*;
use flamekeys::rendering::RenderSystem;
use flamekeys::scene::{Scene, SceneKind};
use flamekeys::tone;

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,
    canvas: Canvas,

    // Scene and sound
    controller: Controller,
    audio: Option<AudioSystem>,

    // Configuration
    render_config: RenderConfig,
    recording_config: Option<RecordingConfig>,

    frame_num: usize,
}

impl App {
    fn new(args: &PlayArgs) -> anyhow::Result<Self> {
        let render_config = args.render_config();
        let recording_config = args.create_recording_config()?;
        let playback = PlaybackConfig::default();

        let (width, height) = (render_config.window_width, render_config.window_height);
        let scene = Scene::new(args.scene, width, height, args.seed);

        // Visuals keep running without sound
        let audio = match AudioSystem::new(
            FFTConfig::default(),
            &playback,
            args.sound_library(),
            recording_config.as_ref(),
        ) {
            Ok(mut audio) => {
                if args.scene == SceneKind::Flame {
                    audio.preload();
                }
                Some(audio)
            }
            Err(e) => {
                error!("Audio unavailable, running without sound: {:#}", e);
                None
            }
        };

        Ok(Self {
            window: None,
            render_system: None,
            canvas: Canvas::new(width, height),
            controller: Controller::new(scene, &playback),
            audio,
            render_config,
            recording_config,
            frame_num: 0,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if let Some(render_system) = self.render_system.as_mut() {
            render_system.resize(width, height);
        }
        self.canvas.resize(width, height);
        self.controller.resize(width, height);
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        let pressed = event.state == ElementState::Pressed;
        let audio = self.audio.as_mut().map(|a| a as &mut dyn AudioSink);
        if self.controller.key_event(code, pressed, event.repeat, audio) == KeyResponse::Quit {
            event_loop.exit();
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        let window_attributes = Window::default_attributes()
            .with_title("Flamekeys")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        // Draw at the physical pixel size of the window
        let size = window.inner_size();
        self.resize(size.width, size.height);

        match pollster::block_on(RenderSystem::new(Arc::clone(&window), &self.canvas)) {
            Ok(render_system) => self.render_system = Some(render_system),
            Err(e) => {
                error!("Failed to initialize rendering: {:#}", e);
                event_loop.exit();
                return;
            }
        }

        info!("Flamekeys is running ({:?} scene)", self.controller.scene().kind());
        info!("Keys Q-U / A-J / Z-M play flames, ESC quits");

        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(event_loop, &event),
            WindowEvent::RedrawRequested => self.render_frame(event_loop),
            _ => {}
        }
    }
}

impl App {
    /// Advance the scene one frame and present it
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let bands = self
            .audio
            .as_ref()
            .map(|audio| audio.bands())
            .unwrap_or_default();

        self.controller.frame(&bands, &mut self.canvas);

        if let Some(render_system) = self.render_system.as_mut() {
            match render_system.render(&self.canvas) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    render_system.reconfigure();
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    error!("GPU out of memory");
                    event_loop.exit();
                }
                Err(e) => warn!("Render error: {:?}", e),
            }
        }

        // Capture frame if recording
        if let Some(config) = &self.recording_config {
            let path = config.frame_path(self.frame_num);
            if let Err(e) = self.canvas.save_png(&path) {
                error!("Failed to save frame {}: {:#}", self.frame_num, e);
            }
            if self.frame_num + 1 >= config.total_frames() {
                info!(
                    "Recording complete: {} frames in {}",
                    config.total_frames(),
                    config.output_dir.display()
                );
                event_loop.exit();
            }
        }
        self.frame_num += 1;
    }
}

fn run_play(args: &PlayArgs) -> anyhow::Result<()> {
    let mut app = App::new(args)?;
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop.run_app(&mut app).context("Event loop failed")?;
    Ok(())
}

fn run_tone(args: &ToneArgs) -> anyhow::Result<()> {
    let colors = args.colors()?;
    let tones = tone::convert(&colors, args.element, &args.out, &ToneConfig::default())?;
    for tone in &tones {
        println!("{}", tone);
    }
    println!("Analysis chart → {}", tone::analysis_path(&args.out).display());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Play(args) => run_play(&args),
        Command::Tone(args) => run_tone(&args),
    }
}
