//! Audio system: cpal output stream, live mixer and FFT analysis.

use anyhow::{anyhow, Context};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::{error, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use super::fft::spawn_fft_thread;
use super::{AudioBands, ClipCache, Mixer, PlayRequest};
use crate::keymap::{FlameKey, SoundLibrary};
use crate::params::{FFTConfig, PlaybackConfig, RecordingConfig};

type WavRecorder = hound::WavWriter<std::io::BufWriter<std::fs::File>>;

/// Analysis backlog beyond which the oldest samples are dropped
const FFT_BACKLOG_WINDOWS: usize = 4;

/// Audio system managing playback and FFT analysis
pub struct AudioSystem {
    /// Voices shared with the output callback
    mixer: Arc<Mutex<Mixer>>,

    /// Decoded clips (UI thread only)
    clips: ClipCache,

    /// Shared FFT frequency bands (thread-safe)
    audio_bands: Arc<Mutex<AudioBands>>,

    /// Audio output stream (kept alive)
    _stream: cpal::Stream,

    running: Arc<AtomicBool>,
    fft_thread: Option<thread::JoinHandle<()>>,
}

impl AudioSystem {
    /// Open the default output device and start mixing
    pub fn new(
        mut fft_config: FFTConfig,
        playback: &PlaybackConfig,
        library: SoundLibrary,
        recording_config: Option<&RecordingConfig>,
    ) -> anyhow::Result<Self> {
        // Setup audio output device
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow!("No audio output device found"))?;

        let config = device
            .default_output_config()
            .context("Failed to get audio config")?;
        let sample_rate = config.sample_rate().0;
        let channels = config.channels();

        info!(
            "Audio: {} @ {}Hz, {} channels",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            sample_rate,
            channels
        );

        // Analyse at the rate the mix is actually produced
        fft_config.sample_rate_hz = sample_rate as usize;
        fft_config.validate().map_err(|e| anyhow!("Invalid FFT config: {}", e))?;

        // Create WAV writer if recording
        let wav_writer: Option<Arc<Mutex<WavRecorder>>> = match recording_config {
            Some(config) => {
                let spec = hound::WavSpec {
                    channels,
                    sample_rate,
                    bits_per_sample: 32,
                    sample_format: hound::SampleFormat::Float,
                };
                let path = config.audio_path();
                let writer = hound::WavWriter::create(&path, spec)
                    .with_context(|| format!("Failed to create WAV writer {}", path.display()))?;
                Some(Arc::new(Mutex::new(writer)))
            }
            None => None,
        };

        let mixer = Arc::new(Mutex::new(Mixer::new(
            sample_rate,
            channels,
            playback.output_limit,
        )));
        let mixer_clone = Arc::clone(&mixer);

        let fft_buffer = Arc::new(Mutex::new(Vec::<f32>::new()));
        let fft_buffer_clone = Arc::clone(&fft_buffer);
        let backlog = fft_config.fft_size * FFT_BACKLOG_WINDOWS;

        let audio_bands = Arc::new(Mutex::new(AudioBands::default()));
        let audio_bands_fft = Arc::clone(&audio_bands);

        // Build audio output stream
        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    mixer_clone.lock().unwrap().render(data);

                    // Mono fold-down for analysis
                    let mut fft_buf = fft_buffer_clone.lock().unwrap();
                    for frame in data.chunks(channels as usize) {
                        fft_buf.push(frame.iter().sum::<f32>() / frame.len() as f32);
                    }
                    if fft_buf.len() > backlog {
                        let excess = fft_buf.len() - backlog;
                        fft_buf.drain(0..excess);
                    }

                    // Record to WAV if recording
                    if let Some(ref writer) = wav_writer {
                        if let Ok(mut w) = writer.lock() {
                            for &sample in data.iter() {
                                let _ = w.write_sample(sample);
                            }
                        }
                    }
                },
                |err| error!("Audio stream error: {}", err),
                None,
            )
            .context("Failed to build audio stream")?;

        stream.play().context("Failed to start audio stream")?;

        // Start FFT analysis thread
        let running = Arc::new(AtomicBool::new(true));
        let fft_thread = spawn_fft_thread(
            fft_config,
            fft_buffer,
            audio_bands_fft,
            Arc::clone(&running),
        );

        Ok(Self {
            mixer,
            clips: ClipCache::new(library),
            audio_bands,
            _stream: stream,
            running,
            fft_thread: Some(fft_thread),
        })
    }

    /// Decode every mapped sound now instead of on first press
    pub fn preload(&mut self) {
        let loaded = self.clips.preload_all();
        info!(
            "Preloaded {}/{} sounds from {}",
            loaded,
            FlameKey::ALL.len(),
            self.clips.library().dir().display()
        );
    }

    /// Start a clip; missing or undecodable sounds are skipped
    pub fn play(&mut self, request: PlayRequest) {
        let Some(clip) = self.clips.get(request.key) else {
            return;
        };
        self.mixer.lock().unwrap().play(
            request.key,
            clip,
            request.rate,
            request.gain,
            request.max_seconds,
        );
    }

    pub fn stop(&self, key: FlameKey) {
        self.mixer.lock().unwrap().stop(key);
    }

    pub fn set_rate_all(&self, rate: f32) {
        self.mixer.lock().unwrap().set_rate_all(rate);
    }

    /// Get current audio frequency bands (thread-safe)
    pub fn bands(&self) -> AudioBands {
        *self.audio_bands.lock().unwrap()
    }
}

impl Drop for AudioSystem {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.fft_thread.take() {
            let _ = handle.join();
        }
    }
}
