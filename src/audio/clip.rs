//! Decoded sound clips and the lazy per-key clip cache.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use log::{debug, warn};

use crate::keymap::{FlameKey, SoundLibrary};

/// Interleaved PCM samples normalised to [-1, 1]
#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    sample_rate: u32,
    channels: u16,
    samples: Vec<f32>,
}

impl Clip {
    pub fn new(sample_rate: u32, channels: u16, samples: Vec<f32>) -> Self {
        Self {
            sample_rate,
            channels: channels.max(1),
            samples,
        }
    }

    pub fn from_wav(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let reader = hound::WavReader::open(path)
            .with_context(|| format!("Failed to open sound file {}", path.display()))?;
        Self::decode(reader).with_context(|| format!("Failed to decode {}", path.display()))
    }

    pub fn from_reader<R: Read>(reader: R) -> anyhow::Result<Self> {
        Self::decode(hound::WavReader::new(reader)?)
    }

    fn decode<R: Read>(mut reader: hound::WavReader<R>) -> anyhow::Result<Self> {
        let spec = reader.spec();
        if spec.channels == 0 || spec.sample_rate == 0 {
            bail!("Invalid WAV header: {:?}", spec);
        }

        let samples = match spec.sample_format {
            hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?,
            hound::SampleFormat::Int => {
                let max_value = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|s| s as f32 / max_value))
                    .collect::<Result<Vec<_>, _>>()?
            }
        };

        Ok(Self::new(spec.sample_rate, spec.channels, samples))
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    pub fn duration_secs(&self) -> f32 {
        self.frames() as f32 / self.sample_rate as f32
    }

    /// Sample of `channel` at `frame`; mono clips answer for every channel
    pub fn sample(&self, frame: usize, channel: usize) -> f32 {
        let channel = channel.min(self.channels as usize - 1);
        self.samples
            .get(frame * self.channels as usize + channel)
            .copied()
            .unwrap_or(0.0)
    }
}

/// Decoded clips keyed by flame key, loaded on first use
pub struct ClipCache {
    library: SoundLibrary,
    clips: HashMap<FlameKey, Arc<Clip>>,
}

impl ClipCache {
    pub fn new(library: SoundLibrary) -> Self {
        Self {
            library,
            clips: HashMap::new(),
        }
    }

    pub fn library(&self) -> &SoundLibrary {
        &self.library
    }

    /// Cached clip for `key`, loading it if needed
    ///
    /// Failures are logged and not cached, so the next press tries again.
    pub fn get(&mut self, key: FlameKey) -> Option<Arc<Clip>> {
        if let Some(clip) = self.clips.get(&key) {
            return Some(Arc::clone(clip));
        }

        let path = self.library.path_for(key);
        match Clip::from_wav(&path) {
            Ok(clip) => {
                debug!(
                    "Loaded {} ({:.2}s, {} Hz, {} ch)",
                    path.display(),
                    clip.duration_secs(),
                    clip.sample_rate(),
                    clip.channels()
                );
                let clip = Arc::new(clip);
                self.clips.insert(key, Arc::clone(&clip));
                Some(clip)
            }
            Err(e) => {
                warn!("Error loading audio for {}: {:#}", key, e);
                None
            }
        }
    }

    /// Load every key's clip up front; returns how many loaded
    pub fn preload_all(&mut self) -> usize {
        FlameKey::ALL
            .into_iter()
            .filter(|&key| self.get(key).is_some())
            .count()
    }

    pub fn is_cached(&self, key: FlameKey) -> bool {
        self.clips.contains_key(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::{Element, Zone};
    use std::path::PathBuf;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("flamekeys_{}_{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_i16_wav(path: &Path, channels: u16, samples: &[i16]) {
        let spec = hound::WavSpec {
            channels,
            sample_rate: 22050,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_decode_int_wav() {
        let dir = temp_dir("decode");
        let path = dir.join("stereo.wav");
        write_i16_wav(&path, 2, &[16384, -16384, 32767, 0]);

        let clip = Clip::from_wav(&path).unwrap();
        assert_eq!(clip.channels(), 2);
        assert_eq!(clip.frames(), 2);
        assert_eq!(clip.sample_rate(), 22050);
        assert!((clip.sample(0, 0) - 0.5).abs() < 1e-4);
        assert!((clip.sample(0, 1) + 0.5).abs() < 1e-4);
        assert!((clip.sample(1, 0) - 1.0).abs() < 1e-3);
        assert_eq!(clip.sample(5, 0), 0.0);

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_mono_clip_serves_all_channels() {
        let clip = Clip::new(44100, 1, vec![0.25, 0.5]);
        assert_eq!(clip.sample(1, 0), 0.5);
        assert_eq!(clip.sample(1, 1), 0.5);
    }

    #[test]
    fn test_garbage_is_an_error() {
        let bytes: &[u8] = b"definitely not a wav file";
        assert!(Clip::from_reader(bytes).is_err());
    }

    #[test]
    fn test_cache_loads_lazily_and_retries_missing() {
        let dir = temp_dir("cache");
        let mut cache = ClipCache::new(SoundLibrary::new(&dir, SoundLibrary::DEFAULT_TEMPLATE));
        let key = FlameKey::new(Element::K, Zone::Inner);

        assert!(cache.get(key).is_none());
        assert!(!cache.is_cached(key));

        // The file shows up later: the next lookup picks it up
        write_i16_wav(&dir.join("K_inner.wav"), 1, &[0, 1000, -1000]);
        let clip = cache.get(key).unwrap();
        assert_eq!(clip.frames(), 3);
        assert!(cache.is_cached(key));

        let again = cache.get(key).unwrap();
        assert!(Arc::ptr_eq(&clip, &again));

        assert_eq!(cache.preload_all(), 1);
        let _ = std::fs::remove_dir_all(dir);
    }
}
