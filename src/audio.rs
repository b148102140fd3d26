//! WAV loading and waveform preprocessing.
//!
//! Scorers expect fixed-length mono waveforms at a known sample rate, so
//! every file goes through the same pipeline before scoring: resample, mix
//! down to mono, peak-normalize, then pad or trim to a fixed length.

use std::path::Path;

use crate::error::{Error, Result};

/// Default sample rate expected by detection models.
pub const DEFAULT_SAMPLE_RATE: u32 = 16_000;

/// Default fixed waveform length in samples (4 s at 16 kHz).
pub const DEFAULT_TARGET_LENGTH: usize = 64_000;

/// Load a WAV file as a mono f32 waveform.
///
/// Integer samples are scaled to `[-1, 1]`; multi-channel audio is mixed
/// down by averaging channels. Returns the samples and the file's sample
/// rate.
pub fn load_wav(path: impl AsRef<Path>) -> Result<(Vec<f32>, u32)> {
    let path = path.as_ref();
    let audio_err = |reason: String| Error::AudioLoad {
        path: path.to_path_buf(),
        reason,
    };

    let mut reader = hound::WavReader::open(path).map_err(|e| audio_err(e.to_string()))?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| audio_err(e.to_string()))?,
        hound::SampleFormat::Int => {
            let scale = 1.0 / (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<std::result::Result<_, _>>()
                .map_err(|e| audio_err(e.to_string()))?
        }
    };

    let mono = if spec.channels > 1 {
        samples
            .chunks(spec.channels as usize)
            .map(|frame| frame.iter().sum::<f32>() / spec.channels as f32)
            .collect()
    } else {
        samples
    };

    Ok((mono, spec.sample_rate))
}

/// Waveform preprocessing: resample, normalize, and fix the length.
#[derive(Debug, Clone)]
pub struct WaveformProcessor {
    /// Sample rate every waveform is converted to.
    pub target_sample_rate: u32,
    /// Fixed output length in samples; `None` leaves lengths untouched.
    pub target_length: Option<usize>,
}

impl Default for WaveformProcessor {
    fn default() -> Self {
        Self {
            target_sample_rate: DEFAULT_SAMPLE_RATE,
            target_length: Some(DEFAULT_TARGET_LENGTH),
        }
    }
}

impl WaveformProcessor {
    /// Create a processor for the given sample rate and fixed length.
    #[must_use]
    pub fn new(target_sample_rate: u32, target_length: Option<usize>) -> Self {
        Self {
            target_sample_rate,
            target_length,
        }
    }

    /// Process a mono waveform recorded at `sample_rate`.
    #[must_use]
    pub fn process(&self, samples: &[f32], sample_rate: u32) -> Vec<f32> {
        let mut waveform = if sample_rate == self.target_sample_rate {
            samples.to_vec()
        } else {
            resample_linear(samples, sample_rate, self.target_sample_rate)
        };

        // Peak normalization to [-1, 1]; silence stays silent.
        let peak = waveform.iter().fold(0.0f32, |m, &s| m.max(s.abs()));
        if peak > 0.0 {
            for s in &mut waveform {
                *s /= peak + 1e-8;
            }
        }

        if let Some(target) = self.target_length {
            if waveform.len() < target {
                waveform.resize(target, 0.0);
            } else {
                waveform.truncate(target);
            }
        }

        waveform
    }
}

/// Linear-interpolation resampling.
fn resample_linear(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if samples.is_empty() {
        return Vec::new();
    }
    let ratio = f64::from(from_rate) / f64::from(to_rate);
    let out_len = ((samples.len() as f64) / ratio).round() as usize;
    let mut out = Vec::with_capacity(out_len);
    for i in 0..out_len {
        let pos = i as f64 * ratio;
        let lower = pos.floor() as usize;
        let upper = (lower + 1).min(samples.len() - 1);
        let frac = (pos - lower as f64) as f32;
        out.push(samples[lower] * (1.0 - frac) + samples[upper] * frac);
    }
    out
}
