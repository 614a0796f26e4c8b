use anyhow::{Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use std::sync::{Arc, Mutex};

use crate::wav::SAMPLE_RATE;

/// Samples per PCM chunk handed to the encoder
pub const FRAMES_PER_CHUNK: usize = 1024;

/// Microphone capture for one recording session at a time.
///
/// The input callback downmixes to mono f32 and appends to a shared buffer
/// while the stream is live; `stop_recording` quantizes the take to 16-bit PCM
/// byte chunks for the WAV encoder. There is no cap on recording length -
/// memory grows linearly for as long as the stream runs.
pub struct AudioCapture {
    device: Device,
    config: StreamConfig,
    buffer: Arc<Mutex<Vec<f32>>>,
    stream: Option<Stream>,
}

impl AudioCapture {
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .context("No input device available")?;

        println!("Using audio input device: {}", device.name()?);

        let default_config = device
            .default_input_config()
            .context("Failed to get default input config")?;

        let mut config: StreamConfig = default_config.clone().into();

        // Prefer capturing at 16kHz directly; otherwise capture at the device
        // rate and resample on stop
        let supports_16k = device
            .supported_input_configs()
            .context("Failed to query supported input configs")?
            .any(|supported| {
                supported.min_sample_rate().0 <= SAMPLE_RATE
                    && supported.max_sample_rate().0 >= SAMPLE_RATE
            });

        if supports_16k {
            config.sample_rate = cpal::SampleRate(SAMPLE_RATE);
        } else {
            println!(
                "Warning: 16kHz not supported, capturing at {} Hz and resampling",
                config.sample_rate.0
            );
        }

        println!(
            "Capture config: {} channels, {} Hz",
            config.channels, config.sample_rate.0
        );

        Ok(AudioCapture {
            device,
            config,
            buffer: Arc::new(Mutex::new(Vec::new())),
            stream: None,
        })
    }

    pub fn is_recording(&self) -> bool {
        self.stream.is_some()
    }

    pub fn start_recording(&mut self) -> Result<()> {
        if self.stream.is_some() {
            return Ok(()); // Already recording
        }

        self.buffer.lock().unwrap().clear();

        let buffer = Arc::clone(&self.buffer);
        let channels = self.config.channels as usize;

        let err_fn = |err| eprintln!("🔴 Audio stream error: {}", err);

        let stream = self
            .device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    // Handle poisoned mutex gracefully in audio callback
                    let Ok(mut buf) = buffer.lock() else {
                        eprintln!("⚠️  Audio buffer mutex poisoned, dropping audio data");
                        return;
                    };

                    if channels == 1 {
                        buf.extend_from_slice(data);
                    } else {
                        // Average channels to get mono
                        for frame in data.chunks(channels) {
                            let mono: f32 = frame.iter().sum::<f32>() / channels as f32;
                            buf.push(mono);
                        }
                    }
                },
                err_fn,
                None,
            )
            .context("Failed to build input stream (check microphone permissions)")?;

        stream.play().context("Failed to start audio stream")?;

        self.stream = Some(stream);
        println!("Recording started");

        Ok(())
    }

    /// Stop the stream and return the take as ordered 16-bit PCM byte chunks.
    pub fn stop_recording(&mut self) -> Result<Vec<Vec<u8>>> {
        if let Some(stream) = self.stream.take() {
            drop(stream);
            println!("Recording stopped");
        }

        let samples = {
            let mut buffer = self.buffer.lock().unwrap();
            std::mem::take(&mut *buffer)
        };

        let actual_sample_rate = self.config.sample_rate.0;

        println!(
            "Captured {} samples ({:.2}s of audio at {} Hz)",
            samples.len(),
            samples.len() as f32 / actual_sample_rate as f32,
            actual_sample_rate
        );

        let samples = if actual_sample_rate != SAMPLE_RATE {
            println!("Resampling from {} Hz to {} Hz...", actual_sample_rate, SAMPLE_RATE);
            Self::resample(&samples, actual_sample_rate, SAMPLE_RATE)
        } else {
            samples
        };

        Ok(Self::to_pcm_chunks(&samples))
    }

    /// Quantize normalized f32 samples into little-endian i16 chunks of
    /// FRAMES_PER_CHUNK frames (last chunk may be shorter)
    fn to_pcm_chunks(samples: &[f32]) -> Vec<Vec<u8>> {
        samples
            .chunks(FRAMES_PER_CHUNK)
            .map(|chunk| {
                let mut bytes = Vec::with_capacity(chunk.len() * 2);
                for &sample in chunk {
                    let quantized = (sample.clamp(-1.0, 1.0) * 32767.0) as i16;
                    bytes.extend_from_slice(&quantized.to_le_bytes());
                }
                bytes
            })
            .collect()
    }

    // Simple linear interpolation resampling
    fn resample(input: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
        if from_rate == to_rate || input.is_empty() {
            return input.to_vec();
        }

        let ratio = from_rate as f64 / to_rate as f64;
        let output_len = (input.len() as f64 / ratio) as usize;
        let mut output = Vec::with_capacity(output_len);

        for i in 0..output_len {
            let src_idx = i as f64 * ratio;
            let src_idx_floor = src_idx.floor() as usize;
            let src_idx_ceil = (src_idx_floor + 1).min(input.len() - 1);
            let frac = src_idx - src_idx_floor as f64;

            let sample = input[src_idx_floor] * (1.0 - frac) as f32
                + input[src_idx_ceil] * frac as f32;

            output.push(sample);
        }

        output
    }
}

impl Drop for AudioCapture {
    fn drop(&mut self) {
        let _ = self.stop_recording();
    }
}
