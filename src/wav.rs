use anyhow::{Context, Result};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::io::Cursor;

/// Sample rate the whole pipeline runs at (Whisper's native rate)
pub const SAMPLE_RATE: u32 = 16000;

const CHANNELS: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;

/// Build an in-memory WAV container from captured PCM byte chunks.
///
/// The container is mono, 16-bit, at the given sample rate; the payload is the
/// concatenation of all chunks interpreted as little-endian i16 samples.
pub fn encode(chunks: &[Vec<u8>], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = WavSpec {
        channels: CHANNELS,
        sample_rate,
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    let mut writer = WavWriter::new(&mut cursor, spec)
        .context("Failed to create in-memory WAV writer")?;

    for chunk in chunks {
        for bytes in chunk.chunks_exact(2) {
            let sample = i16::from_le_bytes([bytes[0], bytes[1]]);
            writer.write_sample(sample)
                .context("Failed to write sample to WAV buffer")?;
        }
    }

    writer.finalize().context("Failed to finalize WAV header")?;

    Ok(cursor.into_inner())
}

/// Decode an in-memory WAV container into normalized f32 samples in [-1, 1].
///
/// Only accepts the shape `encode` produces: mono, 16-bit integer samples.
pub fn decode(data: &[u8]) -> Result<Vec<f32>> {
    let mut reader = WavReader::new(Cursor::new(data))
        .context("Failed to parse WAV container")?;

    let spec = reader.spec();
    if spec.channels != CHANNELS {
        anyhow::bail!("Expected mono WAV, got {} channels", spec.channels);
    }
    if spec.bits_per_sample != BITS_PER_SAMPLE || spec.sample_format != SampleFormat::Int {
        anyhow::bail!(
            "Expected 16-bit integer samples, got {}-bit {:?}",
            spec.bits_per_sample,
            spec.sample_format
        );
    }

    reader
        .samples::<i16>()
        .map(|sample| {
            let sample = sample.context("Failed to read sample from WAV buffer")?;
            Ok(sample as f32 / 32768.0)
        })
        .collect()
}
