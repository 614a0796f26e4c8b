use anyhow::{Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::f32::consts::TAU;
use std::time::Duration;

/// The three audible status cues. Informal signaling only - no cue failure may
/// abort a recording or the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Short low tone when a recording starts
    RecordingStarted,
    /// Long higher tone when start fires while already recording
    Busy,
    /// Brief tone when the transcript has landed on the clipboard
    Complete,
}

impl Cue {
    fn frequency(self) -> f32 {
        match self {
            Cue::RecordingStarted => 350.0,
            Cue::Busy => 550.0,
            Cue::Complete => 250.0,
        }
    }

    fn duration(self) -> Duration {
        match self {
            Cue::RecordingStarted => Duration::from_millis(150),
            Cue::Busy => Duration::from_millis(800),
            Cue::Complete => Duration::from_millis(50),
        }
    }
}

/// Synthesize a sine tone on the default output device, blocking for the cue's
/// duration. The stream is opened per cue and dropped when the tone ends.
pub fn play(cue: Cue) -> Result<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .context("No output device available for cue playback")?;

    let supported = device
        .default_output_config()
        .context("Failed to get default output config")?;

    let sample_rate = supported.sample_rate().0 as f32;
    let channels = supported.channels() as usize;
    let config: cpal::StreamConfig = supported.into();

    let phase_step = cue.frequency() * TAU / sample_rate;
    let mut phase: f32 = 0.0;

    let err_fn = |err| eprintln!("Cue stream error: {}", err);

    let stream = device
        .build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                for frame in data.chunks_mut(channels) {
                    let sample = phase.sin() * 0.2;
                    phase += phase_step;
                    if phase >= TAU {
                        phase -= TAU;
                    }
                    for out in frame.iter_mut() {
                        *out = sample;
                    }
                }
            },
            err_fn,
            None,
        )
        .context("Failed to build output stream for cue")?;

    stream.play().context("Failed to start cue playback")?;
    std::thread::sleep(cue.duration());
    drop(stream);

    Ok(())
}

/// Play a cue and log instead of propagating when the output device is absent.
pub fn play_best_effort(cue: Cue) {
    if let Err(e) = play(cue) {
        eprintln!("⚠️  Could not play audio cue {:?}: {}", cue, e);
    }
}
