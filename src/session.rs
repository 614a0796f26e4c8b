use anyhow::Result;

use crate::audio::AudioCapture;
use crate::feedback::{self, Cue};
use crate::pipeline::PipelineWorker;
use crate::wav::SAMPLE_RATE;

/// Lifecycle of the app, mutated only through SessionController methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Recording,
    ShuttingDown,
}

impl SessionState {
    /// Whether a start-recording request may open the capture stream
    pub fn can_start(self) -> bool {
        matches!(self, SessionState::Idle)
    }

    /// Whether a stop-recording request has a session to close
    pub fn can_stop(self) -> bool {
        matches!(self, SessionState::Recording)
    }
}

/// Owns the session state machine, the capture device, and the pipeline handle.
///
/// Hotkey events land here; the controller decides whether they start a
/// session, close one, signal busy, or shut the app down.
pub struct SessionController {
    state: SessionState,
    capture: AudioCapture,
    pipeline: PipelineWorker,
}

impl SessionController {
    pub fn new(capture: AudioCapture, pipeline: PipelineWorker) -> Self {
        SessionController {
            state: SessionState::Idle,
            capture,
            pipeline,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Start hotkey. While recording this is a busy signal, not an error:
    /// the longer, higher-pitched cue plays and nothing else changes.
    pub fn start_recording(&mut self) -> Result<()> {
        if !self.state.can_start() {
            feedback::play_best_effort(Cue::Busy);
            return Ok(());
        }

        feedback::play_best_effort(Cue::RecordingStarted);
        self.capture.start_recording()?;
        self.state = SessionState::Recording;

        Ok(())
    }

    /// Stop hotkey. Closes the capture stream and hands the take to the
    /// pipeline worker; the transcribe→route→clipboard chain runs in the
    /// background while the controller returns to Idle.
    pub fn stop_recording(&mut self) -> Result<()> {
        if !self.state.can_stop() {
            return Ok(());
        }

        let chunks = self.capture.stop_recording()?;
        self.state = SessionState::Idle;

        if !chunks.is_empty() {
            self.pipeline.submit(chunks, SAMPLE_RATE);
        } else {
            println!("Empty capture, nothing to transcribe");
        }

        Ok(())
    }

    /// Quit hotkey. Always transitions to ShuttingDown, closing any live
    /// capture stream first.
    pub fn shutdown(&mut self) {
        if self.state == SessionState::Recording {
            if let Err(e) = self.capture.stop_recording() {
                eprintln!("⚠️  Failed to close capture stream on shutdown: {}", e);
            }
        }
        self.state = SessionState::ShuttingDown;
    }

    pub fn is_shutting_down(&self) -> bool {
        self.state == SessionState::ShuttingDown
    }
}
