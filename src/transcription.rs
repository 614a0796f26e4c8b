use anyhow::{Context, Result};
use std::path::PathBuf;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::config::{Config, TranscriptionConfig};

/// Local Whisper speech-to-text. The model is loaded once at startup and the
/// context is reused for every recording session.
pub struct Transcriber {
    ctx: WhisperContext,
    config: TranscriptionConfig,
}

impl Transcriber {
    pub fn new(config: TranscriptionConfig) -> Result<Self> {
        let model_path = Self::model_path(&config.model)?;

        println!("Loading Whisper model from: {}", model_path.display());

        let ctx_params = WhisperContextParameters {
            use_gpu: config.use_gpu,
            ..Default::default()
        };

        let ctx = WhisperContext::new_with_params(&model_path.to_string_lossy(), ctx_params)
            .context("Failed to load Whisper model")?;

        println!("Whisper model loaded (GPU: {})", config.use_gpu);

        Ok(Transcriber { ctx, config })
    }

    pub fn model_path(model_name: &str) -> Result<PathBuf> {
        let models_dir = Config::models_dir()?;
        let model_filename = format!("ggml-{}.bin", model_name);
        let model_path = models_dir.join(&model_filename);

        if !model_path.exists() {
            anyhow::bail!(
                "Model file not found: {}\n\
                Download it with:\n  winthrop download-model {}\n\
                or place it in: {}",
                model_filename,
                model_name,
                models_dir.display()
            );
        }

        Ok(model_path)
    }

    /// Transcribe normalized mono 16kHz samples into text.
    pub fn transcribe(&self, audio_data: &[f32]) -> Result<String> {
        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });

        if !self.config.language.is_empty() && self.config.language != "auto" {
            params.set_language(Some(&self.config.language));
        }

        params.set_translate(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);

        // Suppress annotations like [BLANK_AUDIO], (coughs), etc.
        params.set_suppress_blank(true);
        params.set_suppress_non_speech_tokens(true);

        let mut state = self
            .ctx
            .create_state()
            .context("Failed to create Whisper state")?;

        state
            .full(params, audio_data)
            .context("Failed to run Whisper transcription")?;

        let num_segments = state
            .full_n_segments()
            .context("Failed to get number of segments")?;

        let mut result = String::new();
        for i in 0..num_segments {
            let segment = state
                .full_get_segment_text(i)
                .context("Failed to get segment text")?;
            result.push_str(&segment);
            result.push(' ');
        }

        Ok(result.trim().to_string())
    }
}
