use std::sync::mpsc::{channel, sync_channel, Receiver, Sender, SyncSender, TrySendError};
use std::thread;

use anyhow::Result;

use crate::clipboard;
use crate::feedback::{self, Cue};
use crate::ollama::OllamaClient;
use crate::router::{splice_clipboard, RouteDecision, WakeWordRouter};
use crate::transcription::Transcriber;

/// One recording session's capture, handed off for processing
struct PipelineJob {
    chunks: Vec<Vec<u8>>,
    sample_rate: u32,
}

/// Outcome of a session's encode→transcribe→route→clipboard chain
#[derive(Debug)]
pub enum PipelineResult {
    /// Final text that was placed on the clipboard
    Completed { text: String },
    /// The chain failed before anything reached the clipboard
    Failed { error: String },
}

/// Background worker running the full post-capture chain, one session at a time.
///
/// The job channel is bounded to a single slot: submitting while a previous
/// session's tail (transcription or LLM call) is still processing is rejected
/// rather than run concurrently, so the chain never overlaps itself.
pub struct PipelineWorker {
    job_tx: SyncSender<PipelineJob>,
}

impl PipelineWorker {
    pub fn new(
        transcriber: Transcriber,
        router: WakeWordRouter,
        ollama: OllamaClient,
    ) -> (Self, Receiver<PipelineResult>) {
        let (job_tx, job_rx) = sync_channel(1);
        let (result_tx, result_rx) = channel();

        thread::spawn(move || {
            Self::worker_loop(job_rx, result_tx, transcriber, router, ollama);
        });

        (PipelineWorker { job_tx }, result_rx)
    }

    /// Hand a finished capture to the worker. Returns false when the worker is
    /// still busy with a previous session and the capture was dropped.
    pub fn submit(&self, chunks: Vec<Vec<u8>>, sample_rate: u32) -> bool {
        match self.job_tx.try_send(PipelineJob { chunks, sample_rate }) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                eprintln!("⚠️  Pipeline busy with a previous session, dropping this capture");
                false
            }
            Err(TrySendError::Disconnected(_)) => {
                eprintln!("❌ Pipeline worker disconnected");
                false
            }
        }
    }

    fn worker_loop(
        job_rx: Receiver<PipelineJob>,
        result_tx: Sender<PipelineResult>,
        transcriber: Transcriber,
        router: WakeWordRouter,
        ollama: OllamaClient,
    ) {
        println!("🔧 Pipeline worker thread started");

        for job in job_rx {
            let result = match Self::process(job, &transcriber, &router, &ollama) {
                Ok(text) => PipelineResult::Completed { text },
                Err(e) => PipelineResult::Failed {
                    error: format!("{:#}", e),
                },
            };

            if result_tx.send(result).is_err() {
                println!("⚠️  Pipeline worker: main thread disconnected");
                break;
            }
        }

        println!("🔧 Pipeline worker thread stopped");
    }

    fn process(
        job: PipelineJob,
        transcriber: &Transcriber,
        router: &WakeWordRouter,
        ollama: &OllamaClient,
    ) -> Result<String> {
        let container = crate::wav::encode(&job.chunks, job.sample_rate)?;
        let samples = crate::wav::decode(&container)?;

        let transcript = transcriber.transcribe(&samples)?;

        let final_text = match router.route(&transcript) {
            RouteDecision::Passthrough => {
                println!("Assistant not invoked");
                transcript
            }
            RouteDecision::Assistant { prompt } => {
                let clipboard_text = match clipboard::get_text() {
                    Ok(text) => text,
                    Err(e) => {
                        eprintln!("⚠️  Could not read clipboard for splice: {}", e);
                        String::new()
                    }
                };
                let prompt = splice_clipboard(&prompt, &clipboard_text);
                println!("Assistant invoked: prompt = {}", prompt);

                // An LLM failure degrades to an inline error string delivered
                // to the clipboard; the session itself still completes
                match ollama.generate(&prompt) {
                    Ok(text) => text,
                    Err(e) => format!("{:#}", e),
                }
            }
        };

        clipboard::set_text(&final_text)?;

        println!();
        println!("Result:");
        println!("{}", final_text);

        feedback::play_best_effort(Cue::Complete);

        Ok(final_text)
    }
}
