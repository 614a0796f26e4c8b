mod audio;
mod clipboard;
mod config;
mod feedback;
mod hotkey;
mod model_download;
mod ollama;
mod pipeline;
mod router;
mod session;
mod transcription;
mod wav;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tao::event_loop::{ControlFlow, EventLoop};
#[cfg(target_os = "macos")]
use tao::platform::macos::{ActivationPolicy, EventLoopExtMacOS};

use audio::AudioCapture;
use config::Config;
use hotkey::{HotkeyEvent, HotkeyManager};
use model_download::ModelDownloader;
use ollama::OllamaClient;
use pipeline::{PipelineResult, PipelineWorker};
use router::WakeWordRouter;
use session::SessionController;
use transcription::Transcriber;

#[derive(Parser)]
#[command(name = "winthrop")]
#[command(about = "Push-to-talk dictation to the clipboard with a wake-word assistant", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Download a Whisper model
    DownloadModel {
        /// Model to download (e.g., base.en, medium.en). Defaults to the configured model
        model: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::DownloadModel { model }) => download_model_command(&model),
        None => run_app(),
    }
}

fn download_model_command(model_name: &Option<String>) -> Result<()> {
    println!("Winthrop - Model Downloader");
    println!();

    // If no model specified, use the configured model
    let model_to_download = if let Some(name) = model_name {
        name.clone()
    } else {
        let config = Config::load_or_create()?;
        println!(
            "No model specified, using configured model: {}",
            config.transcription.model
        );
        println!();
        config.transcription.model
    };

    let models_dir = Config::models_dir()?;
    let downloader = ModelDownloader::new(models_dir.clone());

    println!("Available models:");
    for (name, size, desc) in ModelDownloader::list_available_models() {
        let marker = if name == model_to_download { "→" } else { " " };
        println!("  {} {} - {} ({})", marker, name, desc, size);
    }
    println!();

    println!("Models directory: {}", models_dir.display());
    println!();

    downloader.ensure_model_exists(&model_to_download)?;

    println!();
    println!("✓ Model setup complete!");

    if model_name.is_some() {
        println!();
        println!("To use this model, update ~/.winthrop/settings.yaml:");
        println!("  transcription:");
        println!("    model: \"{}\"", model_to_download);
    }

    Ok(())
}

fn run_app() -> Result<()> {
    println!("Winthrop - Push-to-Talk Dictation");

    let config = Config::load_or_create()?;
    println!("Configuration loaded successfully");

    // Check the model exists before paying the load cost
    let model_path = Config::models_dir()?
        .join(format!("ggml-{}.bin", config.transcription.model));
    if !model_path.exists() {
        eprintln!();
        eprintln!("✗ Whisper model not found: {}", config.transcription.model);
        eprintln!();
        eprintln!("Download it with:");
        eprintln!("  winthrop download-model {}", config.transcription.model);
        eprintln!();
        anyhow::bail!("Whisper model not found");
    }

    println!("Loading Whisper model ({})...", config.transcription.model);
    let transcriber = Transcriber::new(config.transcription.clone())?;

    let router = WakeWordRouter::new(&config.assistant);
    let ollama = OllamaClient::new(&config.assistant);
    println!(
        "Assistant wake word: \"{}\" → {} at {}",
        config.assistant.wake_word, config.assistant.model, config.assistant.endpoint
    );

    let (pipeline, pipeline_results) = PipelineWorker::new(transcriber, router, ollama);

    let capture = AudioCapture::new()?;
    let mut controller = SessionController::new(capture, pipeline);

    #[allow(unused_mut)]
    let mut event_loop = EventLoop::new();

    // Background utility - no Dock icon
    #[cfg(target_os = "macos")]
    event_loop.set_activation_policy(ActivationPolicy::Accessory);

    let hotkey_manager = HotkeyManager::new(&config.hotkeys)?;

    println!("Ready - waiting for hotkeys");

    // Main idle loop: poll hotkeys and pipeline results until the quit hotkey
    event_loop.run(move |_event, _, control_flow| {
        *control_flow = ControlFlow::WaitUntil(
            std::time::Instant::now() + std::time::Duration::from_millis(50),
        );

        // Drain pipeline results (non-blocking)
        while let Ok(result) = pipeline_results.try_recv() {
            match result {
                PipelineResult::Completed { text } => {
                    println!("✓ Session complete ({} chars on clipboard)", text.chars().count());
                }
                PipelineResult::Failed { error } => {
                    eprintln!("❌ Session failed: {}", error);
                }
            }
        }

        if let Some(event) = hotkey_manager.poll_event() {
            match event {
                HotkeyEvent::StartRecording => {
                    println!("Hotkey: Start recording");
                    if let Err(e) = controller.start_recording() {
                        eprintln!("✗ Failed to start recording: {}", e);
                    }
                }
                HotkeyEvent::StopRecording => {
                    println!("Hotkey: Stop recording");
                    if let Err(e) = controller.stop_recording() {
                        eprintln!("✗ Failed to stop recording: {}", e);
                    }
                }
                HotkeyEvent::Quit => {
                    println!("Hotkey: Quit");
                    controller.shutdown();
                    *control_flow = ControlFlow::Exit;
                }
            }
        }
    });
}
