use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub hotkeys: HotkeyConfig,
    #[serde(default)]
    pub transcription: TranscriptionConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HotkeyConfig {
    #[serde(default = "default_start_hotkey")]
    pub start_recording: String,
    #[serde(default = "default_stop_hotkey")]
    pub stop_recording: String,
    #[serde(default = "default_quit_hotkey")]
    pub quit: String,
}

fn default_start_hotkey() -> String {
    "Ctrl+Alt+Z".to_string()
}

fn default_stop_hotkey() -> String {
    "Ctrl+Alt+X".to_string()
}

fn default_quit_hotkey() -> String {
    "Ctrl+Alt+V".to_string()
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        HotkeyConfig {
            start_recording: default_start_hotkey(),
            stop_recording: default_stop_hotkey(),
            quit: default_quit_hotkey(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranscriptionConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_use_gpu")]
    pub use_gpu: bool,
}

fn default_model() -> String {
    "medium.en".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_use_gpu() -> bool {
    true
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        TranscriptionConfig {
            model: default_model(),
            language: default_language(),
            use_gpu: default_use_gpu(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AssistantConfig {
    #[serde(default = "default_wake_word")]
    pub wake_word: String,
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_assistant_model")]
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_wake_word() -> String {
    "winthrop".to_string()
}

fn default_system_prompt() -> String {
    "You are a patent attorney.  Keep your response short and to the point. \
     Just give the response.  For instance, if responding to an email, just \
     respond with the body of the email.  Do not use headings or bullets.  "
        .to_string()
}

fn default_endpoint() -> String {
    "http://localhost:11434/api/generate".to_string()
}

fn default_assistant_model() -> String {
    "llama3".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for AssistantConfig {
    fn default() -> Self {
        AssistantConfig {
            wake_word: default_wake_word(),
            system_prompt: default_system_prompt(),
            endpoint: default_endpoint(),
            model: default_assistant_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Failed to get home directory")?;
        Ok(home.join(".winthrop"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("settings.yaml"))
    }

    pub fn models_dir() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("models"))
    }

    pub fn load_or_create() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = fs::read_to_string(&config_path)
                .context("Failed to read config file")?;
            let config: Config = serde_yaml::from_str(&contents)
                .context("Failed to parse config file")?;

            config.validate()?;

            Ok(config)
        } else {
            let config = Config::default();
            config.save()?;
            println!("Created default config at: {}", config_path.display());
            Ok(config)
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.hotkeys.start_recording.is_empty() {
            bail!("start_recording hotkey cannot be empty");
        }
        if self.hotkeys.stop_recording.is_empty() {
            bail!("stop_recording hotkey cannot be empty");
        }
        if self.hotkeys.quit.is_empty() {
            bail!("quit hotkey cannot be empty");
        }

        if self.transcription.model.is_empty() {
            bail!("model name cannot be empty");
        }
        if self.transcription.language.is_empty() {
            bail!("language code cannot be empty");
        }

        if self.assistant.wake_word.trim().is_empty() {
            bail!("wake_word cannot be empty");
        }
        if self.assistant.wake_word.split_whitespace().count() > 1 {
            bail!("wake_word must be a single token");
        }
        if self.assistant.endpoint.is_empty() {
            bail!("assistant endpoint cannot be empty");
        }
        if self.assistant.model.is_empty() {
            bail!("assistant model cannot be empty");
        }
        if self.assistant.timeout_secs == 0 {
            bail!("timeout_secs must be greater than 0");
        }

        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        let config_dir = Self::config_dir()?;
        fs::create_dir_all(&config_dir)
            .context("Failed to create config directory")?;

        let config_path = Self::config_path()?;
        let yaml = serde_yaml::to_string(self)
            .context("Failed to serialize config")?;

        fs::write(&config_path, yaml)
            .context("Failed to write config file")?;

        Ok(())
    }
}
