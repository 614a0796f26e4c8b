use crate::config::AssistantConfig;

/// What the pipeline should do with a finished transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// No wake word - the transcript goes to the clipboard as-is
    Passthrough,
    /// Wake word detected - forward this prompt to the LLM
    Assistant { prompt: String },
}

/// Decides whether a transcript is dictation or a request for the assistant.
///
/// The wake word only triggers as the transcript's first whitespace-delimited
/// token (case-insensitive, trailing " ,." stripped). Exact-token match only:
/// "winthropic" does not trigger "winthrop".
pub struct WakeWordRouter {
    wake_word: String,
    system_prompt: String,
}

impl WakeWordRouter {
    pub fn new(config: &AssistantConfig) -> Self {
        WakeWordRouter {
            wake_word: config.wake_word.to_ascii_lowercase(),
            system_prompt: config.system_prompt.clone(),
        }
    }

    pub fn route(&self, transcript: &str) -> RouteDecision {
        let Some(first_token) = transcript.split_whitespace().next() else {
            // Empty or whitespace-only transcript - nothing to route
            return RouteDecision::Passthrough;
        };

        let first_word = first_token
            .to_ascii_lowercase()
            .trim_end_matches([' ', ',', '.'])
            .to_string();

        if first_word != self.wake_word {
            return RouteDecision::Passthrough;
        }

        // Remove the wake word once at its first occurrence, then strip the
        // punctuation/space that trailed it ("Winthrop, write..." -> "write...")
        let body = self.strip_wake_word(transcript);
        let body = body.trim_start_matches([' ', ',', '.']);

        RouteDecision::Assistant {
            prompt: format!("{}{}", self.system_prompt, body),
        }
    }

    fn strip_wake_word(&self, transcript: &str) -> String {
        // ASCII lowercasing keeps byte offsets stable, so the match position
        // in the lowered copy is valid in the original
        let lowered = transcript.to_ascii_lowercase();
        match lowered.find(&self.wake_word) {
            Some(pos) => {
                let mut body = String::with_capacity(transcript.len());
                body.push_str(&transcript[..pos]);
                body.push_str(&transcript[pos + self.wake_word.len()..]);
                body
            }
            None => transcript.to_string(),
        }
    }
}

/// Substitute a trailing "in my clipboard" reference with the clipboard text.
///
/// The prompt references the clipboard when, after stripping trailing " ,.?!",
/// it has more than 3 tokens and the last three (lowercased) are exactly
/// "in my clipboard". The replacement is a first-occurrence substitution of the
/// literal phrase with ": " plus the clipboard content.
pub fn splice_clipboard(prompt: &str, clipboard: &str) -> String {
    let stripped = prompt.trim_end_matches([' ', ',', '.', '?', '!']);
    let words: Vec<String> = stripped
        .split_whitespace()
        .map(|w| w.to_ascii_lowercase())
        .collect();

    if words.len() > 3 && words[words.len() - 3..] == ["in", "my", "clipboard"] {
        println!("Appending clipboard content to prompt");
        prompt.replacen("in my clipboard", &format!(": {}", clipboard), 1)
    } else {
        prompt.to_string()
    }
}
