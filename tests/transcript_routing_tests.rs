// End-to-end text path: WAV round-trip feeding the router, and the router
// feeding the clipboard splice, the way the pipeline worker chains them.

use winthrop::config::AssistantConfig;
use winthrop::router::{splice_clipboard, RouteDecision, WakeWordRouter};
use winthrop::wav;

fn test_router() -> WakeWordRouter {
    WakeWordRouter::new(&AssistantConfig {
        wake_word: "winthrop".to_string(),
        system_prompt: "<sys>".to_string(),
        ..AssistantConfig::default()
    })
}

#[test]
fn wav_round_trip_preserves_sample_values() {
    // Three chunks of a ramp through the i16 range
    let samples: Vec<i16> = (0..3072).map(|i| (i * 21 - 32000) as i16).collect();
    let chunks: Vec<Vec<u8>> = samples
        .chunks(1024)
        .map(|c| c.iter().flat_map(|s| s.to_le_bytes()).collect())
        .collect();

    let container = wav::encode(&chunks, wav::SAMPLE_RATE).unwrap();
    let decoded = wav::decode(&container).unwrap();

    assert_eq!(decoded.len(), samples.len());
    for (decoded, original) in decoded.iter().zip(&samples) {
        assert_eq!(*decoded, *original as f32 / 32768.0);
    }
}

#[test]
fn wav_round_trip_of_empty_session() {
    let container = wav::encode(&[], wav::SAMPLE_RATE).unwrap();
    assert!(wav::decode(&container).unwrap().is_empty());
}

#[test]
fn dictation_passes_through_unrouted() {
    let transcript = "This is a plain dictation about winthrop the town.";
    assert_eq!(test_router().route(transcript), RouteDecision::Passthrough);
}

#[test]
fn assistant_request_with_clipboard_reference() {
    // Full routed path: wake word stripped, system prompt prefixed, then the
    // trailing clipboard reference spliced with the clipboard content
    let decision = test_router().route("Winthrop, summarize the text in my clipboard");

    let RouteDecision::Assistant { prompt } = decision else {
        panic!("expected assistant routing");
    };
    assert_eq!(prompt, "<sys>summarize the text in my clipboard");

    let spliced = splice_clipboard(&prompt, "XYZ");
    assert_eq!(spliced, "<sys>summarize the text : XYZ");
}

#[test]
fn assistant_request_without_clipboard_reference_is_unchanged() {
    let decision = test_router().route("winthrop write a haiku about rain");

    let RouteDecision::Assistant { prompt } = decision else {
        panic!("expected assistant routing");
    };

    assert_eq!(splice_clipboard(&prompt, "XYZ"), prompt);
}

#[test]
fn custom_wake_word_is_honored() {
    let router = WakeWordRouter::new(&AssistantConfig {
        wake_word: "Jeeves".to_string(),
        system_prompt: String::new(),
        ..AssistantConfig::default()
    });

    assert_eq!(
        router.route("jeeves, draft a reply"),
        RouteDecision::Assistant {
            prompt: "draft a reply".to_string()
        }
    );
    assert_eq!(router.route("winthrop test"), RouteDecision::Passthrough);
}
