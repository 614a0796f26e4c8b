use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::AssistantConfig;

/// Request body for the Ollama /api/generate endpoint
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    use_mlock: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// Blocking client for a locally hosted Ollama generate endpoint.
///
/// One request per call, no streaming. The agent carries an explicit timeout so
/// a hung server fails the pipeline instead of blocking it forever; callers
/// decide what to do with the error (the pipeline degrades it to clipboard text).
pub struct OllamaClient {
    agent: ureq::Agent,
    endpoint: String,
    model: String,
}

impl OllamaClient {
    pub fn new(config: &AssistantConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();

        OllamaClient {
            agent,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
        }
    }

    /// Send a prompt and return the generated text.
    ///
    /// A non-200 status yields an error whose message embeds the status code.
    /// A 200 response with no "response" field yields an empty string.
    pub fn generate(&self, prompt: &str) -> Result<String> {
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            use_mlock: true,
        };

        let response = self.agent.post(&self.endpoint).send_json(&body);

        match response {
            Ok(response) => {
                let parsed: GenerateResponse = response
                    .into_json()
                    .context("Failed to parse Ollama response body")?;
                Ok(parsed.response)
            }
            Err(ureq::Error::Status(code, _)) => {
                anyhow::bail!("Request failed with status code {}", code)
            }
            Err(e) => Err(e).with_context(|| {
                format!("Failed to reach Ollama endpoint at {}", self.endpoint)
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::sync::mpsc;
    use std::thread;

    /// Read one full HTTP request (headers plus Content-Length body)
    fn read_request(stream: &mut TcpStream) -> String {
        let mut data = Vec::new();
        let mut buf = [0u8; 1024];

        loop {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            data.extend_from_slice(&buf[..n]);

            if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
                let headers = String::from_utf8_lossy(&data[..pos]);
                let content_length: usize = headers
                    .lines()
                    .find_map(|line| {
                        line.to_ascii_lowercase()
                            .strip_prefix("content-length:")
                            .map(|v| v.trim().parse().unwrap())
                    })
                    .unwrap_or(0);

                if data.len() - (pos + 4) >= content_length {
                    break;
                }
            }
        }

        String::from_utf8(data).unwrap()
    }

    /// One-shot HTTP server that answers a single request with a canned
    /// response and hands the raw request back for inspection
    fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (request_tx, request_rx) = mpsc::channel();

        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let request = read_request(&mut stream);
            let _ = request_tx.send(request);

            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
        });

        (format!("http://{}/api/generate", addr), request_rx)
    }

    fn client_for(endpoint: String) -> OllamaClient {
        OllamaClient::new(&AssistantConfig {
            endpoint,
            timeout_secs: 5,
            ..AssistantConfig::default()
        })
    }

    #[test]
    fn returns_response_field_on_success() {
        let (endpoint, _request) = serve_once("HTTP/1.1 200 OK", r#"{"response": "ok"}"#);
        let result = client_for(endpoint).generate("hello").unwrap();
        assert_eq!(result, "ok");
    }

    #[test]
    fn missing_response_field_yields_empty_string() {
        let (endpoint, _request) = serve_once("HTTP/1.1 200 OK", r#"{"done": true}"#);
        let result = client_for(endpoint).generate("hello").unwrap();
        assert_eq!(result, "");
    }

    #[test]
    fn server_error_embeds_status_code() {
        let (endpoint, _request) = serve_once("HTTP/1.1 500 Internal Server Error", "{}");
        let err = client_for(endpoint).generate("hello").unwrap_err();
        assert!(err.to_string().contains("500"), "error was: {}", err);
    }

    #[test]
    fn request_body_matches_ollama_wire_contract() {
        let (endpoint, request_rx) = serve_once("HTTP/1.1 200 OK", r#"{"response": ""}"#);
        client_for(endpoint).generate("draft a reply").unwrap();

        let request = request_rx.recv().unwrap();
        let body_start = request.find("\r\n\r\n").unwrap() + 4;
        let payload: serde_json::Value = serde_json::from_str(&request[body_start..]).unwrap();

        assert_eq!(payload["model"], "llama3");
        assert_eq!(payload["prompt"], "draft a reply");
        assert_eq!(payload["stream"], false);
        assert_eq!(payload["use_mlock"], true);
    }
}
