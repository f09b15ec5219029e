//! OpenAI-compatible Provider - streaming chat completions over SSE.
//!
//! Works against any endpoint speaking the OpenAI `chat/completions` wire
//! format. The default base URL points at Together.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAICompatibleConfig::new(api_key)
//!     .with_base_url("https://api.together.xyz/v1");
//!
//! let provider = OpenAICompatibleProvider::new(config)?;
//! ```
//!
//! # Streaming
//!
//! The response body is a Server-Sent Events stream. Bytes are buffered until
//! a full line is available, so events split across network chunks decode
//! correctly. The stream ends at the `[DONE]` marker.

use async_trait::async_trait;
use futures::future;
use futures::stream::{self, StreamExt};
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::{
    CompletionError, CompletionMessage, CompletionProvider, CompletionRequest, CompletionStream,
    FinishReason, ProviderInfo, StreamChunk,
};

/// Default endpoint for the completion service.
pub const DEFAULT_BASE_URL: &str = "https://api.together.xyz/v1";

/// Configuration for an OpenAI-compatible provider.
#[derive(Debug, Clone)]
pub struct OpenAICompatibleConfig {
    api_key: Secret<String>,
    /// Base URL for the API, without a trailing `/chat/completions`.
    pub base_url: String,
    /// Maximum time to establish a connection.
    pub connect_timeout: Duration,
}

impl OpenAICompatibleConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
        }
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Streaming client for OpenAI-compatible completion APIs.
pub struct OpenAICompatibleProvider {
    config: OpenAICompatibleConfig,
    client: Client,
}

impl OpenAICompatibleProvider {
    /// Creates a provider, building the underlying HTTP client.
    pub fn new(config: OpenAICompatibleConfig) -> Result<Self, CompletionError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| CompletionError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    async fn send_streaming_request(&self, request: &CompletionRequest) -> Result<Response, CompletionError> {
        let body = WireRequest::from_request(request);

        self.client
            .post(self.completions_url())
            .bearer_auth(self.config.api_key())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    CompletionError::network(format!("Connection failed: {}", e))
                } else {
                    CompletionError::network(e.to_string())
                }
            })
    }

    async fn handle_response_status(response: Response) -> Result<Response, CompletionError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 | 403 => Err(CompletionError::AuthenticationFailed),
            429 => Err(CompletionError::RateLimited {
                retry_after_secs: parse_retry_after(&error_body),
            }),
            400 | 404 | 422 => Err(CompletionError::InvalidRequest(error_body)),
            500..=599 => Err(CompletionError::unavailable(format!(
                "Server error {}: {}",
                status, error_body
            ))),
            _ => Err(CompletionError::network(format!(
                "Unexpected status {}: {}",
                status, error_body
            ))),
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAICompatibleProvider {
    async fn stream_complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionStream, CompletionError> {
        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            references = request.references.len(),
            "Starting streaming completion"
        );

        let response = self.send_streaming_request(&request).await?;
        let response = Self::handle_response_status(response).await?;

        let stream = response
            .bytes_stream()
            .map(Some)
            .chain(stream::once(future::ready(None)))
            .scan(SseDecoder::default(), |decoder, chunk| {
                let events = match chunk {
                    Some(Ok(bytes)) => decoder.feed(&bytes),
                    Some(Err(e)) => vec![Err(CompletionError::network(format!("Stream error: {}", e)))],
                    None => decoder.finish(),
                };
                future::ready(Some(stream::iter(events)))
            })
            .flatten()
            .take_while(|event| future::ready(!matches!(event, Ok(SseEvent::Done))))
            .filter_map(|event| {
                future::ready(match event {
                    Ok(SseEvent::Chunk(chunk)) => Some(Ok(chunk)),
                    Ok(SseEvent::Done) => None,
                    Err(e) => Some(Err(e)),
                })
            });

        Ok(Box::pin(stream))
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("openai-compatible", &self.config.base_url)
    }
}

/// Extracts "try again in N" seconds from an error body, defaulting to 30.
fn parse_retry_after(error_body: &str) -> u32 {
    serde_json::from_str::<serde_json::Value>(error_body)
        .ok()
        .and_then(|v| v.get("error")?.get("message")?.as_str().map(str::to_owned))
        .and_then(|msg| {
            let rest = &msg[msg.find("try again in ")? + "try again in ".len()..];
            let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse().ok()
        })
        .unwrap_or(30)
}

/// One decoded Server-Sent Event.
#[derive(Debug, Clone, PartialEq)]
enum SseEvent {
    Chunk(StreamChunk),
    Done,
}

/// Longest SSE line accepted before the stream is treated as malformed.
const MAX_LINE_BYTES: usize = 1024 * 1024;

/// Incremental SSE decoder.
///
/// Holds incomplete trailing bytes between calls to [`SseDecoder::feed`].
#[derive(Debug, Default)]
struct SseDecoder {
    pending: Vec<u8>,
}

impl SseDecoder {
    /// Consumes a network chunk and returns every event completed by it.
    fn feed(&mut self, bytes: &[u8]) -> Vec<Result<SseEvent, CompletionError>> {
        self.pending.extend_from_slice(bytes);

        let mut events = Vec::new();
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            events.extend(decode_bytes(&line));
        }

        if self.pending.len() > MAX_LINE_BYTES {
            self.pending.clear();
            events.push(Err(CompletionError::parse(format!(
                "SSE line exceeds {} bytes",
                MAX_LINE_BYTES
            ))));
        }
        events
    }

    /// Decodes a final line left without a trailing newline.
    fn finish(&mut self) -> Vec<Result<SseEvent, CompletionError>> {
        let line = std::mem::take(&mut self.pending);
        decode_bytes(&line).into_iter().collect()
    }
}

fn decode_bytes(line: &[u8]) -> Option<Result<SseEvent, CompletionError>> {
    let line = String::from_utf8_lossy(line);
    decode_line(line.trim_end_matches(['\n', '\r']))
}

fn decode_line(line: &str) -> Option<Result<SseEvent, CompletionError>> {
    let data = line.strip_prefix("data:")?.trim_start();
    if data.is_empty() {
        return None;
    }
    if data == "[DONE]" {
        return Some(Ok(SseEvent::Done));
    }

    let chunk = match serde_json::from_str::<WireStreamChunk>(data) {
        Ok(chunk) => chunk,
        Err(e) => {
            return Some(Err(CompletionError::parse(format!(
                "Failed to parse SSE chunk: {}",
                e
            ))))
        }
    };

    if let Some(error) = chunk.error {
        return Some(Err(CompletionError::unavailable(error.message)));
    }

    let choice = chunk.choices.into_iter().next()?;
    let finish_reason = choice.finish_reason.as_deref().map(|reason| match reason {
        "length" => FinishReason::Length,
        "content_filter" => FinishReason::ContentFilter,
        _ => FinishReason::Stop,
    });

    Some(Ok(SseEvent::Chunk(StreamChunk {
        delta: choice.delta.content.unwrap_or_default(),
        finish_reason,
    })))
}

// ----- Wire Types -----

#[derive(Debug, Serialize)]
struct WireRequest {
    model: String,
    messages: Vec<CompletionMessage>,
    max_tokens: u32,
    temperature: f32,
    stream: bool,
}

impl WireRequest {
    fn from_request(request: &CompletionRequest) -> Self {
        Self {
            model: request.model.as_str().to_string(),
            messages: request.wire_messages(),
            max_tokens: request.max_tokens.value(),
            temperature: request.temperature.value(),
            stream: true,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireStreamChunk {
    #[serde(default)]
    choices: Vec<WireStreamChoice>,
    error: Option<WireError>,
}

#[derive(Debug, Deserialize)]
struct WireStreamChoice {
    #[serde(default)]
    delta: WireDelta,
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WireDelta {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireError {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::Message;
    use crate::domain::generation::GenerationParams;

    fn content_line(text: &str) -> String {
        format!(
            "data: {{\"id\":\"c1\",\"choices\":[{{\"delta\":{{\"content\":{}}},\"finish_reason\":null}}]}}\n\n",
            serde_json::to_string(text).unwrap()
        )
    }

    fn deltas(events: Vec<Result<SseEvent, CompletionError>>) -> Vec<String> {
        events
            .into_iter()
            .filter_map(|e| match e {
                Ok(SseEvent::Chunk(c)) => Some(c.delta),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn config_builder_works() {
        let config = OpenAICompatibleConfig::new("test-key")
            .with_base_url("https://custom.api.com/v1/")
            .with_connect_timeout(Duration::from_secs(3));

        assert_eq!(config.base_url, "https://custom.api.com/v1");
        assert_eq!(config.connect_timeout, Duration::from_secs(3));
        assert_eq!(config.api_key(), "test-key");
    }

    #[test]
    fn default_base_url_is_together() {
        let provider = OpenAICompatibleProvider::new(OpenAICompatibleConfig::new("k")).unwrap();
        assert_eq!(provider.completions_url(), "https://api.together.xyz/v1/chat/completions");
        assert_eq!(provider.provider_info().base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn wire_request_streams_with_clamped_params() {
        let params = GenerationParams::from_input(Some("mixtral"), Some("9"), Some("0"), "d");
        let request = CompletionRequest::new(params, &[Message::user("hi")]);

        let json = serde_json::to_value(WireRequest::from_request(&request)).unwrap();

        assert_eq!(json["model"], "mixtral");
        assert_eq!(json["temperature"], 2.0);
        assert_eq!(json["max_tokens"], 1);
        assert_eq!(json["stream"], true);
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn decodes_content_chunk() {
        let mut decoder = SseDecoder::default();
        let events = decoder.feed(content_line("Hello").as_bytes());
        assert_eq!(deltas(events), vec!["Hello"]);
    }

    #[test]
    fn decodes_line_split_across_chunks() {
        let line = content_line("split");
        let (a, b) = line.as_bytes().split_at(17);
        let mut decoder = SseDecoder::default();

        assert!(decoder.feed(a).is_empty());
        assert_eq!(deltas(decoder.feed(b)), vec!["split"]);
    }

    #[test]
    fn decodes_multibyte_character_split_across_chunks() {
        let line = content_line("héllo");
        let bytes = line.as_bytes();
        let cut = line.find('é').unwrap() + 1;
        let mut decoder = SseDecoder::default();

        assert!(decoder.feed(&bytes[..cut]).is_empty());
        assert_eq!(deltas(decoder.feed(&bytes[cut..])), vec!["héllo"]);
    }

    #[test]
    fn decodes_several_events_in_one_chunk() {
        let body = format!("{}{}data: [DONE]\n\n", content_line("a"), content_line("b"));
        let events = SseDecoder::default().feed(body.as_bytes());

        assert_eq!(events.len(), 3);
        assert_eq!(events[2], Ok(SseEvent::Done));
    }

    #[test]
    fn handles_crlf_and_comment_lines() {
        let body = ": keep-alive\r\n\r\ndata: [DONE]\r\n";
        let events = SseDecoder::default().feed(body.as_bytes());
        assert_eq!(events, vec![Ok(SseEvent::Done)]);
    }

    #[test]
    fn decodes_finish_reason() {
        let line = "data: {\"choices\":[{\"delta\":{},\"finish_reason\":\"length\"}]}\n";
        let events = SseDecoder::default().feed(line.as_bytes());
        match &events[0] {
            Ok(SseEvent::Chunk(chunk)) => {
                assert!(chunk.delta.is_empty());
                assert_eq!(chunk.finish_reason, Some(FinishReason::Length));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn finish_flushes_line_without_trailing_newline() {
        let mut decoder = SseDecoder::default();
        let line = content_line("tail");
        let unterminated = line.trim_end_matches('\n');

        assert!(decoder.feed(unterminated.as_bytes()).is_empty());
        assert_eq!(deltas(decoder.finish()), vec!["tail"]);
        assert!(decoder.finish().is_empty());
    }

    #[test]
    fn finish_recognizes_unterminated_done_marker() {
        let mut decoder = SseDecoder::default();
        decoder.feed(b"data: [DONE]");

        let events = decoder.finish();
        assert!(matches!(events.as_slice(), [Ok(SseEvent::Done)]));
    }

    #[test]
    fn oversized_line_is_parse_error() {
        let mut decoder = SseDecoder::default();
        let events = decoder.feed(&vec![b'x'; MAX_LINE_BYTES + 1]);

        assert!(matches!(events.as_slice(), [Err(CompletionError::Parse(_))]));
        assert!(decoder.finish().is_empty());
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let events = SseDecoder::default().feed(b"data: {not json\n");
        assert!(matches!(events[0], Err(CompletionError::Parse(_))));
    }

    #[test]
    fn error_payload_is_unavailable() {
        let line = "data: {\"error\":{\"message\":\"model overloaded\"}}\n";
        let events = SseDecoder::default().feed(line.as_bytes());
        assert_eq!(events[0], Err(CompletionError::unavailable("model overloaded")));
    }

    #[test]
    fn parse_retry_after_from_message() {
        let body = r#"{"error":{"message":"Rate limit exceeded. Please try again in 12 seconds."}}"#;
        assert_eq!(parse_retry_after(body), 12);
    }

    #[test]
    fn parse_retry_after_default() {
        assert_eq!(parse_retry_after("gateway exploded"), 30);
    }
}
