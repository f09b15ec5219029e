//! Mock completion provider for tests and offline development.
//!
//! # Features
//!
//! - Scripted replies streamed as explicit fragments
//! - Failures before the stream starts or part-way through it
//! - Simulated latency for timeout testing
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let provider = MockCompletionProvider::new()
//!     .with_fragments(["Hello", ", world"])
//!     .with_delay(Duration::from_millis(100));
//! ```

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{
    CompletionError, CompletionProvider, CompletionRequest, CompletionStream, FinishReason,
    ProviderInfo, StreamChunk,
};

/// Scripted completion provider.
#[derive(Debug, Clone)]
pub struct MockCompletionProvider {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    delay: Duration,
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Stream these fragments, then a final `stop` chunk.
    Fragments(Vec<String>),
    /// Stream these fragments, then fail.
    FailMidStream {
        fragments: Vec<String>,
        error: CompletionError,
    },
    /// Fail before any fragment is produced.
    Error(CompletionError),
}

impl Default for MockCompletionProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCompletionProvider {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queues a reply streamed word by word.
    pub fn with_reply(self, content: &str) -> Self {
        let fragments = content.split_inclusive(' ').map(str::to_string).collect();
        self.push(MockResponse::Fragments(fragments))
    }

    /// Queues a reply streamed as exactly these fragments.
    pub fn with_fragments<I, S>(self, fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(MockResponse::Fragments(fragments.into_iter().map(Into::into).collect()))
    }

    /// Queues a reply that fails after streaming `fragments`.
    pub fn with_mid_stream_failure<I, S>(self, fragments: I, error: CompletionError) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(MockResponse::FailMidStream {
            fragments: fragments.into_iter().map(Into::into).collect(),
            error,
        })
    }

    /// Queues a failure before streaming starts.
    pub fn with_error(self, error: CompletionError) -> Self {
        self.push(MockResponse::Error(error))
    }

    /// Sets simulated latency before the stream is returned.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Returns all recorded requests.
    pub fn get_calls(&self) -> Vec<CompletionRequest> {
        lock(&self.calls).clone()
    }

    fn push(self, response: MockResponse) -> Self {
        lock(&self.responses).push_back(response);
        self
    }

    fn next_response(&self) -> MockResponse {
        lock(&self.responses)
            .pop_front()
            .unwrap_or_else(|| MockResponse::Fragments(vec!["Mock ".to_string(), "response".to_string()]))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl CompletionProvider for MockCompletionProvider {
    async fn stream_complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionStream, CompletionError> {
        lock(&self.calls).push(request);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        let (fragments, tail) = match self.next_response() {
            MockResponse::Fragments(fragments) => {
                (fragments, Ok(StreamChunk::final_chunk(FinishReason::Stop)))
            }
            MockResponse::FailMidStream { fragments, error } => (fragments, Err(error)),
            MockResponse::Error(error) => return Err(error),
        };

        let chunks = fragments.into_iter().map(|f| Ok(StreamChunk::content(f)));
        Ok(Box::pin(stream::iter(chunks).chain(stream::once(async move { tail }))))
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("mock", "mock://")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::Message;
    use crate::domain::generation::GenerationParams;

    fn test_request() -> CompletionRequest {
        let params = GenerationParams::from_input(None, None, None, "mock-model");
        CompletionRequest::new(params, &[Message::user("Hello")])
    }

    async fn collect(stream: CompletionStream) -> Vec<Result<StreamChunk, CompletionError>> {
        stream.collect().await
    }

    #[tokio::test]
    async fn streams_configured_fragments_then_final_chunk() {
        let provider = MockCompletionProvider::new().with_fragments(["a", "b"]);

        let chunks = collect(provider.stream_complete(test_request()).await.unwrap()).await;

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].as_ref().unwrap().delta, "a");
        assert_eq!(chunks[1].as_ref().unwrap().delta, "b");
        assert!(chunks[2].as_ref().unwrap().is_final());
    }

    #[tokio::test]
    async fn with_reply_splits_on_spaces() {
        let provider = MockCompletionProvider::new().with_reply("Hello world again");

        let chunks = collect(provider.stream_complete(test_request()).await.unwrap()).await;
        let text: String = chunks.into_iter().map(|c| c.unwrap().delta).collect();

        assert_eq!(text, "Hello world again");
    }

    #[tokio::test]
    async fn responses_are_consumed_in_order_then_default() {
        let provider = MockCompletionProvider::new().with_fragments(["first"]);

        let first = collect(provider.stream_complete(test_request()).await.unwrap()).await;
        let second = collect(provider.stream_complete(test_request()).await.unwrap()).await;

        assert_eq!(first[0].as_ref().unwrap().delta, "first");
        assert_eq!(second[0].as_ref().unwrap().delta, "Mock ");
    }

    #[tokio::test]
    async fn error_is_returned_before_stream() {
        let provider = MockCompletionProvider::new().with_error(CompletionError::AuthenticationFailed);

        let result = provider.stream_complete(test_request()).await;

        assert!(matches!(result, Err(CompletionError::AuthenticationFailed)));
    }

    #[tokio::test]
    async fn mid_stream_failure_ends_with_error() {
        let provider = MockCompletionProvider::new()
            .with_mid_stream_failure(["partial"], CompletionError::network("reset"));

        let chunks = collect(provider.stream_complete(test_request()).await.unwrap()).await;

        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].is_ok());
        assert_eq!(chunks[1], Err(CompletionError::network("reset")));
    }

    #[tokio::test]
    async fn tracks_calls() {
        let provider = MockCompletionProvider::new();
        assert_eq!(provider.call_count(), 0);

        let _ = provider.stream_complete(test_request()).await.unwrap();

        assert_eq!(provider.call_count(), 1);
        assert_eq!(provider.get_calls()[0].messages[0].content, "Hello");
    }

    #[tokio::test]
    async fn respects_delay() {
        let provider = MockCompletionProvider::new().with_delay(Duration::from_millis(50));

        let start = std::time::Instant::now();
        let _ = provider.stream_complete(test_request()).await.unwrap();

        assert!(start.elapsed() >= Duration::from_millis(50));
    }
}
