//! ResponseGenerator - drives one streamed completion to a final reply.

use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::domain::generation::{EmptyResponse, ResponseAccumulator};
use crate::ports::{CompletionError, CompletionProvider, CompletionRequest};

/// Default bound on a whole completion call.
pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(120);

/// Errors from generating a reply.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResponseError {
    /// The completion call failed or timed out. Partial output is discarded.
    #[error("Error generating response: {0}")]
    Generation(#[from] CompletionError),

    #[error(transparent)]
    EmptyResponse(#[from] EmptyResponse),
}

/// Consumes a completion stream under a timeout and returns the full text.
#[derive(Clone)]
pub struct ResponseGenerator {
    provider: Arc<dyn CompletionProvider>,
    timeout: Duration,
}

impl ResponseGenerator {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            provider,
            timeout: DEFAULT_GENERATION_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Runs the completion and concatenates its fragments in arrival order.
    pub async fn generate(&self, request: CompletionRequest) -> Result<String, ResponseError> {
        match tokio::time::timeout(self.timeout, self.accumulate(request)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(timeout_ms = self.timeout.as_millis() as u64, "Completion timed out");
                Err(CompletionError::timeout(self.timeout).into())
            }
        }
    }

    async fn accumulate(&self, request: CompletionRequest) -> Result<String, ResponseError> {
        let mut stream = self.provider.stream_complete(request).await?;
        let mut accumulator = ResponseAccumulator::new();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            accumulator.push(&chunk.delta);
            if chunk.is_final() {
                break;
            }
        }

        tracing::debug!(fragments = accumulator.fragment_count(), "Completion stream finished");
        Ok(accumulator.finish()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockCompletionProvider;
    use crate::domain::conversation::Message;
    use crate::domain::generation::GenerationParams;

    fn request() -> CompletionRequest {
        let params = GenerationParams::from_input(None, None, None, "test-model");
        CompletionRequest::new(params, &[Message::user("Hi")])
    }

    fn generator(provider: MockCompletionProvider) -> ResponseGenerator {
        ResponseGenerator::new(Arc::new(provider))
    }

    #[tokio::test]
    async fn concatenates_fragments_in_order() {
        let generator = generator(MockCompletionProvider::new().with_fragments(["Hel", "", "lo", "!"]));

        assert_eq!(generator.generate(request()).await.unwrap(), "Hello!");
    }

    #[tokio::test]
    async fn whitespace_reply_is_empty_response() {
        let generator = generator(MockCompletionProvider::new().with_fragments([" ", "\n"]));

        assert_eq!(
            generator.generate(request()).await,
            Err(ResponseError::EmptyResponse(EmptyResponse))
        );
    }

    #[tokio::test]
    async fn no_fragments_is_empty_response() {
        let generator = generator(MockCompletionProvider::new().with_fragments(Vec::<String>::new()));

        assert!(matches!(
            generator.generate(request()).await,
            Err(ResponseError::EmptyResponse(_))
        ));
    }

    #[tokio::test]
    async fn provider_error_is_generation_error() {
        let generator = generator(MockCompletionProvider::new().with_error(CompletionError::AuthenticationFailed));

        assert_eq!(
            generator.generate(request()).await,
            Err(ResponseError::Generation(CompletionError::AuthenticationFailed))
        );
    }

    #[tokio::test]
    async fn mid_stream_error_discards_partial_text() {
        let generator = generator(
            MockCompletionProvider::new()
                .with_mid_stream_failure(["partial ", "answer"], CompletionError::network("reset")),
        );

        assert_eq!(
            generator.generate(request()).await,
            Err(ResponseError::Generation(CompletionError::network("reset")))
        );
    }

    #[tokio::test]
    async fn slow_provider_times_out() {
        let provider = MockCompletionProvider::new()
            .with_reply("too late")
            .with_delay(Duration::from_millis(200));
        let generator = generator(provider).with_timeout(Duration::from_millis(20));

        let result = generator.generate(request()).await;

        assert_eq!(
            result,
            Err(ResponseError::Generation(CompletionError::timeout(Duration::from_millis(20))))
        );
        assert_eq!(
            result.unwrap_err().to_string(),
            "Error generating response: request timed out after 20ms"
        );
    }

    #[tokio::test]
    async fn forwards_request_to_provider() {
        let provider = MockCompletionProvider::new().with_reply("ok");
        let generator = ResponseGenerator::new(Arc::new(provider.clone()));

        generator.generate(request()).await.unwrap();

        assert_eq!(provider.call_count(), 1);
        assert_eq!(provider.get_calls()[0].model.as_str(), "test-model");
    }
}
