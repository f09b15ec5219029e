//! Completion Provider Adapters.
//!
//! - `OpenAICompatibleProvider` - Streaming client for OpenAI-style chat APIs (Together by default)
//! - `MockCompletionProvider` - Scripted provider for testing

mod mock_completion_provider;
mod openai_compatible_provider;

pub use mock_completion_provider::{MockCompletionProvider, MockResponse};
pub use openai_compatible_provider::{OpenAICompatibleConfig, OpenAICompatibleProvider, DEFAULT_BASE_URL};
