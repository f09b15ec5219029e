//! SendInstruction command handler.
//!
//! Runs one chat turn: builds the instruction, asks the model for a reply
//! and appends the user/assistant pair to the conversation. Nothing is
//! written unless a non-empty reply was produced.

use std::sync::Arc;
use thiserror::Error;

use super::response_generator::{ResponseError, ResponseGenerator};
use crate::domain::conversation::{Conversation, Message, Turn};
use crate::domain::foundation::{ConversationId, ValidationError};
use crate::domain::generation::{EmptyResponse, GenerationParams, Instruction};
use crate::ports::{CompletionError, CompletionRequest, ConversationStore, StoreError};

/// Command to send an instruction to a conversation.
///
/// Sampling fields hold raw user input; they are normalized, never rejected.
#[derive(Debug, Clone, Default)]
pub struct SendInstructionCommand {
    pub conversation_id: ConversationId,
    /// Typed instruction, if any.
    pub instruction: Option<String>,
    /// Text extracted from an uploaded document, if one was uploaded.
    pub document: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<String>,
    pub max_tokens: Option<String>,
    /// Earlier model answers for the aggregator to synthesize.
    pub references: Vec<String>,
}

impl SendInstructionCommand {
    pub fn new(conversation_id: ConversationId, instruction: impl Into<String>) -> Self {
        Self {
            conversation_id,
            instruction: Some(instruction.into()),
            ..Default::default()
        }
    }
}

/// Errors that can occur when sending an instruction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SendInstructionError {
    #[error("{}", validation_message(.0))]
    Validation(#[from] ValidationError),

    #[error("Conversation not found: {0}")]
    NotFound(ConversationId),

    #[error("Error generating response: {0}")]
    Generation(#[from] CompletionError),

    #[error("No response generated. Please try again.")]
    EmptyResponse,

    #[error("Error saving conversation: {0}")]
    Storage(StoreError),
}

fn validation_message(err: &ValidationError) -> String {
    match err {
        ValidationError::InvalidFormat { reason, .. } => reason.clone(),
        other => other.to_string(),
    }
}

impl From<StoreError> for SendInstructionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => SendInstructionError::NotFound(id),
            other => SendInstructionError::Storage(other),
        }
    }
}

impl From<ResponseError> for SendInstructionError {
    fn from(err: ResponseError) -> Self {
        match err {
            ResponseError::Generation(e) => SendInstructionError::Generation(e),
            ResponseError::EmptyResponse(EmptyResponse) => SendInstructionError::EmptyResponse,
        }
    }
}

/// Result of a completed turn.
#[derive(Debug, Clone)]
pub struct SendInstructionResult {
    /// The conversation as persisted after the turn.
    pub conversation: Conversation,
    /// The assistant reply that was appended.
    pub reply: String,
}

/// Handler for SendInstruction commands.
pub struct SendInstructionHandler {
    store: Arc<dyn ConversationStore>,
    generator: ResponseGenerator,
    default_model: String,
}

impl SendInstructionHandler {
    pub fn new(
        store: Arc<dyn ConversationStore>,
        generator: ResponseGenerator,
        default_model: impl Into<String>,
    ) -> Self {
        Self {
            store,
            generator,
            default_model: default_model.into(),
        }
    }

    pub async fn handle(&self, cmd: SendInstructionCommand) -> Result<SendInstructionResult, SendInstructionError> {
        let instruction = Instruction::compose(cmd.instruction.as_deref(), cmd.document.as_deref())?;
        let conversation = self.store.get_conversation(cmd.conversation_id).await?;

        let params = GenerationParams::from_input(
            cmd.model.as_deref(),
            cmd.temperature.as_deref(),
            cmd.max_tokens.as_deref(),
            &self.default_model,
        );
        tracing::debug!(
            conversation_id = %cmd.conversation_id,
            model = %params.model,
            temperature = params.temperature.value(),
            max_tokens = params.max_tokens.value(),
            "Generating response"
        );

        let user_message = Message::user(instruction.as_str());
        let history = conversation.history_with(&user_message);
        let request = CompletionRequest::new(params, &history).with_references(cmd.references);

        let reply = self.generator.generate(request).await.map_err(|e| {
            tracing::error!(conversation_id = %cmd.conversation_id, error = %e, "Response generation failed");
            SendInstructionError::from(e)
        })?;

        let conversation = self
            .store
            .append_turn(cmd.conversation_id, Turn::new(instruction.into_inner(), reply.clone()))
            .await?;

        tracing::info!(
            conversation_id = %cmd.conversation_id,
            message_count = conversation.messages().len(),
            "Turn completed"
        );
        Ok(SendInstructionResult { conversation, reply })
    }
}
