//! HTTP handlers for chat endpoints.
//!
//! These handlers connect Axum routes to the chat command and query handlers.

use std::sync::Arc;

use axum::extract::{Json, Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::document::UploadDirectory;
use crate::application::handlers::chat::{
    CreateConversationCommand, CreateConversationError, CreateConversationHandler,
    GetConversationError, GetConversationHandler, GetConversationQuery, ListConversationsHandler,
    ResetConversationsError, ResetConversationsHandler, ResponseGenerator, SendInstructionCommand,
    SendInstructionError, SendInstructionHandler,
};
use crate::config::BrandingConfig;
use crate::domain::foundation::{ConversationId, ErrorCode};
use crate::ports::{ConversationStore, DocumentExtractor, ExtractionError};

use super::dto::{
    raw_param, BrandingView, ConversationListView, ConversationView, CreateConversationRequest,
    ErrorResponse, HealthResponse, SendInstructionRequest, TurnView,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state for chat handlers.
#[derive(Clone)]
pub struct ChatAppState {
    pub create_conversation: Arc<CreateConversationHandler>,
    pub get_conversation: Arc<GetConversationHandler>,
    pub list_conversations: Arc<ListConversationsHandler>,
    pub reset_conversations: Arc<ResetConversationsHandler>,
    pub send_instruction: Arc<SendInstructionHandler>,
    pub extractor: Arc<dyn DocumentExtractor>,
    pub uploads: UploadDirectory,
    pub branding: Arc<BrandingConfig>,
}

impl ChatAppState {
    /// Wires every chat handler to the same store.
    pub fn new(
        store: Arc<dyn ConversationStore>,
        generator: ResponseGenerator,
        default_model: impl Into<String>,
        extractor: Arc<dyn DocumentExtractor>,
        uploads: UploadDirectory,
        branding: BrandingConfig,
    ) -> Self {
        Self {
            create_conversation: Arc::new(CreateConversationHandler::new(store.clone())),
            get_conversation: Arc::new(GetConversationHandler::new(store.clone())),
            list_conversations: Arc::new(ListConversationsHandler::new(store.clone())),
            reset_conversations: Arc::new(ResetConversationsHandler::new(store.clone())),
            send_instruction: Arc::new(SendInstructionHandler::new(store, generator, default_model)),
            extractor,
            uploads,
            branding: Arc::new(branding),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Service endpoints
// ════════════════════════════════════════════════════════════════════════════════

/// GET /health - Liveness probe.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// GET /api/branding - Application and developer branding.
pub async fn get_branding(State(state): State<ChatAppState>) -> impl IntoResponse {
    Json(BrandingView::from(state.branding.as_ref()))
}

// ════════════════════════════════════════════════════════════════════════════════
// Conversations
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/conversations - List conversations, most recently updated first.
///
/// Never fails; a storage problem yields an empty list with a `notice`.
pub async fn list_conversations(State(state): State<ChatAppState>) -> impl IntoResponse {
    let listing = state.list_conversations.handle().await;
    Json(ConversationListView::from(listing))
}

/// POST /api/conversations - Start a conversation.
///
/// # Errors
/// - 400 Bad Request: Blank topic
/// - 500 Internal Server Error: Storage failure
pub async fn create_conversation(
    State(state): State<ChatAppState>,
    Json(req): Json<CreateConversationRequest>,
) -> Result<impl IntoResponse, ChatApiError> {
    let conversation = state
        .create_conversation
        .handle(CreateConversationCommand { topic: req.topic })
        .await?;

    Ok((StatusCode::CREATED, Json(ConversationView::from(&conversation))))
}

/// GET /api/conversations/:id - Conversation with its full history.
///
/// # Errors
/// - 404 Not Found: Unknown or malformed id
pub async fn get_conversation(
    State(state): State<ChatAppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ChatApiError> {
    let conversation_id = parse_conversation_id(&id)?;
    let conversation = state
        .get_conversation
        .handle(GetConversationQuery { conversation_id })
        .await?;

    Ok(Json(ConversationView::from(&conversation)))
}

/// POST /api/reset - Delete every conversation.
pub async fn reset_conversations(
    State(state): State<ChatAppState>,
) -> Result<impl IntoResponse, ChatApiError> {
    state.reset_conversations.handle().await?;
    Ok(StatusCode::NO_CONTENT)
}

// ════════════════════════════════════════════════════════════════════════════════
// Turns
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/conversations/:id/turns - Send a typed instruction.
///
/// # Errors
/// - 400 Bad Request: Blank instruction
/// - 404 Not Found: Unknown conversation
/// - 502 Bad Gateway: Completion failed or returned nothing
pub async fn send_instruction(
    State(state): State<ChatAppState>,
    Path(id): Path<String>,
    Json(req): Json<SendInstructionRequest>,
) -> Result<impl IntoResponse, ChatApiError> {
    let conversation_id = parse_conversation_id(&id)?;
    let cmd = SendInstructionCommand {
        conversation_id,
        instruction: req.instruction,
        document: None,
        model: req.model,
        temperature: raw_param(req.temperature.as_ref()),
        max_tokens: raw_param(req.max_tokens.as_ref()),
        references: req.references,
    };

    let result = state.send_instruction.handle(cmd).await?;
    Ok(Json(TurnView {
        reply: result.reply,
        conversation: ConversationView::from(&result.conversation),
    }))
}

/// Fields collected from an upload form.
#[derive(Debug, Default)]
struct UploadForm {
    file: Option<(String, Vec<u8>)>,
    instruction: Option<String>,
    model: Option<String>,
    temperature: Option<String>,
    max_tokens: Option<String>,
}

/// POST /api/conversations/:id/upload - Send an instruction with a document.
///
/// Multipart fields: `file`, `instruction`, `model`, `temperature`, `max_tokens`.
/// The upload is written to the upload directory only while its text is
/// extracted.
///
/// # Errors
/// - 400 Bad Request: Unsupported file type, unreadable form, or nothing to send
/// - 404 Not Found: Unknown conversation
/// - 502 Bad Gateway: Completion failed or returned nothing
pub async fn upload_document(
    State(state): State<ChatAppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ChatApiError> {
    let conversation_id = parse_conversation_id(&id)?;
    let form = read_upload_form(multipart).await?;

    let document = match form.file {
        Some((file_name, bytes)) => Some(extract_upload(&state, &file_name, &bytes).await?),
        None => None,
    };

    let cmd = SendInstructionCommand {
        conversation_id,
        instruction: form.instruction,
        document,
        model: form.model,
        temperature: form.temperature,
        max_tokens: form.max_tokens,
        references: Vec::new(),
    };

    let result = state.send_instruction.handle(cmd).await?;
    Ok(Json(TurnView {
        reply: result.reply,
        conversation: ConversationView::from(&result.conversation),
    }))
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, ChatApiError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(invalid_form)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(invalid_form)?;
                // Browsers send an empty part when no file was chosen.
                if !file_name.is_empty() {
                    form.file = Some((file_name, bytes.to_vec()));
                }
            }
            "instruction" => form.instruction = Some(field.text().await.map_err(invalid_form)?),
            "model" => form.model = Some(field.text().await.map_err(invalid_form)?),
            "temperature" => form.temperature = Some(field.text().await.map_err(invalid_form)?),
            "max_tokens" => form.max_tokens = Some(field.text().await.map_err(invalid_form)?),
            _ => {}
        }
    }

    Ok(form)
}

async fn extract_upload(
    state: &ChatAppState,
    file_name: &str,
    bytes: &[u8],
) -> Result<String, ChatApiError> {
    let upload = state.uploads.store(bytes).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to store upload");
        ChatApiError::Internal("Failed to store uploaded file".to_string())
    })?;

    let extracted = state.extractor.extract(upload.path(), file_name).await;
    upload.remove().await;

    extracted.map_err(ChatApiError::from)
}

fn invalid_form(err: axum::extract::multipart::MultipartError) -> ChatApiError {
    ChatApiError::Validation(err.body_text())
}

fn parse_conversation_id(raw: &str) -> Result<ConversationId, ChatApiError> {
    raw.parse()
        .map_err(|_| ChatApiError::NotFound(format!("Conversation not found: {}", raw)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts handler errors to HTTP responses.
#[derive(Debug)]
pub enum ChatApiError {
    Validation(String),
    NotFound(String),
    Generation(String),
    EmptyResponse(String),
    Storage(String),
    Internal(String),
}

impl ChatApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ChatApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ChatApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ChatApiError::Generation(_) | ChatApiError::EmptyResponse(_) => StatusCode::BAD_GATEWAY,
            ChatApiError::Storage(_) | ChatApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ChatApiError::Validation(_) => ErrorCode::ValidationFailed,
            ChatApiError::NotFound(_) => ErrorCode::ConversationNotFound,
            ChatApiError::Generation(_) => ErrorCode::GenerationFailed,
            ChatApiError::EmptyResponse(_) => ErrorCode::EmptyResponse,
            ChatApiError::Storage(_) => ErrorCode::StorageError,
            ChatApiError::Internal(_) => ErrorCode::InternalError,
        }
    }
}

impl IntoResponse for ChatApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let code = self.code();
        let message = match self {
            ChatApiError::Storage(msg) => {
                tracing::error!("Storage error: {}", msg);
                msg
            }
            ChatApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
            ChatApiError::Validation(msg)
            | ChatApiError::NotFound(msg)
            | ChatApiError::Generation(msg)
            | ChatApiError::EmptyResponse(msg) => msg,
        };

        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}

impl From<CreateConversationError> for ChatApiError {
    fn from(err: CreateConversationError) -> Self {
        match err {
            CreateConversationError::Validation(_) => ChatApiError::Validation(err.to_string()),
            CreateConversationError::Storage(_) => ChatApiError::Storage(err.to_string()),
        }
    }
}

impl From<GetConversationError> for ChatApiError {
    fn from(err: GetConversationError) -> Self {
        match err {
            GetConversationError::NotFound(_) => ChatApiError::NotFound(err.to_string()),
            GetConversationError::Storage(_) => ChatApiError::Storage(err.to_string()),
        }
    }
}

impl From<ResetConversationsError> for ChatApiError {
    fn from(err: ResetConversationsError) -> Self {
        ChatApiError::Storage(err.to_string())
    }
}

impl From<SendInstructionError> for ChatApiError {
    fn from(err: SendInstructionError) -> Self {
        let message = err.to_string();
        match err {
            SendInstructionError::Validation(_) => ChatApiError::Validation(message),
            SendInstructionError::NotFound(_) => ChatApiError::NotFound(message),
            SendInstructionError::Generation(_) => ChatApiError::Generation(message),
            SendInstructionError::EmptyResponse => ChatApiError::EmptyResponse(message),
            SendInstructionError::Storage(_) => ChatApiError::Storage(message),
        }
    }
}

impl From<ExtractionError> for ChatApiError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::UnsupportedFormat { .. } => ChatApiError::Validation(err.to_string()),
            ExtractionError::Io(_) => ChatApiError::Internal(err.to_string()),
        }
    }
}
