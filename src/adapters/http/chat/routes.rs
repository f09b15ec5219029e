//! Axum routes for chat endpoints.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use super::handlers::{
    create_conversation, get_branding, get_conversation, health, list_conversations,
    reset_conversations, send_instruction, upload_document, ChatAppState,
};

/// Creates routes for chat endpoints.
///
/// REST Endpoints:
/// - GET /api/branding - Branding shown by clients
/// - GET /api/conversations - List conversations
/// - POST /api/conversations - Start a conversation
/// - GET /api/conversations/:id - Conversation with history
/// - POST /api/conversations/:id/turns - Send a typed instruction
/// - POST /api/conversations/:id/upload - Send an instruction with a document
/// - POST /api/reset - Delete every conversation
pub fn chat_routes() -> Router<ChatAppState> {
    Router::new()
        .route("/branding", get(get_branding))
        .route("/conversations", get(list_conversations).post(create_conversation))
        .route("/conversations/:id", get(get_conversation))
        .route("/conversations/:id/turns", post(send_instruction))
        .route("/conversations/:id/upload", post(upload_document))
        .route("/reset", post(reset_conversations))
}

/// Combined router: `/health` plus all chat routes under /api.
///
/// Request bodies are capped at `max_body_bytes`, which bounds uploads.
pub fn chat_router(max_body_bytes: usize) -> Router<ChatAppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/api", chat_routes())
        .layer(DefaultBodyLimit::max(max_body_bytes))
}
