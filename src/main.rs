//! moa-chat server binary.
//!
//! Loads configuration, opens the conversation database and serves the chat
//! API until interrupted.

use std::error::Error;
use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use secrecy::ExposeSecret;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use moa_chat::adapters::ai::{MockCompletionProvider, OpenAICompatibleConfig, OpenAICompatibleProvider};
use moa_chat::adapters::document::{PlainTextExtractor, UploadDirectory};
use moa_chat::adapters::http::{chat_router, ChatAppState};
use moa_chat::adapters::storage::SqliteConversationStore;
use moa_chat::application::ResponseGenerator;
use moa_chat::config::{AiProvider, AppConfig, ServerConfig};
use moa_chat::ports::{CompletionProvider, ConversationStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    if let Some(parent) = config.database.file_path().and_then(|p| p.parent().map(|d| d.to_path_buf())) {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(&parent).await?;
        }
    }
    tokio::fs::create_dir_all(&config.uploads.dir).await?;

    let store: Arc<dyn ConversationStore> = Arc::new(
        SqliteConversationStore::connect(&config.database.url, config.database.max_connections).await?,
    );
    let provider = build_provider(&config)?;
    let info = provider.provider_info();
    tracing::info!(provider = %info.name, base_url = %info.base_url, model = %config.ai.default_model, "Completion provider ready");

    let generator = ResponseGenerator::new(provider).with_timeout(config.ai.timeout());
    let state = ChatAppState::new(
        store,
        generator,
        config.ai.default_model.clone(),
        Arc::new(PlainTextExtractor::new()),
        UploadDirectory::new(config.uploads.dir.clone()),
        config.branding.clone(),
    );

    let app: Router = chat_router(config.uploads.max_bytes)
        .with_state(state)
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(cors_layer(&config.server))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn build_provider(config: &AppConfig) -> Result<Arc<dyn CompletionProvider>, Box<dyn Error>> {
    match config.ai.provider {
        AiProvider::Together => {
            let api_key = config
                .ai
                .api_key
                .as_ref()
                .map(|k| k.expose_secret().clone())
                .unwrap_or_default();
            let provider_config = OpenAICompatibleConfig::new(api_key).with_base_url(config.ai.base_url.clone());
            Ok(Arc::new(OpenAICompatibleProvider::new(provider_config)?))
        }
        AiProvider::Mock => {
            tracing::warn!("Using mock completion provider; replies are canned");
            Ok(Arc::new(MockCompletionProvider::new()))
        }
    }
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        if server.is_production() {
            tracing::warn!("No CORS origins configured; cross-origin requests will be rejected");
            return CorsLayer::new();
        }
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
