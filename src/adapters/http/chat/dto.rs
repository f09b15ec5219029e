//! HTTP DTOs for chat endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use serde::{Deserialize, Serialize};

use crate::application::handlers::chat::ConversationListing;
use crate::config::BrandingConfig;
use crate::domain::conversation::{Conversation, ConversationSummary, Message, Role};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request body for starting a conversation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateConversationRequest {
    #[serde(default)]
    pub topic: String,
}

/// Request body for a typed chat turn.
///
/// Sampling fields accept numbers or strings; anything unusable falls back
/// to the defaults downstream.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendInstructionRequest {
    #[serde(default)]
    pub instruction: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub temperature: Option<serde_json::Value>,
    #[serde(default, alias = "max_tokens")]
    pub max_tokens: Option<serde_json::Value>,
    #[serde(default)]
    pub references: Vec<String>,
}

/// Renders a loosely typed JSON value as the raw text the command expects.
pub fn raw_param(value: Option<&serde_json::Value>) -> Option<String> {
    match value? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(render_number(n)),
        _ => None,
    }
}

/// Integral floats such as `1e5` render without a fraction so they still
/// read as integers.
fn render_number(n: &serde_json::Number) -> String {
    if n.is_f64() {
        if let Some(f) = n.as_f64() {
            if f.is_finite() && f.fract() == 0.0 {
                return format!("{:.0}", f);
            }
        }
    }
    n.to_string()
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// A single message in a conversation.
#[derive(Debug, Clone, Serialize)]
pub struct MessageView {
    pub role: Role,
    pub content: String,
}

impl From<&Message> for MessageView {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role,
            content: message.content.clone(),
        }
    }
}

/// Full view of a conversation including its history.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationView {
    pub id: String,
    pub topic: String,
    pub messages: Vec<MessageView>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Conversation> for ConversationView {
    fn from(conversation: &Conversation) -> Self {
        Self {
            id: conversation.id().to_string(),
            topic: conversation.topic().to_string(),
            messages: conversation.messages().iter().map(MessageView::from).collect(),
            created_at: conversation.created_at().to_rfc3339(),
            updated_at: conversation.updated_at().to_rfc3339(),
        }
    }
}

/// Entry in the conversation list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummaryView {
    pub id: String,
    pub topic: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&ConversationSummary> for ConversationSummaryView {
    fn from(summary: &ConversationSummary) -> Self {
        Self {
            id: summary.id.to_string(),
            topic: summary.topic.clone(),
            created_at: summary.created_at.to_rfc3339(),
            updated_at: summary.updated_at.to_rfc3339(),
        }
    }
}

/// Conversation list, most recently updated first.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationListView {
    pub conversations: Vec<ConversationSummaryView>,
    /// Set when the list could not be loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl From<ConversationListing> for ConversationListView {
    fn from(listing: ConversationListing) -> Self {
        Self {
            conversations: listing.conversations.iter().map(ConversationSummaryView::from).collect(),
            notice: listing.notice,
        }
    }
}

/// Result of a completed turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnView {
    pub reply: String,
    pub conversation: ConversationView,
}

/// Branding shown by clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandingView {
    pub app_name: String,
    pub app_description: String,
    pub developer_name: String,
    pub company_name: String,
    pub company_url: String,
    pub company_logo: String,
    pub github_username: String,
    pub github_repo: String,
}

impl From<&BrandingConfig> for BrandingView {
    fn from(branding: &BrandingConfig) -> Self {
        Self {
            app_name: branding.app_name.clone(),
            app_description: branding.app_description.clone(),
            developer_name: branding.developer_name.clone(),
            company_name: branding.company_name.clone(),
            company_url: branding.company_url.clone(),
            company_logo: branding.company_logo.clone(),
            github_username: branding.github_username.clone(),
            github_repo: branding.github_repo.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Transient error notice returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl ToString, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::{Topic, Turn};
    use crate::domain::foundation::{ErrorCode, Timestamp};
    use serde_json::json;

    #[test]
    fn raw_param_accepts_numbers_and_strings() {
        assert_eq!(raw_param(Some(&json!(0.5))), Some("0.5".to_string()));
        assert_eq!(raw_param(Some(&json!(512))), Some("512".to_string()));
        assert_eq!(raw_param(Some(&json!("1.2"))), Some("1.2".to_string()));
    }

    #[test]
    fn raw_param_renders_integral_floats_as_integers() {
        let value: serde_json::Value = serde_json::from_str("1e5").unwrap();
        assert_eq!(raw_param(Some(&value)), Some("100000".to_string()));
        assert_eq!(raw_param(Some(&json!(64.0))), Some("64".to_string()));
        assert_eq!(raw_param(Some(&json!(0.25))), Some("0.25".to_string()));
    }

    #[test]
    fn raw_param_ignores_other_json_types() {
        assert_eq!(raw_param(Some(&json!(true))), None);
        assert_eq!(raw_param(Some(&json!(null))), None);
        assert_eq!(raw_param(None), None);
    }

    #[test]
    fn send_request_accepts_snake_case_max_tokens() {
        let req: SendInstructionRequest =
            serde_json::from_value(json!({"instruction": "hi", "max_tokens": 100})).unwrap();
        assert_eq!(raw_param(req.max_tokens.as_ref()), Some("100".to_string()));

        let req: SendInstructionRequest =
            serde_json::from_value(json!({"instruction": "hi", "maxTokens": "64"})).unwrap();
        assert_eq!(raw_param(req.max_tokens.as_ref()), Some("64".to_string()));
    }

    #[test]
    fn conversation_view_serializes_camel_case_with_lowercase_roles() {
        let mut conversation = Conversation::new(Topic::new("Rust").unwrap());
        conversation.record_turn(Turn::new("hello", "hi there"), Timestamp::now());

        let value = serde_json::to_value(ConversationView::from(&conversation)).unwrap();

        assert_eq!(value["topic"], "Rust");
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][1]["role"], "assistant");
        assert_eq!(value["messages"][1]["content"], "hi there");
    }

    #[test]
    fn list_view_omits_notice_when_absent() {
        let view = ConversationListView {
            conversations: vec![],
            notice: None,
        };
        let value = serde_json::to_value(view).unwrap();
        assert!(value.get("notice").is_none());
    }

    #[test]
    fn error_response_uses_error_code_text() {
        let error = ErrorResponse::new(ErrorCode::EmptyResponse, "No response generated.");
        assert_eq!(error.code, "EMPTY_RESPONSE");
    }
}
