//! `POST /chat` - follow-up questions about the analyzed product.

use serde::Serialize;

use labelens_types::{ChatMessage, ChatRole};

use crate::{ApiClient, ApiError, decode_response, http_client};

/// A follow-up question with its conversational context.
///
/// `history` is the transcript *before* the current message; the service
/// receives the new message separately. `context` is the serialized analysis
/// result, or `None` when nothing has been analyzed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub message: String,
    pub history: Vec<ChatMessage>,
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
struct ChatBody<'a> {
    message: &'a str,
    history: Vec<HistoryEntry<'a>>,
    /// Serializes as JSON null when absent; the service expects the field.
    context: Option<&'a str>,
}

/// Wire form of one transcript turn: role plus a `parts` array.
#[derive(Debug, Serialize)]
struct HistoryEntry<'a> {
    role: ChatRole,
    parts: [&'a str; 1],
}

impl<'a> From<&'a ChatMessage> for HistoryEntry<'a> {
    fn from(message: &'a ChatMessage) -> Self {
        Self {
            role: message.role,
            parts: [message.content.as_str()],
        }
    }
}

#[derive(Debug, serde::Deserialize)]
struct ChatReply {
    reply: String,
}

impl ApiClient {
    pub async fn chat(&self, request: ChatRequest) -> Result<String, ApiError> {
        let body = ChatBody {
            message: &request.message,
            history: request.history.iter().map(HistoryEntry::from).collect(),
            context: request.context.as_deref(),
        };

        let response = http_client()
            .post(self.endpoint("chat"))
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::warn!("chat request failed: {e}"))?;

        let reply: ChatReply = decode_response(response).await?;
        Ok(reply.reply)
    }
}

#[cfg(test)]
mod tests {
    use super::{ChatBody, ChatRequest, HistoryEntry};
    use labelens_types::ChatMessage;

    #[test]
    fn body_matches_wire_format() {
        let request = ChatRequest {
            message: "Is this safe?".to_string(),
            history: vec![
                ChatMessage::user("What about sugar?"),
                ChatMessage::model("Moderate amounts are fine."),
            ],
            context: Some("{\"health_score\":42}".to_string()),
        };

        let body = ChatBody {
            message: &request.message,
            history: request.history.iter().map(HistoryEntry::from).collect(),
            context: request.context.as_deref(),
        };

        assert_eq!(
            serde_json::to_value(&body).expect("body serializes"),
            serde_json::json!({
                "message": "Is this safe?",
                "history": [
                    {"role": "user", "parts": ["What about sugar?"]},
                    {"role": "model", "parts": ["Moderate amounts are fine."]},
                ],
                "context": "{\"health_score\":42}",
            })
        );
    }

    #[test]
    fn missing_context_serializes_as_null() {
        let body = ChatBody {
            message: "hi",
            history: vec![],
            context: None,
        };
        let value = serde_json::to_value(&body).expect("body serializes");
        assert_eq!(value["context"], serde_json::Value::Null);
    }
}
