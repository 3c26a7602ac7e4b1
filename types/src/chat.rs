//! Chat transcript domain model.
//!
//! The transcript alternates user and model turns; it is append-only within a
//! session and cleared whenever a new analysis starts. The wire form sent to
//! `POST /chat` (role + `parts` array) lives in the client crate.

use serde::{Deserialize, Serialize};

/// Author of a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

/// One turn of the follow-up conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn model(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn is_user(&self) -> bool {
        self.role == ChatRole::User
    }
}

#[cfg(test)]
mod tests {
    use super::{ChatMessage, ChatRole};

    #[test]
    fn roles_serialize_lowercase() {
        assert_eq!(
            serde_json::to_string(&ChatRole::User).expect("serializes"),
            "\"user\""
        );
        assert_eq!(
            serde_json::to_string(&ChatRole::Model).expect("serializes"),
            "\"model\""
        );
    }

    #[test]
    fn constructors_set_role() {
        assert!(ChatMessage::user("hi").is_user());
        assert!(!ChatMessage::model("hello").is_user());
    }
}
