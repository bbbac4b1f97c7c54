//! Remote chat completion service
//!
//! The resolver talks to the hosted language model through the
//! [`CompletionProvider`] trait so the HTTP client can be swapped out in
//! tests or pointed at any OpenAI-compatible endpoint.

mod openai;

pub use openai::OpenAiCompletion;

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::conversation::Turn;

/// Instruction sent ahead of every conversation
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI call agent assistant. You handle customer calls professionally and courteously.

Your responsibilities:
- Answer questions clearly and concisely
- Help customers with inquiries about products, services, or support
- Schedule appointments or take messages when needed
- Provide helpful information and guidance
- Be empathetic and understanding
- Keep responses conversational and natural for voice interaction
- Keep responses brief (1-3 sentences) since they will be spoken aloud

Remember: You're in a voice call, so keep your responses concise and easy to understand when spoken.";

/// Reasons the remote completion path produced no reply
#[derive(Debug, Error)]
pub enum CompletionError {
    /// No credential configured
    #[error("remote completion not configured")]
    NotConfigured,

    /// Request could not be sent or the connection failed
    #[error("request failed: {0}")]
    Transport(String),

    /// No response within the configured bound
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// Non-success HTTP status
    #[error("API error: {status} - {body}")]
    Status { status: u16, body: String },

    /// Response body missing the expected choice content
    #[error("malformed completion: {0}")]
    Malformed(String),
}

/// Chat message in the remote service's wire format
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

impl From<&Turn> for ChatMessage {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.speaker.chat_role(),
            content: turn.text.clone(),
        }
    }
}

/// Build the message list: system instruction, prior turns, new utterance
#[must_use]
pub fn build_messages(system_prompt: &str, history: &[Turn], utterance: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(system_prompt));
    messages.extend(history.iter().map(ChatMessage::from));
    messages.push(ChatMessage::user(utterance));
    messages
}

/// Trait for remote completion providers
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Produce a reply for the given messages
    ///
    /// # Errors
    ///
    /// Returns error if the service is unreachable, answers with a
    /// non-success status, or returns no usable content
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_messages_order_and_roles() {
        let history = vec![Turn::caller("hi"), Turn::agent("Hello! How can I help?")];
        let messages = build_messages("be brief", &history, "what are your hours");

        assert_eq!(
            messages,
            vec![
                ChatMessage::system("be brief"),
                ChatMessage {
                    role: "user",
                    content: "hi".to_string()
                },
                ChatMessage {
                    role: "assistant",
                    content: "Hello! How can I help?".to_string()
                },
                ChatMessage::user("what are your hours"),
            ]
        );
    }

    #[test]
    fn test_build_messages_empty_history() {
        let messages = build_messages("be brief", &[], "");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1], ChatMessage::user(""));
    }

    #[test]
    fn test_status_error_display() {
        let err = CompletionError::Status {
            status: 429,
            body: "rate limited".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 429 - rate limited");
    }
}
