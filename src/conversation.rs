//! Conversation turns supplied by the caller on every request

use serde::{Deserialize, Serialize};

/// Who spoke a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    /// The person on the call
    #[serde(rename = "user")]
    Caller,
    /// The call agent
    #[serde(rename = "agent", alias = "assistant")]
    Agent,
}

impl Speaker {
    /// Chat-completion role for this speaker
    #[must_use]
    pub const fn chat_role(self) -> &'static str {
        match self {
            Self::Caller => "user",
            Self::Agent => "assistant",
        }
    }
}

/// One utterance within a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    #[serde(rename = "role")]
    pub speaker: Speaker,
    #[serde(rename = "content")]
    pub text: String,
}

impl Turn {
    /// A turn spoken by the caller
    #[must_use]
    pub fn caller(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Caller,
            text: text.into(),
        }
    }

    /// A turn spoken by the agent
    #[must_use]
    pub fn agent(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Agent,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_roles() {
        assert_eq!(Speaker::Caller.chat_role(), "user");
        assert_eq!(Speaker::Agent.chat_role(), "assistant");
    }

    #[test]
    fn test_deserialize_wire_roles() {
        let history: Vec<Turn> = serde_json::from_str(
            r#"[
                {"role": "user", "content": "hi"},
                {"role": "agent", "content": "Hello!"},
                {"role": "assistant", "content": "Anything else?"}
            ]"#,
        )
        .unwrap();

        assert_eq!(
            history,
            vec![
                Turn::caller("hi"),
                Turn::agent("Hello!"),
                Turn::agent("Anything else?"),
            ]
        );
    }

    #[test]
    fn test_unknown_role_rejected() {
        let result: Result<Turn, _> =
            serde_json::from_str(r#"{"role": "system", "content": "x"}"#);
        assert!(result.is_err());
    }
}
