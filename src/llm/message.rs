//! @ai:module:intent Chat message types sent to every backend
//! @ai:module:layer domain
//! @ai:module:public_api Role, Message, MessageSequence
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// @ai:intent A single chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// @ai:effects pure
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// @ai:effects pure
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// @ai:intent Exactly one system message followed by one user message
/// @ai:invariant no conversation history is carried between calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MessageSequence {
    messages: [Message; 2],
}

impl MessageSequence {
    /// @ai:intent Build a sequence from system and user content
    /// @ai:effects pure
    pub fn new(system_content: impl Into<String>, user_content: impl Into<String>) -> Self {
        Self {
            messages: [Message::system(system_content), Message::user(user_content)],
        }
    }

    pub fn system(&self) -> &Message {
        &self.messages[0]
    }

    pub fn user(&self) -> &Message {
        &self.messages[1]
    }

    pub fn as_slice(&self) -> &[Message] {
        &self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sequence_serializes_as_role_content_array() {
        let sequence = MessageSequence::new("be precise", "- fix bug #1");
        let value = serde_json::to_value(&sequence).unwrap();

        assert_eq!(
            value,
            json!([
                {"role": "system", "content": "be precise"},
                {"role": "user", "content": "- fix bug #1"}
            ])
        );
    }

    #[test]
    fn test_sequence_order_is_fixed() {
        let sequence = MessageSequence::new("s", "u");
        assert_eq!(sequence.system().role, Role::System);
        assert_eq!(sequence.user().role, Role::User);
        assert_eq!(sequence.as_slice().len(), 2);
    }
}
