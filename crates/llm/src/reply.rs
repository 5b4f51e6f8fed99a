//! Decoding of generation replies.
//!
//! Backends answer either in completion shape (`{"response": "..."}`) or in
//! chat shape (`{"message": {"content": "..."}}`). The body is decoded into
//! [`GenerateReply`], whose `Missing` branch stands for a JSON body carrying
//! neither field.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Text returned when a reply has no recognizable text field.
///
/// Distinct from the grounding refusal: it signals a backend schema miss,
/// not a model that declined to answer.
pub const NO_RESPONSE_FALLBACK: &str = "No response found";

/// Shape of the reply the backend produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyKind {
    /// `response` field
    Completion,
    /// `message.content` field
    Chat,
    /// Neither field present
    Fallback,
}

/// A decoded generation reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateReply {
    Completion(String),
    Chat(String),
    Missing,
}

impl GenerateReply {
    /// Decode a parsed JSON body.
    ///
    /// A non-empty `response` string wins over `message.content`; an empty
    /// `response` counts as absent. Each field is read on its own, so a
    /// mistyped field never hides a usable one. Bodies that are not objects
    /// decode to `Missing`.
    pub fn from_value(value: Value) -> Self {
        if let Some(text) = value.get("response").and_then(Value::as_str) {
            if !text.is_empty() {
                return GenerateReply::Completion(text.to_string());
            }
        }

        match value
            .get("message")
            .and_then(|message| message.get("content"))
            .and_then(Value::as_str)
        {
            Some(text) => GenerateReply::Chat(text.to_string()),
            None => GenerateReply::Missing,
        }
    }

    /// Which branch was taken.
    pub fn kind(&self) -> ReplyKind {
        match self {
            GenerateReply::Completion(_) => ReplyKind::Completion,
            GenerateReply::Chat(_) => ReplyKind::Chat,
            GenerateReply::Missing => ReplyKind::Fallback,
        }
    }

    /// The generated text, or [`NO_RESPONSE_FALLBACK`].
    pub fn into_text(self) -> String {
        match self {
            GenerateReply::Completion(text) | GenerateReply::Chat(text) => text,
            GenerateReply::Missing => NO_RESPONSE_FALLBACK.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_completion_shape() {
        let reply = GenerateReply::from_value(json!({"response": "Paris", "done": true}));
        assert_eq!(reply, GenerateReply::Completion("Paris".to_string()));
        assert_eq!(reply.kind(), ReplyKind::Completion);
        assert_eq!(reply.into_text(), "Paris");
    }

    #[test]
    fn test_chat_shape() {
        let reply = GenerateReply::from_value(json!({"message": {"role": "assistant", "content": "Lyon"}}));
        assert_eq!(reply.kind(), ReplyKind::Chat);
        assert_eq!(reply.into_text(), "Lyon");
    }

    #[test]
    fn test_empty_object_falls_back() {
        let reply = GenerateReply::from_value(json!({}));
        assert_eq!(reply, GenerateReply::Missing);
        assert_eq!(reply.kind(), ReplyKind::Fallback);
        assert_eq!(reply.into_text(), "No response found");
    }

    #[test]
    fn test_empty_response_defers_to_message() {
        let reply = GenerateReply::from_value(json!({"response": "", "message": {"content": "Lyon"}}));
        assert_eq!(reply.into_text(), "Lyon");

        let reply = GenerateReply::from_value(json!({"response": ""}));
        assert_eq!(reply, GenerateReply::Missing);
    }

    #[test]
    fn test_unexpected_shapes_fall_back() {
        assert_eq!(GenerateReply::from_value(json!([1, 2, 3])), GenerateReply::Missing);
        assert_eq!(GenerateReply::from_value(json!({"response": 42})), GenerateReply::Missing);
        assert_eq!(GenerateReply::from_value(json!({"message": {}})), GenerateReply::Missing);
    }

    #[test]
    fn test_mistyped_field_does_not_hide_response() {
        let reply = GenerateReply::from_value(json!({"response": "Paris", "message": "x"}));
        assert_eq!(reply, GenerateReply::Completion("Paris".to_string()));

        let reply = GenerateReply::from_value(json!({"response": "Paris", "message": {"content": 5}}));
        assert_eq!(reply, GenerateReply::Completion("Paris".to_string()));
    }

    #[test]
    fn test_mistyped_response_defers_to_message() {
        let reply = GenerateReply::from_value(json!({"response": 42, "message": {"content": "Lyon"}}));
        assert_eq!(reply, GenerateReply::Chat("Lyon".to_string()));
    }
}
