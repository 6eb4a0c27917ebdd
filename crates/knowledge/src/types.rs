//! Query pipeline type definitions.

use nurture_prompt::Passage;
use serde::{Deserialize, Serialize};

/// Emotion assumed when a request carries none.
pub const DEFAULT_EMOTION: &str = "neutral";

/// Incoming request as parsed by the caller, before defaults are applied.
///
/// Field names follow the wire format: `{"query", "topic", "emotion"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    #[serde(default, rename = "query")]
    pub text: Option<String>,

    #[serde(default)]
    pub topic: Option<String>,

    #[serde(default)]
    pub emotion: Option<String>,
}

/// A validated, immutable user query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub text: String,
    pub topic: Option<String>,
    pub emotion: String,
}

impl Query {
    /// Create a query with the default emotion.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            topic: None,
            emotion: DEFAULT_EMOTION.to_string(),
        }
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    pub fn with_emotion(mut self, emotion: impl Into<String>) -> Self {
        self.emotion = emotion.into();
        self
    }

    /// Apply the permissive input policy: a missing or blank question is
    /// replaced by `default_question`, a missing emotion by `"neutral"`.
    pub fn from_request(request: QueryRequest, default_question: &str) -> Self {
        let text = request
            .text
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| default_question.to_string());

        Self {
            text,
            topic: request.topic,
            emotion: request
                .emotion
                .unwrap_or_else(|| DEFAULT_EMOTION.to_string()),
        }
    }
}

/// A knowledge passage from the resource corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub title: String,
    pub content: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// A retrieved passage, projected from vector index metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalMatch {
    pub title: String,
    pub content: String,
}

impl Passage for RetrievalMatch {
    fn title(&self) -> &str {
        &self.title
    }

    fn content(&self) -> &str {
        &self.content
    }
}

/// An emotion-tagged canned phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmpatheticUtterance {
    /// Emotion label; absent tags never match a non-empty tag
    #[serde(default)]
    pub tags: String,

    pub utterance: String,

    /// Dialogue situation label, carried through from preprocessing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl EmpatheticUtterance {
    pub fn new(tags: impl Into<String>, utterance: impl Into<String>) -> Self {
        Self {
            tags: tags.into(),
            utterance: utterance.into(),
            context: None,
        }
    }
}

/// Final answer returned to the caller, serialized as `{"response": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantResponse {
    #[serde(rename = "response")]
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT_Q: &str = "What are the signs of pregnancy?";

    #[test]
    fn test_query_from_request_defaults() {
        let query = Query::from_request(QueryRequest::default(), DEFAULT_Q);

        assert_eq!(query.text, DEFAULT_Q);
        assert_eq!(query.topic, None);
        assert_eq!(query.emotion, "neutral");
    }

    #[test]
    fn test_query_from_request_blank_text() {
        let request = QueryRequest {
            text: Some("   ".to_string()),
            topic: Some("nutrition".to_string()),
            emotion: Some("anxious".to_string()),
        };
        let query = Query::from_request(request, DEFAULT_Q);

        assert_eq!(query.text, DEFAULT_Q);
        assert_eq!(query.topic.as_deref(), Some("nutrition"));
        assert_eq!(query.emotion, "anxious");
    }

    #[test]
    fn test_query_request_wire_format() {
        let request: QueryRequest =
            serde_json::from_str(r#"{"query": "Is coffee safe?", "emotion": "worried"}"#).unwrap();

        assert_eq!(request.text.as_deref(), Some("Is coffee safe?"));
        assert_eq!(request.topic, None);
        assert_eq!(request.emotion.as_deref(), Some("worried"));
    }

    #[test]
    fn test_utterance_missing_tags() {
        let utterance: EmpatheticUtterance =
            serde_json::from_str(r#"{"utterance": "Hang in there.", "context": "sad"}"#).unwrap();

        assert_eq!(utterance.tags, "");
        assert_eq!(utterance.context.as_deref(), Some("sad"));
    }

    #[test]
    fn test_assistant_response_wire_format() {
        let response = AssistantResponse {
            text: "You may feel tired.".to_string(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({"response": "You may feel tired."}));
    }
}
