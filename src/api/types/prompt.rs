//! Request and response bodies for the prompt endpoints

use serde::{Deserialize, Serialize};

use crate::domain::{Answer, ChatRole, Completion, Usage};

/// Body accepted by `/prompt`, `/chat` and `/ama`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromptRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

/// `/chat` reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotResponse {
    pub response: String,
}

impl BotResponse {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

/// `/ama` reply: the provider's choices, in the order it returned them,
/// plus token usage when the provider reported it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmaResponse {
    pub choices: Vec<AmaChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmaChoice {
    pub index: u32,
    pub message: AmaMessage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmaMessage {
    pub role: ChatRole,
    pub content: String,
}

impl AmaResponse {
    /// A single assistant choice carrying `content`
    pub fn single(content: impl Into<String>) -> Self {
        Self {
            choices: vec![AmaChoice {
                index: 0,
                message: AmaMessage {
                    role: ChatRole::Assistant,
                    content: content.into(),
                },
            }],
            usage: None,
        }
    }
}

impl From<Vec<Answer>> for AmaResponse {
    fn from(answers: Vec<Answer>) -> Self {
        let choices = answers
            .into_iter()
            .map(|answer| AmaChoice {
                index: answer.index,
                message: AmaMessage {
                    role: answer.role,
                    content: answer.content,
                },
            })
            .collect();

        Self {
            choices,
            usage: None,
        }
    }
}

impl From<Completion> for AmaResponse {
    fn from(completion: Completion) -> Self {
        let usage = completion.usage().cloned();
        Self {
            usage,
            ..Self::from(completion.into_answers())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prompt_request_accepts_null_and_missing() {
        let null: PromptRequest = serde_json::from_value(json!({"prompt": null})).unwrap();
        let missing: PromptRequest = serde_json::from_value(json!({})).unwrap();

        assert!(null.prompt.is_none());
        assert!(missing.prompt.is_none());
    }

    #[test]
    fn test_ama_response_shape_keeps_order() {
        let response = AmaResponse::from(vec![
            Answer {
                index: 2,
                role: ChatRole::Assistant,
                content: "b".to_string(),
            },
            Answer {
                index: 1,
                role: ChatRole::Assistant,
                content: "a".to_string(),
            },
        ]);

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"choices": [
                {"index": 2, "message": {"role": "assistant", "content": "b"}},
                {"index": 1, "message": {"role": "assistant", "content": "a"}}
            ]})
        );
    }

    #[test]
    fn test_ama_response_carries_usage() {
        let response = AmaResponse {
            usage: Some(Usage::new(9, 3)),
            ..AmaResponse::single("hi")
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json["usage"],
            json!({"prompt_tokens": 9, "completion_tokens": 3, "total_tokens": 12})
        );
        assert!(serde_json::to_value(AmaResponse::single("hi"))
            .unwrap()
            .get("usage")
            .is_none());
    }

    #[test]
    fn test_single_choice() {
        let response = AmaResponse::single("User prompt cannot be empty");

        assert_eq!(response.choices.len(), 1);
        assert_eq!(response.choices[0].message.content, "User prompt cannot be empty");
    }
}
