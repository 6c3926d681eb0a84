use serde::{Deserialize, Serialize};

/// Sampling parameters for one completion call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
}

/// Temperature and token limit used for explanations.
pub const EXPLAIN_TEMPERATURE: f32 = 0.3;
pub const EXPLAIN_MAX_TOKENS: u32 = 1024;

/// A chat message in the OpenAI-compatible wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for `POST /chat/completions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
}

/// Response body for `POST /chat/completions`. Only the fields we read.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoiceMessage {
    pub content: Option<String>,
}

/// Error envelope returned by OpenAI-compatible APIs on failure.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorEnvelope {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
}

/// Build a single-message request for the given model and sampling parameters.
pub fn build_chat_request(
    prompt: &str,
    model: &str,
    params: &SamplingParams,
) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: model.to_string(),
        messages: vec![ChatMessage::user(prompt)],
        temperature: params.temperature,
        max_tokens: params.max_tokens,
        top_p: params.top_p,
    }
}

/// Text of the first choice, or a description of why there is none.
pub fn first_choice_text(response: ChatCompletionResponse) -> Result<String, String> {
    response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| "Completion response contained no choices".to_string())?
        .message
        .content
        .ok_or_else(|| "Completion choice had no content".to_string())
}

/// Best-effort description of a non-success response body.
pub fn describe_error_body(body: &str) -> String {
    match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) if body.trim().is_empty() => "empty response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_single_user_message() {
        let params = SamplingParams {
            temperature: 0.5,
            max_tokens: 4096,
            top_p: 0.95,
        };
        let request = build_chat_request("write fizzbuzz", "qwen-2.5-coder-32b", &params);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "qwen-2.5-coder-32b");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "write fizzbuzz");
        assert_eq!(json["max_tokens"], 4096);
        assert_eq!(json["messages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_first_choice_text() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"print(1)"}}]}"#,
        )
        .unwrap();
        assert_eq!(first_choice_text(response).unwrap(), "print(1)");
    }

    #[test]
    fn test_first_choice_text_missing() {
        let response: ChatCompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(first_choice_text(response).is_err());

        let response: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#)
                .unwrap();
        assert_eq!(
            first_choice_text(response).unwrap_err(),
            "Completion choice had no content"
        );
    }

    #[test]
    fn test_describe_error_body() {
        let body = r#"{"error":{"message":"Invalid API Key","type":"invalid_request_error"}}"#;
        assert_eq!(describe_error_body(body), "Invalid API Key");
        assert_eq!(describe_error_body("upstream timeout"), "upstream timeout");
        assert_eq!(describe_error_body(""), "empty response body");
    }
}
