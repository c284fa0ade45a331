use std::time::Duration;

use async_trait::async_trait;
use khitan_translator::{Completion, CompletionError, CompletionRequest, CompletionService, ProviderMetadata};
use serde_json::{Value, json};

/// OpenAI-compatible chat completion client (DeepSeek by default)
#[derive(Clone)]
pub struct DeepSeekClient {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
}

impl DeepSeekClient {
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> Result<Self, CompletionError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key,
            api_url,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_url.trim_end_matches('/'))
    }
}

/// Request body for one system + user exchange
pub fn request_body(request: &CompletionRequest) -> Value {
    json!({
        "model": request.model,
        "temperature": request.temperature,
        "messages": [
            { "role": "system", "content": request.system_prompt },
            { "role": "user", "content": request.user_message },
        ],
    })
}

/// Extract the first choice's text and token usage
pub fn parse_response(json: &Value, model: &str) -> Result<Completion, CompletionError> {
    if let Some(message) = json.get("error").and_then(|e| e.get("message")).and_then(Value::as_str) {
        return Err(CompletionError::ApiError(message.to_string()));
    }

    let text = json["choices"]
        .get(0)
        .and_then(|c| c["message"]["content"].as_str())
        .ok_or(CompletionError::EmptyResponse)?;

    Ok(Completion {
        text: text.to_string(),
        model: json["model"].as_str().unwrap_or(model).to_string(),
        provider: "deepseek".to_string(),
        prompt_tokens: json["usage"]["prompt_tokens"].as_u64(),
        completion_tokens: json["usage"]["completion_tokens"].as_u64(),
    })
}

#[async_trait]
impl CompletionService for DeepSeekClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, CompletionError> {
        if self.api_key.is_empty() {
            return Err(CompletionError::AuthenticationError);
        }

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request_body(request))
            .send()
            .await?;

        let status = response.status();

        if status == 429 {
            return Err(CompletionError::RateLimitExceeded);
        }

        if status == 401 || status == 403 {
            return Err(CompletionError::AuthenticationError);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::ApiError(format!("HTTP {}: {}", status, body.trim())));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| CompletionError::ApiError(format!("Failed to parse response: {}", e)))?;

        parse_response(&json, &request.model)
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "DeepSeek".to_string(),
            requires_api_key: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CompletionRequest {
        CompletionRequest {
            system_prompt: "system".to_string(),
            user_message: "Analysis target: 阿保机".to_string(),
            model: "deepseek-chat".to_string(),
            temperature: 0.3,
        }
    }

    #[test]
    fn body_has_system_then_user() {
        let body = request_body(&request());
        assert_eq!(body["model"], "deepseek-chat");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "Analysis target: 阿保机");
    }

    #[test]
    fn parses_first_choice() {
        let json = json!({
            "model": "deepseek-chat",
            "choices": [{ "message": { "role": "assistant", "content": "### 1. ..." } }],
            "usage": { "prompt_tokens": 120, "completion_tokens": 40 }
        });
        let completion = parse_response(&json, "fallback").unwrap();
        assert_eq!(completion.text, "### 1. ...");
        assert_eq!(completion.prompt_tokens, Some(120));
        assert_eq!(completion.completion_tokens, Some(40));
    }

    #[test]
    fn missing_content_is_empty_response() {
        let json = json!({ "choices": [] });
        assert!(matches!(parse_response(&json, "m"), Err(CompletionError::EmptyResponse)));
    }

    #[test]
    fn error_object_is_api_error() {
        let json = json!({ "error": { "message": "Insufficient Balance" } });
        match parse_response(&json, "m") {
            Err(CompletionError::ApiError(message)) => assert_eq!(message, "Insufficient Balance"),
            _ => panic!("expected ApiError"),
        }
    }

    #[test]
    fn endpoint_joins_base_url() {
        let client = DeepSeekClient::new(
            "sk-test".to_string(),
            "https://api.deepseek.com/".to_string(),
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(client.endpoint(), "https://api.deepseek.com/chat/completions");
    }

    #[tokio::test]
    async fn empty_key_fails_before_any_request() {
        let client = DeepSeekClient::new(
            String::new(),
            "http://127.0.0.1:9".to_string(),
            Duration::from_secs(1),
        )
        .unwrap();
        let result = client.complete(&request()).await;
        assert!(matches!(result, Err(CompletionError::AuthenticationError)));
    }
}
