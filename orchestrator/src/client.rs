// orchestrator/src/client.rs

use advisory_core::{ChatTransport, CompiledPrompt, RawEnvelope, TransportError};
use async_trait::async_trait;
use common_utils::AdvisoryConfig;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

// --- request body of the chat-completion API ---
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Value>,
}

/// OpenRouter (OpenAI-compatible) chat-completion client. One attempt per call.
pub struct OpenRouterClient {
    client: Client,
    base_url: String,
    model: String,
}

impl OpenRouterClient {
    pub fn new(base_url: &str, model: &str) -> Self {
        info!("[OpenRouterClient] Initializing with base URL: {} and model: {}", base_url, model);
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    pub fn from_config(config: &AdvisoryConfig) -> Self {
        Self::new(&config.llm_url, &config.model)
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl ChatTransport for OpenRouterClient {
    async fn send(&self, api_key: &str, prompt: &CompiledPrompt) -> Result<RawEnvelope, TransportError> {
        let request = ChatCompletionRequest { model: &self.model, messages: prompt.messages() };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        debug!("[OpenRouterClient] Raw response (status {}): {}", status, body);

        if !status.is_success() {
            warn!("[OpenRouterClient] API returned an error. Status: {}", status);
            return Err(TransportError::Status { status: status.as_u16(), body });
        }

        Ok(RawEnvelope { status: status.as_u16(), body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn prompt() -> CompiledPrompt {
        CompiledPrompt::new("Use only simple English.", "Which crop suits loamy soil?")
    }

    #[tokio::test]
    async fn posts_model_and_messages_with_bearer_token() {
        let server = MockServer::start().await;
        let reply = json!({"choices": [{"message": {"role": "assistant", "content": "{}"}}]});

        Mock::given(method("POST"))
            .and(path("/api/v1/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&reply))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenRouterClient::new(&format!("{}/api/v1/", server.uri()), "mistralai/mistral-7b-instruct");
        let envelope = client.send("test-key", &prompt()).await.unwrap();

        assert_eq!(envelope.status, 200);
        assert_eq!(serde_json::from_str::<Value>(&envelope.body).unwrap(), reply);

        let requests = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["model"], "mistralai/mistral-7b-instruct");
        assert_eq!(body["messages"][0], json!({"role": "system", "content": "Use only simple English."}));
        assert_eq!(body["messages"][1]["role"], "user");
    }

    #[tokio::test]
    async fn non_success_status_is_a_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("{\"error\":\"bad key\"}"))
            .mount(&server)
            .await;

        let client = OpenRouterClient::new(&server.uri(), "any-model");
        let err = client.send("wrong-key", &prompt()).await.unwrap_err();

        assert_eq!(
            err,
            TransportError::Status { status: 401, body: "{\"error\":\"bad key\"}".into() }
        );
    }

    #[tokio::test]
    async fn unreachable_host_is_a_network_error() {
        let client = OpenRouterClient::new("http://127.0.0.1:9", "any-model");
        let err = client.send("key", &prompt()).await.unwrap_err();
        assert!(matches!(err, TransportError::Network(_)));
    }
}
