use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, header};
use serde_json::{Value, json};

use crate::gateway::{
    adapters::{BackendAdapter, http_common},
    error::{GatewayError, GatewayErrorKind},
    types::{AdapterContext, BackendDialect, GenerationPrompt},
};

/// Non-streaming `/api/chat` call. Ollama accepts the target output schema
/// directly through `format`; without a schema the plain `"json"` mode is
/// requested instead.
#[derive(Clone)]
pub struct OllamaAdapter {
    client: Client,
}

impl Default for OllamaAdapter {
    fn default() -> Self {
        Self {
            client: Client::builder()
                .pool_idle_timeout(Duration::from_secs(30))
                .build()
                .expect("reqwest client must build"),
        }
    }
}

#[async_trait]
impl BackendAdapter for OllamaAdapter {
    fn dialect(&self) -> BackendDialect {
        BackendDialect::Ollama
    }

    async fn generate(
        &self,
        ctx: AdapterContext,
        prompt: GenerationPrompt,
    ) -> Result<String, GatewayError> {
        let endpoint = ctx
            .profile
            .endpoint
            .clone()
            .ok_or_else(|| http_common::missing_endpoint(&ctx.backend_id, "ollama"))?;
        let url = format!("{}/api/chat", endpoint.trim_end_matches('/'));
        let body = request_body(&ctx, &prompt);

        let response = self
            .client
            .post(url)
            .timeout(ctx.timeout)
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-request-id", ctx.request_id.clone())
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                GatewayError::new(
                    GatewayErrorKind::BackendTransient,
                    format!("ollama request failed: {}", err),
                )
                .with_retryable(true)
                .with_backend_id(ctx.backend_id.clone())
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(http_common::map_http_error(status, &ctx.backend_id, &body));
        }

        let payload: Value = response.json().await.map_err(|err| {
            GatewayError::new(
                GatewayErrorKind::BackendTransient,
                format!("ollama response was not valid JSON: {}", err),
            )
            .with_retryable(true)
            .with_backend_id(ctx.backend_id.clone())
        })?;

        payload
            .pointer("/message/content")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| http_common::empty_completion(&ctx.backend_id))
    }
}

fn request_body(ctx: &AdapterContext, prompt: &GenerationPrompt) -> Value {
    let format = prompt
        .response_schema
        .clone()
        .unwrap_or_else(|| Value::String("json".to_string()));
    json!({
        "model": ctx.profile.model,
        "messages": http_common::chat_messages(&prompt.system_prompt, &prompt.user_prompt),
        "stream": false,
        "format": format,
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::gateway::types::{BackendProfile, CredentialRef, ResolvedCredential};

    fn context(endpoint: Option<&str>) -> AdapterContext {
        AdapterContext {
            backend_id: "local".to_string(),
            profile: BackendProfile {
                id: "local".to_string(),
                dialect: BackendDialect::Ollama,
                endpoint: endpoint.map(str::to_string),
                model: "test-model".to_string(),
                credential: CredentialRef::None,
                json_mode: false,
            },
            credential: ResolvedCredential::none(),
            timeout: Duration::from_millis(50),
            request_id: "req-1".to_string(),
        }
    }

    fn prompt(response_schema: Option<Value>) -> GenerationPrompt {
        GenerationPrompt {
            system_prompt: "system".to_string(),
            user_prompt: "user".to_string(),
            response_schema,
        }
    }

    #[tokio::test]
    async fn missing_endpoint_is_an_invalid_request() {
        let err = OllamaAdapter::default()
            .generate(context(None), prompt(None))
            .await
            .expect_err("missing endpoint must fail before any request");
        assert_eq!(err.kind, GatewayErrorKind::InvalidRequest);
        assert_eq!(err.backend_id.as_deref(), Some("local"));
    }

    #[test]
    fn response_schema_travels_under_format() {
        let schema = json!({"type": "object", "required": ["explanation"]});
        let body = request_body(&context(Some("http://localhost:11434")), &prompt(Some(schema.clone())));
        assert_eq!(body["format"], schema);
        assert_eq!(body["stream"], json!(false));
    }

    #[test]
    fn without_schema_plain_json_mode_is_requested() {
        let body = request_body(&context(Some("http://localhost:11434")), &prompt(None));
        assert_eq!(body["format"], json!("json"));
    }
}
