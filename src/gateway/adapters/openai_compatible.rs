use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, header};
use serde_json::{Value, json};

use crate::gateway::{
    adapters::{BackendAdapter, http_common},
    error::{GatewayError, GatewayErrorKind},
    types::{AdapterContext, BackendDialect, GenerationPrompt},
};

/// Non-streaming chat-completions call. Backends flagged with `json_mode`
/// get a strict-JSON response mode request; the target schema itself stays
/// in the system prompt for this dialect.
#[derive(Clone)]
pub struct OpenAiCompatibleAdapter {
    client: Client,
}

impl Default for OpenAiCompatibleAdapter {
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
impl BackendAdapter for OpenAiCompatibleAdapter {
    fn dialect(&self) -> BackendDialect {
        BackendDialect::OpenAiCompatible
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
            .ok_or_else(|| http_common::missing_endpoint(&ctx.backend_id, "openai-compatible"))?;
        let url = format!("{}/chat/completions", endpoint.trim_end_matches('/'));
        let body = request_body(&ctx, &prompt);

        let mut req_builder = self
            .client
            .post(url)
            .timeout(ctx.timeout)
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-request-id", ctx.request_id.clone())
            .json(&body);
        if let Some(auth_header) = ctx.credential.auth_header {
            req_builder = req_builder.header(header::AUTHORIZATION, auth_header);
        }
        for (name, value) in ctx.credential.extra_headers {
            req_builder = req_builder.header(name, value);
        }

        let response = req_builder.send().await.map_err(|err| {
            GatewayError::new(
                GatewayErrorKind::BackendTransient,
                format!("openai-compatible request failed: {}", err),
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
                format!("openai-compatible response was not valid JSON: {}", err),
            )
            .with_retryable(true)
            .with_backend_id(ctx.backend_id.clone())
        })?;

        payload
            .get("choices")
            .and_then(Value::as_array)
            .and_then(|choices| choices.first())
            .and_then(|choice| choice.pointer("/message/content"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| http_common::empty_completion(&ctx.backend_id))
    }
}

fn request_body(ctx: &AdapterContext, prompt: &GenerationPrompt) -> Value {
    let mut body = json!({
        "model": ctx.profile.model,
        "messages": http_common::chat_messages(&prompt.system_prompt, &prompt.user_prompt),
        "stream": false,
    });
    if ctx.profile.json_mode {
        body["response_format"] = json!({"type": "json_object"});
    }
    body
}
