use serde_json::{Value, json};

use crate::gateway::error::{GatewayError, GatewayErrorKind};

pub fn chat_messages(system_prompt: &str, user_prompt: &str) -> Vec<Value> {
    vec![
        json!({"role": "system", "content": system_prompt}),
        json!({"role": "user", "content": user_prompt}),
    ]
}

pub fn map_http_error(status: u16, backend_id: &str, body: &str) -> GatewayError {
    let body_preview = body.chars().take(240).collect::<String>();

    let mut err = if status == 401 {
        GatewayError::new(GatewayErrorKind::Authentication, "authentication failed")
            .with_retryable(false)
    } else if status == 403 {
        GatewayError::new(GatewayErrorKind::Authorization, "authorization failed")
            .with_retryable(false)
    } else if status == 408 || status == 429 {
        GatewayError::new(
            GatewayErrorKind::RateLimited,
            format!("backend returned status {}", status),
        )
        .with_retryable(true)
    } else if (400..500).contains(&status) {
        GatewayError::new(
            GatewayErrorKind::InvalidRequest,
            format!("backend returned status {}", status),
        )
        .with_retryable(false)
    } else {
        GatewayError::new(
            GatewayErrorKind::BackendTransient,
            format!("backend returned status {}", status),
        )
        .with_retryable(true)
    };

    err = err
        .with_backend_id(backend_id.to_string())
        .with_provider_http_status(status);

    if !body_preview.is_empty() {
        err.message = format!("{}: {}", err.message, body_preview);
    }

    err
}

pub fn missing_endpoint(backend_id: &str, dialect: &str) -> GatewayError {
    GatewayError::new(
        GatewayErrorKind::InvalidRequest,
        format!("{} backend requires an endpoint", dialect),
    )
    .with_retryable(false)
    .with_backend_id(backend_id.to_string())
}

pub fn empty_completion(backend_id: &str) -> GatewayError {
    GatewayError::new(
        GatewayErrorKind::EmptyCompletion,
        "backend response contained no message content",
    )
    .with_retryable(false)
    .with_backend_id(backend_id.to_string())
}
