use std::fmt;

use serde::{Deserialize, Serialize};

use crate::gateway::types::BackendId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayErrorKind {
    ConfigUnavailable,
    InvalidRequest,
    Authentication,
    Authorization,
    RateLimited,
    BackendTransient,
    BackendPermanent,
    EmptyCompletion,
    Internal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayError {
    pub kind: GatewayErrorKind,
    pub message: String,
    pub retryable: bool,
    pub backend_id: Option<BackendId>,
    pub provider_http_status: Option<u16>,
}

impl GatewayError {
    pub fn new(kind: GatewayErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            retryable: matches!(
                kind,
                GatewayErrorKind::RateLimited | GatewayErrorKind::BackendTransient
            ),
            backend_id: None,
            provider_http_status: None,
        }
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    pub fn with_backend_id(mut self, backend_id: impl Into<String>) -> Self {
        self.backend_id = Some(backend_id.into());
        self
    }

    pub fn with_provider_http_status(mut self, status: u16) -> Self {
        self.provider_http_status = Some(status);
        self
    }
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.backend_id {
            Some(backend_id) => write!(f, "{} (backend={})", self.message, backend_id),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for GatewayError {}

pub fn config_unavailable(message: impl Into<String>) -> GatewayError {
    GatewayError::new(GatewayErrorKind::ConfigUnavailable, message).with_retryable(false)
}

pub fn invalid_request(message: impl Into<String>) -> GatewayError {
    GatewayError::new(GatewayErrorKind::InvalidRequest, message).with_retryable(false)
}

pub fn internal_error(message: impl Into<String>) -> GatewayError {
    GatewayError::new(GatewayErrorKind::Internal, message).with_retryable(false)
}
