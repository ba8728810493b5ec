use thiserror::Error;

use crate::gateway::error::GatewayError;

/// Failure modes of the inner orchestration. Only the facade converts these
/// into a caller-visible fallback response; internally they propagate.
#[derive(Debug, Clone, Error)]
pub enum CopilotError {
    #[error("no usable backend configuration: {0}")]
    ConfigUnavailable(String),

    #[error("text generation failed: {0}")]
    Provider(GatewayError),

    #[error("generation backend returned no text")]
    GenerationEmpty,

    #[error("generation output could not be parsed: {0}")]
    GenerationUnparsable(String),
}

impl From<GatewayError> for CopilotError {
    fn from(err: GatewayError) -> Self {
        match err.kind {
            crate::gateway::error::GatewayErrorKind::ConfigUnavailable => {
                CopilotError::ConfigUnavailable(err.message)
            }
            _ => CopilotError::Provider(err),
        }
    }
}
