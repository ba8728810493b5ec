use async_trait::async_trait;
use serde_json::Value;

use crate::{copilot::error::CopilotError, gateway::types::DataSource};

/// One generation exchange as the orchestrator requests it. Backend
/// selection, credentials, and wire shape all live behind the port.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub source: Option<DataSource>,
    pub system_prompt: String,
    pub user_prompt: String,
    pub response_schema: Value,
}

/// The single capability the pipeline consumes from the outside world.
#[async_trait]
pub trait TextGenerationPort: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<String, CopilotError>;
}
