use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    copilot::{
        error::CopilotError,
        ports::{GenerationRequest, TextGenerationPort},
    },
    gateway::{gateway::TextGateway, types::GenerationPrompt},
};

/// Bridges the pipeline's generation port onto the backend gateway.
pub struct GatewayTextGeneration {
    gateway: Arc<TextGateway>,
}

impl GatewayTextGeneration {
    pub fn new(gateway: Arc<TextGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl TextGenerationPort for GatewayTextGeneration {
    async fn generate(&self, request: GenerationRequest) -> Result<String, CopilotError> {
        let prompt = GenerationPrompt {
            system_prompt: request.system_prompt,
            user_prompt: request.user_prompt,
            response_schema: Some(request.response_schema),
        };
        self.gateway
            .generate(request.source, prompt)
            .await
            .map_err(CopilotError::from)
    }
}
