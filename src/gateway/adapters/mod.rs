use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;

use crate::gateway::{
    error::GatewayError,
    types::{AdapterContext, BackendDialect, GenerationPrompt},
};

pub mod http_common;
pub mod ollama;
pub mod openai_compatible;

/// One backend shape behind the uniform "generate text given system+user
/// prompt" capability. Adapters own the wire details; nothing above this
/// seam knows which dialect handled a request.
#[async_trait]
pub trait BackendAdapter: Send + Sync {
    fn dialect(&self) -> BackendDialect;

    async fn generate(
        &self,
        ctx: AdapterContext,
        prompt: GenerationPrompt,
    ) -> Result<String, GatewayError>;
}

pub fn build_default_adapters() -> HashMap<BackendDialect, Arc<dyn BackendAdapter>> {
    let mut adapters: HashMap<BackendDialect, Arc<dyn BackendAdapter>> = HashMap::new();
    adapters.insert(
        BackendDialect::OpenAiCompatible,
        Arc::new(openai_compatible::OpenAiCompatibleAdapter::default()),
    );
    adapters.insert(
        BackendDialect::Ollama,
        Arc::new(ollama::OllamaAdapter::default()),
    );
    adapters
}
