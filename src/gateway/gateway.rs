use std::{collections::HashMap, sync::Arc, time::Duration};

use uuid::Uuid;

use crate::gateway::{
    adapters::{BackendAdapter, build_default_adapters},
    credentials::CredentialProvider,
    error::{GatewayError, internal_error},
    router::BackendRouter,
    types::{AdapterContext, BackendDialect, DataSource, GatewayConfig, GenerationPrompt},
};

/// Uniform text-generation capability over all configured backends. Holds
/// only read-only routing state; every call is independent.
pub struct TextGateway {
    router: BackendRouter,
    credential_provider: Arc<dyn CredentialProvider>,
    adapters: HashMap<BackendDialect, Arc<dyn BackendAdapter>>,
    request_timeout: Duration,
}

impl TextGateway {
    pub fn new(
        config: GatewayConfig,
        credential_provider: Arc<dyn CredentialProvider>,
    ) -> Result<Self, GatewayError> {
        let router = BackendRouter::new(&config)?;
        Ok(Self {
            router,
            credential_provider,
            adapters: build_default_adapters(),
            request_timeout: Duration::from_millis(config.request_timeout_ms.max(1)),
        })
    }

    pub fn with_adapters(
        mut self,
        adapters: HashMap<BackendDialect, Arc<dyn BackendAdapter>>,
    ) -> Self {
        self.adapters = adapters;
        self
    }

    pub async fn generate(
        &self,
        source: Option<DataSource>,
        prompt: GenerationPrompt,
    ) -> Result<String, GatewayError> {
        let profile = self.router.select(source)?.clone();
        let credential = self
            .credential_provider
            .resolve(&profile.credential, &profile)
            .await?;
        let adapter = self
            .adapters
            .get(&profile.dialect)
            .cloned()
            .ok_or_else(|| {
                internal_error(format!(
                    "adapter for dialect {:?} is not registered",
                    profile.dialect
                ))
                .with_backend_id(profile.id.clone())
            })?;

        let request_id = Uuid::now_v7().to_string();
        tracing::debug!(
            target: "gateway",
            request_id = %request_id,
            backend_id = %profile.id,
            dialect = ?profile.dialect,
            model = %profile.model,
            timeout_ms = self.request_timeout.as_millis() as u64,
            "generation_dispatched"
        );

        let backend_id = profile.id.clone();
        let ctx = AdapterContext {
            backend_id: backend_id.clone(),
            profile,
            credential,
            timeout: self.request_timeout,
            request_id: request_id.clone(),
        };

        let result = adapter.generate(ctx, prompt).await;
        match &result {
            Ok(text) => {
                tracing::debug!(
                    target: "gateway",
                    request_id = %request_id,
                    backend_id = %backend_id,
                    output_chars = text.chars().count(),
                    "generation_completed"
                );
            }
            Err(err) => {
                tracing::warn!(
                    target: "gateway",
                    request_id = %request_id,
                    backend_id = %backend_id,
                    kind = ?err.kind,
                    retryable = err.retryable,
                    error = %err.message,
                    "generation_failed"
                );
            }
        }
        result
    }
}
