use std::collections::HashMap;

use crate::gateway::{
    error::{GatewayError, config_unavailable, invalid_request},
    types::{BackendId, BackendProfile, DataSource, GatewayConfig},
};

/// Resolves a caller-supplied data-source token to one configured backend
/// profile. All routing decisions happen here; the orchestrator never
/// branches on provider identity.
#[derive(Clone, Debug)]
pub struct BackendRouter {
    default_backend: BackendId,
    source_routes: HashMap<String, BackendId>,
    backends: HashMap<BackendId, BackendProfile>,
}

impl BackendRouter {
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        if config.backends.is_empty() {
            return Err(invalid_request("gateway.backends must not be empty"));
        }

        let mut backends = HashMap::new();
        for profile in &config.backends {
            if backends
                .insert(profile.id.clone(), profile.clone())
                .is_some()
            {
                return Err(invalid_request(format!(
                    "duplicate backend id '{}' in gateway.backends",
                    profile.id
                )));
            }
        }

        if !backends.contains_key(&config.default_backend) {
            return Err(invalid_request(format!(
                "gateway.default_backend '{}' does not exist",
                config.default_backend
            )));
        }

        Ok(Self {
            default_backend: config.default_backend.clone(),
            source_routes: config.source_routes.clone().into_iter().collect(),
            backends,
        })
    }

    /// Route targets are checked here, not at construction, so a stale
    /// `source_routes` entry fails only the requests that use it while the
    /// default backend keeps serving everything else.
    pub fn select(&self, source: Option<DataSource>) -> Result<&BackendProfile, GatewayError> {
        let backend_id = source
            .and_then(|source| self.source_routes.get(source.as_route_key()))
            .unwrap_or(&self.default_backend);

        self.backends.get(backend_id).ok_or_else(|| {
            config_unavailable(format!(
                "no usable backend configuration for '{}'",
                backend_id
            ))
        })
    }
}
