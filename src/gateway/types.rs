use std::{collections::BTreeMap, time::Duration};

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub type BackendId = String;
pub type RequestId = String;

/// Wire protocol spoken by a backend, not its hosting vendor. Several vendors
/// expose the openai-compatible chat surface.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BackendDialect {
    OpenAiCompatible,
    Ollama,
}

/// Backend-selection token carried by the caller's request. Routed to a
/// configured backend profile; absent means the default route.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    OpenAi,
    AzureOpenAi,
    Ollama,
}

impl DataSource {
    pub fn as_route_key(&self) -> &'static str {
        match self {
            DataSource::OpenAi => "open_ai",
            DataSource::AzureOpenAi => "azure_open_ai",
            DataSource::Ollama => "ollama",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CredentialRef {
    Env { var: String },
    InlineToken { token: String },
    None,
}

#[derive(Debug, Clone)]
pub struct ResolvedCredential {
    pub auth_header: Option<String>,
    pub extra_headers: Vec<(String, String)>,
}

impl ResolvedCredential {
    pub fn none() -> Self {
        Self {
            auth_header: None,
            extra_headers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendProfile {
    pub id: BackendId,
    pub dialect: BackendDialect,
    pub endpoint: Option<String>,
    pub model: String,
    pub credential: CredentialRef,
    /// Backend honors `response_format: {"type": "json_object"}`.
    #[serde(default)]
    pub json_mode: bool,
}

fn default_request_timeout_ms() -> u64 {
    60_000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub backends: Vec<BackendProfile>,
    pub default_backend: BackendId,
    /// Maps a data-source route key (see [`DataSource::as_route_key`]) to a
    /// backend id. Sources without a route fall back to `default_backend`.
    #[serde(default)]
    pub source_routes: BTreeMap<String, BackendId>,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

/// One non-streaming generation exchange as the pipeline sees it: a fixed
/// system instruction plus one assembled user prompt.
#[derive(Debug, Clone)]
pub struct GenerationPrompt {
    pub system_prompt: String,
    pub user_prompt: String,
    /// Target output schema for backends that accept one directly (ollama
    /// `format`). Backends without schema support fall back to json mode or
    /// plain prompting.
    pub response_schema: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct AdapterContext {
    pub backend_id: BackendId,
    pub profile: BackendProfile,
    pub credential: ResolvedCredential,
    pub timeout: Duration,
    pub request_id: RequestId,
}
