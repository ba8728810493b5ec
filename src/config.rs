use std::{fs, path::Path, path::PathBuf};

use anyhow::{Context, Result, anyhow};
use jsonschema::{JSONSchema, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::gateway::types::GatewayConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_logging_dir() -> PathBuf {
    PathBuf::from("./logs")
}

fn default_logging_filter() -> String {
    "info".to_string()
}

fn default_logging_retention_days() -> usize {
    14
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LoggingRotation {
    Daily,
    Hourly,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_logging_filter")]
    pub filter: String,
    #[serde(default = "default_logging_rotation")]
    pub rotation: LoggingRotation,
    #[serde(default = "default_logging_retention_days")]
    pub retention_days: usize,
    #[serde(default = "default_stderr_warn_enabled")]
    pub stderr_warn_enabled: bool,
}

fn default_logging_rotation() -> LoggingRotation {
    LoggingRotation::Daily
}

fn default_stderr_warn_enabled() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_logging_dir(),
            filter: default_logging_filter(),
            rotation: default_logging_rotation(),
            retention_days: default_logging_retention_days(),
            stderr_warn_enabled: true,
        }
    }
}

impl Config {
    pub fn load(config_path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let config_value: Value = json5::from_str(&config_content)
            .with_context(|| format!("failed to parse {}", config_path.display()))?;

        validate_against_schema(&config_value)?;

        serde_json::from_value(config_value).context("failed to deserialize config")
    }
}

fn validate_against_schema(config_value: &Value) -> Result<()> {
    let schema = config_schema();
    let compiled =
        JSONSchema::compile(&schema).map_err(|e| anyhow!("failed to compile config schema: {e}"))?;

    match compiled.validate(config_value) {
        Ok(()) => Ok(()),
        Err(errors_iter) => {
            let validation_errors: Vec<ValidationError> = errors_iter.collect();
            let messages: Vec<String> = validation_errors
                .into_iter()
                .map(|error| error.to_string())
                .collect();
            Err(anyhow!("config validation failed: {}", messages.join("; ")))
        }
    }
}

fn config_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "gateway": {
                "type": "object",
                "properties": {
                    "backends": {
                        "type": "array",
                        "minItems": 1,
                        "items": {
                            "type": "object",
                            "properties": {
                                "id": {"type": "string", "minLength": 1},
                                "dialect": {"enum": ["open_ai_compatible", "ollama"]},
                                "endpoint": {"type": ["string", "null"]},
                                "model": {"type": "string", "minLength": 1},
                                "credential": {
                                    "type": "object",
                                    "properties": {
                                        "type": {"enum": ["env", "inline_token", "none"]}
                                    },
                                    "required": ["type"]
                                },
                                "json_mode": {"type": "boolean"}
                            },
                            "required": ["id", "dialect", "model", "credential"]
                        }
                    },
                    "default_backend": {"type": "string", "minLength": 1},
                    "source_routes": {
                        "type": "object",
                        "additionalProperties": {"type": "string"}
                    },
                    "request_timeout_ms": {"type": "integer", "minimum": 1}
                },
                "required": ["backends", "default_backend"]
            },
            "logging": {
                "type": "object",
                "properties": {
                    "dir": {"type": "string"},
                    "filter": {"type": "string"},
                    "rotation": {"enum": ["daily", "hourly"]},
                    "retention_days": {"type": "integer", "minimum": 0},
                    "stderr_warn_enabled": {"type": "boolean"}
                }
            }
        },
        "required": ["gateway"]
    })
}
