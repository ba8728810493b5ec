use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;

use process_copilot::{
    cli::config_path_from_args,
    config::Config,
    copilot::{GatewayTextGeneration, PipelineRequest, ProcessCopilot},
    gateway::{TextGateway, credentials::EnvCredentialProvider},
    logging::init_tracing,
};

/// One-shot mode: a `PipelineRequest` as JSON on stdin, the
/// `AssistantResponse` as JSON on stdout. The surrounding document tool
/// drives this per conversation turn.
#[tokio::main]
async fn main() -> Result<()> {
    let config_path = config_path_from_args()?;
    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;
    let _logging_guard = init_tracing(&config.logging)?;

    let gateway = Arc::new(
        TextGateway::new(config.gateway, Arc::new(EnvCredentialProvider))
            .context("failed to construct text gateway")?,
    );
    let copilot = ProcessCopilot::new(Arc::new(GatewayTextGeneration::new(gateway)));

    let mut input = String::new();
    tokio::io::stdin()
        .read_to_string(&mut input)
        .await
        .context("failed to read request from stdin")?;
    let request: PipelineRequest =
        serde_json::from_str(&input).context("failed to parse request JSON")?;

    let response = copilot.respond(&request).await;
    println!(
        "{}",
        serde_json::to_string_pretty(&response).context("failed to serialize response")?
    );
    Ok(())
}
