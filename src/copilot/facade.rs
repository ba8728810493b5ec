use std::sync::Arc;

use crate::copilot::{
    error::CopilotError,
    pipeline::CopilotPipeline,
    ports::TextGenerationPort,
    types::{AssistantResponse, PipelineRequest},
};

/// Public entry point. Wraps the fallible inner pipeline and always
/// produces a well-formed response: generation failures surface only as an
/// apologetic explanation, never as an error to the caller.
pub struct ProcessCopilot {
    pipeline: CopilotPipeline,
}

impl ProcessCopilot {
    pub fn new(generation: Arc<dyn TextGenerationPort>) -> Self {
        Self {
            pipeline: CopilotPipeline::new(generation),
        }
    }

    pub async fn respond(&self, request: &PipelineRequest) -> AssistantResponse {
        match self.pipeline.run(request).await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(target: "copilot", error = %err, "pipeline_failed");
                fallback_response(&err)
            }
        }
    }
}

pub fn fallback_response(err: &CopilotError) -> AssistantResponse {
    AssistantResponse {
        proposed_ops: Vec::new(),
        explanation: format!(
            "Entschuldigung, bei der Verarbeitung Ihrer Anfrage ist ein Fehler aufgetreten: {}. \
             Bitte versuchen Sie es noch einmal.",
            err
        ),
        open_questions: Vec::new(),
    }
}
