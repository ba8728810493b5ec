use std::sync::Arc;

use crate::copilot::{
    error::CopilotError,
    normalizer::normalize_operations,
    parser::parse_response_text,
    phase::{ConversationPhase, clamp_operations},
    ports::{GenerationRequest, TextGenerationPort},
    prompts,
    types::{AssistantResponse, PipelineRequest},
    validator::finalize_response,
};

/// Inner orchestration: assembles the prompt context, runs one generation
/// round-trip, and repairs the output into a well-formed response. May
/// fail; only the facade guarantees totality.
///
/// Stateless per call: everything lives in the request, so concurrent calls
/// from independent conversations need no locking.
pub struct CopilotPipeline {
    generation: Arc<dyn TextGenerationPort>,
}

impl CopilotPipeline {
    pub fn new(generation: Arc<dyn TextGenerationPort>) -> Self {
        Self { generation }
    }

    pub async fn run(&self, request: &PipelineRequest) -> Result<AssistantResponse, CopilotError> {
        let phase = ConversationPhase::from_history(&request.chat_history);
        let transcript = prompts::render_transcript(&request.chat_history);
        let current_model_json = serde_json::to_string_pretty(&request.current_model)
            .unwrap_or_else(|_| "{}".to_string());

        let user_prompt = prompts::build_user_prompt(
            phase.steering_instruction(),
            &current_model_json,
            request.open_questions.as_deref(),
            request.context.as_deref(),
            &transcript,
            &request.user_message,
        );

        let raw = self
            .generation
            .generate(GenerationRequest {
                source: request.data_source,
                system_prompt: prompts::system_prompt(),
                user_prompt,
                response_schema: prompts::response_json_schema(),
            })
            .await?;

        let parsed = parse_response_text(&raw)?;
        let ops = normalize_operations(parsed.get("proposedOps"));

        let proposed = ops.len();
        let ops = clamp_operations(phase, ops);
        if ops.len() < proposed {
            tracing::debug!(
                target: "copilot",
                phase = ?phase,
                dropped = proposed - ops.len(),
                "phase_clamp_dropped_operations"
            );
        }

        Ok(finalize_response(&parsed, ops))
    }
}
