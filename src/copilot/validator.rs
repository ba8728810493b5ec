use serde_json::Value;

use crate::copilot::types::{AssistantResponse, Operation};

/// Substituted when the generator supplied neither `explanation` nor
/// `message`. A clarifying question keeps the conversation moving.
pub const DEFAULT_CLARIFICATION: &str = "Können Sie mir noch etwas mehr über den Prozess erzählen? \
     Mir fehlen noch Details, um einen konkreten Vorschlag zu machen.";

/// Fills safe defaults for missing or malformed explanation and open
/// questions. This stage cannot fail by design; defaulting is normal
/// behavior of a best-effort generator, not an error.
pub fn finalize_response(parsed: &Value, ops: Vec<Operation>) -> AssistantResponse {
    let explanation = string_field(parsed, "explanation")
        .or_else(|| string_field(parsed, "message"))
        .unwrap_or_else(|| DEFAULT_CLARIFICATION.to_string());

    let open_questions = question_array(parsed, "openQuestions")
        .or_else(|| question_array(parsed, "questions"))
        .unwrap_or_default();

    AssistantResponse {
        proposed_ops: ops,
        explanation,
        open_questions,
    }
}

fn string_field(parsed: &Value, field: &str) -> Option<String> {
    parsed
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

fn question_array(parsed: &Value, field: &str) -> Option<Vec<String>> {
    parsed.get(field).and_then(Value::as_array).map(|entries| {
        entries
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()
    })
}
