use serde_json::{Value, json};

use crate::copilot::types::{ConversationTurn, OperationKind, TurnRole};

pub const OPEN_QUESTIONS_LABEL: &str = "previously identified open questions";

/// Fixed system instruction: output shape, the full operation vocabulary,
/// and the conversational language.
pub fn system_prompt() -> String {
    let vocabulary = OperationKind::ALL
        .iter()
        .map(|kind| format!("- {}", kind.as_tag()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        concat!(
            "You are the modeling assistant of a business-process documentation tool. ",
            "The user describes a process in natural language; you propose edits to the ",
            "current process model.\n\n",
            "Reply with a single JSON object and nothing else:\n",
            "{{\"proposedOps\": [{{\"type\": TAG, \"payload\": object}}], ",
            "\"explanation\": string, \"openQuestions\": [string]}}\n\n",
            "TAG must be one of exactly these operation types:\n{}\n\n",
            "Rules:\n",
            "1) Never invent operation types outside this list.\n",
            "2) explanation and openQuestions are written in German, the language of the ",
            "conversation.\n",
            "3) openQuestions lists unresolved clarification questions only. Do not repeat ",
            "questions that the conversation already answered.\n",
            "4) Do not wrap the JSON in markdown fences or commentary."
        ),
        vocabulary
    )
}

/// AssistantResponse as a JSON schema, for backends that accept a target
/// output schema directly.
pub fn response_json_schema() -> Value {
    let tags = OperationKind::ALL
        .iter()
        .map(|kind| Value::String(kind.as_tag().to_string()))
        .collect::<Vec<_>>();

    json!({
        "type": "object",
        "properties": {
            "proposedOps": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "type": {"type": "string", "enum": tags},
                        "payload": {}
                    },
                    "required": ["type", "payload"]
                }
            },
            "explanation": {"type": "string"},
            "openQuestions": {"type": "array", "items": {"type": "string"}}
        },
        "required": ["proposedOps", "explanation", "openQuestions"]
    })
}

pub fn render_transcript(history: &[ConversationTurn]) -> String {
    history
        .iter()
        .map(|turn| {
            let role = match turn.role {
                TurnRole::User => "user",
                TurnRole::Ai => "assistant",
            };
            format!("{}: {}", role, turn.text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_user_prompt(
    phase_instruction: &str,
    current_model_json: &str,
    open_questions: Option<&str>,
    context: Option<&str>,
    transcript: &str,
    user_message: &str,
) -> String {
    let mut prompt = String::new();

    prompt.push_str(&format!("<phase>\n{}\n</phase>\n\n", phase_instruction));
    prompt.push_str(&format!(
        "<current-model>\n{}\n</current-model>\n\n",
        current_model_json
    ));

    let memory = open_questions
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .unwrap_or("none");
    prompt.push_str(&format!(
        "<open-questions note=\"{}; avoid re-asking what is already resolved\">\n{}\n</open-questions>\n\n",
        OPEN_QUESTIONS_LABEL, memory
    ));

    if let Some(context) = context.map(str::trim).filter(|text| !text.is_empty()) {
        prompt.push_str(&format!("<context>\n{}\n</context>\n\n", context));
    }

    if !transcript.is_empty() {
        prompt.push_str(&format!(
            "<conversation>\n{}\n</conversation>\n\n",
            transcript
        ));
    }

    prompt.push_str(&format!("<user-message>\n{}\n</user-message>", user_message));
    prompt
}
