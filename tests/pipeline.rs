use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use process_copilot::{
    copilot::{
        ConversationTurn, CopilotError, CopilotPipeline, GenerationRequest, Operation,
        OperationKind, PipelineRequest, ProcessCopilot, TextGenerationPort, TurnRole,
        prompts::OPEN_QUESTIONS_LABEL, validator::DEFAULT_CLARIFICATION,
    },
    gateway::{GatewayError, GatewayErrorKind},
};

/// Replays one scripted generation result and records the request it saw.
struct ScriptedGeneration {
    reply: Result<String, CopilotError>,
    seen: Mutex<Option<GenerationRequest>>,
}

impl ScriptedGeneration {
    fn text(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
            seen: Mutex::new(None),
        })
    }

    fn failing(err: CopilotError) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(err),
            seen: Mutex::new(None),
        })
    }

    fn seen_request(&self) -> GenerationRequest {
        self.seen
            .lock()
            .expect("seen lock")
            .clone()
            .expect("generation should have been invoked")
    }
}

#[async_trait]
impl TextGenerationPort for ScriptedGeneration {
    async fn generate(&self, request: GenerationRequest) -> Result<String, CopilotError> {
        *self.seen.lock().expect("seen lock") = Some(request);
        self.reply.clone()
    }
}

fn history(user_turns: usize) -> Vec<ConversationTurn> {
    let mut turns = Vec::new();
    for index in 0..user_turns {
        turns.push(ConversationTurn {
            role: TurnRole::User,
            text: format!("Beschreibung Teil {index}"),
        });
        turns.push(ConversationTurn {
            role: TurnRole::Ai,
            text: "Verstanden.".to_string(),
        });
    }
    turns
}

fn modeling_request() -> PipelineRequest {
    PipelineRequest {
        user_message: "Bitte füge den Freigabeschritt hinzu.".to_string(),
        current_model: json!({"nodes": [], "edges": []}),
        open_questions: Some("Wer gibt den Prozess frei?".to_string()),
        chat_history: history(5),
        context: None,
        data_source: None,
    }
}

fn discovery_request() -> PipelineRequest {
    PipelineRequest {
        chat_history: history(2),
        ..modeling_request()
    }
}

#[tokio::test]
async fn well_formed_generation_flows_through() {
    let generation = ScriptedGeneration::text(
        r#"{"proposedOps":[{"type":"ADD_NODE","payload":{"id":"n1","label":"Freigabe"}}],"explanation":"Ich habe den Schritt ergänzt.","openQuestions":["Wer vertritt den Freigeber?"]}"#,
    );
    let copilot = ProcessCopilot::new(generation.clone());

    let response = copilot.respond(&modeling_request()).await;
    assert_eq!(
        response.proposed_ops,
        vec![Operation::AddNode(json!({"id": "n1", "label": "Freigabe"}))]
    );
    assert_eq!(response.explanation, "Ich habe den Schritt ergänzt.");
    assert_eq!(response.open_questions, vec!["Wer vertritt den Freigeber?"]);
}

#[tokio::test]
async fn fenced_generation_is_recovered() {
    let generation = ScriptedGeneration::text(
        "Gerne:\n```json\n{\"proposedOps\":[],\"explanation\":\"Danke\",\"openQuestions\":[]}\n```\n",
    );
    let copilot = ProcessCopilot::new(generation);
    let response = copilot.respond(&modeling_request()).await;
    assert_eq!(response.explanation, "Danke");
    assert!(response.proposed_ops.is_empty());
}

#[tokio::test]
async fn unparsable_generation_becomes_an_apology() {
    let generation = ScriptedGeneration::text("Dazu fällt mir leider nichts ein.");
    let copilot = ProcessCopilot::new(generation);

    let response = copilot.respond(&modeling_request()).await;
    assert!(response.proposed_ops.is_empty());
    assert!(response.open_questions.is_empty());
    assert!(response.explanation.starts_with("Entschuldigung"));
    assert!(
        response
            .explanation
            .contains("no JSON object recoverable from generation output")
    );
}

#[tokio::test]
async fn empty_generation_becomes_an_apology() {
    let generation = ScriptedGeneration::text("   ");
    let copilot = ProcessCopilot::new(generation);
    let response = copilot.respond(&modeling_request()).await;
    assert!(response.explanation.contains("returned no text"));
}

#[tokio::test]
async fn provider_failure_becomes_an_apology() {
    let err = CopilotError::Provider(
        GatewayError::new(GatewayErrorKind::BackendTransient, "connection refused")
            .with_backend_id("hosted"),
    );
    let copilot = ProcessCopilot::new(ScriptedGeneration::failing(err));
    let response = copilot.respond(&modeling_request()).await;
    assert!(response.explanation.contains("connection refused"));
}

#[tokio::test]
async fn missing_configuration_becomes_an_apology() {
    let err = CopilotError::ConfigUnavailable("no usable backend configuration".to_string());
    let copilot = ProcessCopilot::new(ScriptedGeneration::failing(err));
    let response = copilot.respond(&modeling_request()).await;
    assert!(response.explanation.contains("no usable backend configuration"));
}

#[tokio::test]
async fn missing_fields_are_defaulted() {
    let generation = ScriptedGeneration::text(r#"{"proposedOps":[]}"#);
    let copilot = ProcessCopilot::new(generation);
    let response = copilot.respond(&modeling_request()).await;
    assert_eq!(response.explanation, DEFAULT_CLARIFICATION);
    assert!(response.open_questions.is_empty());
}

#[tokio::test]
async fn discovery_phase_drops_structural_operations() {
    let generation = ScriptedGeneration::text(
        r#"{"proposedOps":[
            {"type":"ADD_NODE","payload":{"id":"n1"}},
            {"type":"UPDATE_PROCESS_META","payload":{"name":"Einkauf"}}
        ],"explanation":"Vorschlag","openQuestions":[]}"#,
    );
    let copilot = ProcessCopilot::new(generation);

    let response = copilot.respond(&discovery_request()).await;
    assert_eq!(response.proposed_ops.len(), 1);
    assert_eq!(
        response.proposed_ops[0].kind(),
        OperationKind::UpdateProcessMeta
    );
}

#[tokio::test]
async fn hallucinated_bundle_is_expanded_in_modeling_phase() {
    let generation = ScriptedGeneration::text(
        r#"{"proposedOps":[{"type":"EXTENDMODEL","payload":{
            "nodes":[{"id":"n1"},{"id":"n2"}],
            "edges":[{"id":"e1"}],
            "isoFields":{"x":1}
        }}],"explanation":"erweitert","openQuestions":[]}"#,
    );
    let copilot = ProcessCopilot::new(generation);

    let response = copilot.respond(&modeling_request()).await;
    let kinds: Vec<OperationKind> = response.proposed_ops.iter().map(Operation::kind).collect();
    assert_eq!(
        kinds,
        vec![
            OperationKind::AddNode,
            OperationKind::AddNode,
            OperationKind::AddEdge,
            OperationKind::SetIsoField,
        ]
    );
}

#[tokio::test]
async fn prompt_carries_memory_phase_and_vocabulary() {
    let generation =
        ScriptedGeneration::text(r#"{"proposedOps":[],"explanation":"ok","openQuestions":[]}"#);
    let pipeline = CopilotPipeline::new(generation.clone());

    pipeline
        .run(&modeling_request())
        .await
        .expect("pipeline should succeed");

    let seen = generation.seen_request();
    assert!(seen.system_prompt.contains("UPDATE_PROCESS_META"));
    assert!(seen.user_prompt.contains(OPEN_QUESTIONS_LABEL));
    assert!(seen.user_prompt.contains("Wer gibt den Prozess frei?"));
    assert!(seen.user_prompt.contains("modeling phase"));
    assert!(
        seen.user_prompt
            .contains("Bitte füge den Freigabeschritt hinzu.")
    );
    assert!(seen.response_schema.is_object());
}

#[tokio::test]
async fn inner_pipeline_surfaces_real_failures_for_tests() {
    let generation = ScriptedGeneration::text("kein JSON");
    let pipeline = CopilotPipeline::new(generation);
    let err = pipeline
        .run(&modeling_request())
        .await
        .expect_err("inner pipeline must raise");
    assert!(matches!(err, CopilotError::GenerationUnparsable(_)));
}

#[tokio::test]
async fn response_serializes_to_the_wire_contract() {
    let generation = ScriptedGeneration::text(
        r#"{"proposedOps":[{"type":"UPDATE_NODE","payload":{"id":"n1"}}],"explanation":"ok","openQuestions":["A?"]}"#,
    );
    let copilot = ProcessCopilot::new(generation);
    let response = copilot.respond(&modeling_request()).await;

    let wire = serde_json::to_value(&response).expect("response should serialize");
    assert_eq!(
        wire,
        json!({
            "proposedOps": [{"type": "UPDATE_NODE", "payload": {"id": "n1"}}],
            "explanation": "ok",
            "openQuestions": ["A?"]
        })
    );
}
