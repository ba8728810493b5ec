use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::gateway::types::DataSource;

/// The closed mutation vocabulary the document editor understands. Every
/// operation leaving the pipeline resolves to exactly one of these tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    #[serde(rename = "ADD_NODE")]
    AddNode,
    #[serde(rename = "UPDATE_NODE")]
    UpdateNode,
    #[serde(rename = "REMOVE_NODE")]
    RemoveNode,
    #[serde(rename = "ADD_EDGE")]
    AddEdge,
    #[serde(rename = "UPDATE_EDGE")]
    UpdateEdge,
    #[serde(rename = "REMOVE_EDGE")]
    RemoveEdge,
    #[serde(rename = "UPDATE_LAYOUT")]
    UpdateLayout,
    #[serde(rename = "SET_ISO_FIELD")]
    SetIsoField,
    #[serde(rename = "REORDER_NODES")]
    ReorderNodes,
    #[serde(rename = "UPDATE_PROCESS_META")]
    UpdateProcessMeta,
}

impl OperationKind {
    pub const ALL: [OperationKind; 10] = [
        OperationKind::AddNode,
        OperationKind::UpdateNode,
        OperationKind::RemoveNode,
        OperationKind::AddEdge,
        OperationKind::UpdateEdge,
        OperationKind::RemoveEdge,
        OperationKind::UpdateLayout,
        OperationKind::SetIsoField,
        OperationKind::ReorderNodes,
        OperationKind::UpdateProcessMeta,
    ];

    pub fn as_tag(&self) -> &'static str {
        match self {
            OperationKind::AddNode => "ADD_NODE",
            OperationKind::UpdateNode => "UPDATE_NODE",
            OperationKind::RemoveNode => "REMOVE_NODE",
            OperationKind::AddEdge => "ADD_EDGE",
            OperationKind::UpdateEdge => "UPDATE_EDGE",
            OperationKind::RemoveEdge => "REMOVE_EDGE",
            OperationKind::UpdateLayout => "UPDATE_LAYOUT",
            OperationKind::SetIsoField => "SET_ISO_FIELD",
            OperationKind::ReorderNodes => "REORDER_NODES",
            OperationKind::UpdateProcessMeta => "UPDATE_PROCESS_META",
        }
    }

    /// Exact-tag lookup; anything outside the vocabulary yields `None`.
    pub fn from_token(token: &str) -> Option<Self> {
        OperationKind::ALL
            .into_iter()
            .find(|kind| kind.as_tag() == token)
    }
}

/// One atomic mutation instruction. The payload shape is owned by the
/// document editor and passed through opaquely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Operation {
    #[serde(rename = "ADD_NODE")]
    AddNode(Value),
    #[serde(rename = "UPDATE_NODE")]
    UpdateNode(Value),
    #[serde(rename = "REMOVE_NODE")]
    RemoveNode(Value),
    #[serde(rename = "ADD_EDGE")]
    AddEdge(Value),
    #[serde(rename = "UPDATE_EDGE")]
    UpdateEdge(Value),
    #[serde(rename = "REMOVE_EDGE")]
    RemoveEdge(Value),
    #[serde(rename = "UPDATE_LAYOUT")]
    UpdateLayout(Value),
    #[serde(rename = "SET_ISO_FIELD")]
    SetIsoField(Value),
    #[serde(rename = "REORDER_NODES")]
    ReorderNodes(Value),
    #[serde(rename = "UPDATE_PROCESS_META")]
    UpdateProcessMeta(Value),
}

impl Operation {
    pub fn from_kind(kind: OperationKind, payload: Value) -> Self {
        match kind {
            OperationKind::AddNode => Operation::AddNode(payload),
            OperationKind::UpdateNode => Operation::UpdateNode(payload),
            OperationKind::RemoveNode => Operation::RemoveNode(payload),
            OperationKind::AddEdge => Operation::AddEdge(payload),
            OperationKind::UpdateEdge => Operation::UpdateEdge(payload),
            OperationKind::RemoveEdge => Operation::RemoveEdge(payload),
            OperationKind::UpdateLayout => Operation::UpdateLayout(payload),
            OperationKind::SetIsoField => Operation::SetIsoField(payload),
            OperationKind::ReorderNodes => Operation::ReorderNodes(payload),
            OperationKind::UpdateProcessMeta => Operation::UpdateProcessMeta(payload),
        }
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::AddNode(_) => OperationKind::AddNode,
            Operation::UpdateNode(_) => OperationKind::UpdateNode,
            Operation::RemoveNode(_) => OperationKind::RemoveNode,
            Operation::AddEdge(_) => OperationKind::AddEdge,
            Operation::UpdateEdge(_) => OperationKind::UpdateEdge,
            Operation::RemoveEdge(_) => OperationKind::RemoveEdge,
            Operation::UpdateLayout(_) => OperationKind::UpdateLayout,
            Operation::SetIsoField(_) => OperationKind::SetIsoField,
            Operation::ReorderNodes(_) => OperationKind::ReorderNodes,
            Operation::UpdateProcessMeta(_) => OperationKind::UpdateProcessMeta,
        }
    }

}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub text: String,
}

/// Full per-call input envelope. Constructed fresh by the caller for every
/// call; the pipeline keeps nothing between invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineRequest {
    pub user_message: String,
    #[serde(default)]
    pub current_model: Value,
    /// Newline-joined open questions from the previous turn, owned by the
    /// calling document.
    #[serde(default)]
    pub open_questions: Option<String>,
    #[serde(default)]
    pub chat_history: Vec<ConversationTurn>,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub data_source: Option<DataSource>,
}

/// The only object the pipeline commits to returning. `explanation` is
/// never empty; both arrays are always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantResponse {
    pub proposed_ops: Vec<Operation>,
    pub explanation: String,
    pub open_questions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn operation_serializes_with_type_and_payload() {
        let op = Operation::AddNode(json!({"id": "n1"}));
        let wire = serde_json::to_value(&op).expect("operation should serialize");
        assert_eq!(wire, json!({"type": "ADD_NODE", "payload": {"id": "n1"}}));
    }

    #[test]
    fn every_tag_round_trips_through_from_token() {
        for kind in OperationKind::ALL {
            assert_eq!(OperationKind::from_token(kind.as_tag()), Some(kind));
        }
        assert_eq!(OperationKind::from_token("EXTENDMODEL"), None);
        assert_eq!(OperationKind::from_token(""), None);
    }

    #[test]
    fn request_deserializes_from_camel_case_wire_shape() {
        let request: PipelineRequest = serde_json::from_value(json!({
            "userMessage": "Bitte Prozess anlegen",
            "currentModel": {"nodes": []},
            "openQuestions": null,
            "chatHistory": [{"role": "user", "text": "Hallo"}, {"role": "ai", "text": "Guten Tag"}],
            "dataSource": "ollama"
        }))
        .expect("request should deserialize");
        assert_eq!(request.chat_history.len(), 2);
        assert_eq!(request.chat_history[1].role, TurnRole::Ai);
        assert!(request.open_questions.is_none());
    }
}
