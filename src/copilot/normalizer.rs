use serde_json::Value;

use crate::copilot::types::{Operation, OperationKind};

/// How an out-of-vocabulary token maps back into the closed vocabulary.
/// The table is the single extension point for new hallucination patterns;
/// parser and orchestrator never change for them.
#[derive(Debug, Clone, Copy)]
enum AliasExpansion {
    /// Grouped model extension: `payload.nodes` become ADD_NODE, then
    /// `payload.edges` become ADD_EDGE, then `payload.isoFields` becomes
    /// one SET_ISO_FIELD when present.
    ModelBundle,
}

const HALLUCINATION_ALIASES: &[(&str, AliasExpansion)] = &[
    ("EXTENDMODEL", AliasExpansion::ModelBundle),
    ("EXTEND_MODEL", AliasExpansion::ModelBundle),
];

/// Maps whatever the parser yielded into canonical operations. Non-array or
/// absent input yields an empty list; entries without a resolvable
/// in-vocabulary type are dropped, never passed through.
pub fn normalize_operations(raw_ops: Option<&Value>) -> Vec<Operation> {
    let Some(entries) = raw_ops.and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut ops = Vec::new();
    for entry in entries {
        let token = type_token(entry);
        match alias_expansion(&token) {
            Some(AliasExpansion::ModelBundle) => expand_model_bundle(entry, &mut ops),
            None => {
                if let Some(kind) = OperationKind::from_token(&token) {
                    ops.push(Operation::from_kind(kind, payload_of(entry)));
                } else if !token.is_empty() {
                    tracing::debug!(
                        target: "copilot",
                        token = %token,
                        "dropped_unknown_operation_type"
                    );
                }
            }
        }
    }
    ops
}

fn alias_expansion(token: &str) -> Option<AliasExpansion> {
    HALLUCINATION_ALIASES
        .iter()
        .find(|(alias, _)| *alias == token)
        .map(|(_, expansion)| *expansion)
}

/// Type token from `type`, falling back to `action`, upper-cased.
fn type_token(entry: &Value) -> String {
    entry
        .get("type")
        .or_else(|| entry.get("action"))
        .and_then(Value::as_str)
        .unwrap_or("")
        .trim()
        .to_ascii_uppercase()
}

fn payload_of(entry: &Value) -> Value {
    entry
        .get("payload")
        .cloned()
        .unwrap_or_else(|| entry.clone())
}

/// Nodes before edges before ISO fields regardless of input order, because
/// downstream consumers assume referenced nodes exist before the edges
/// referencing them.
fn expand_model_bundle(entry: &Value, ops: &mut Vec<Operation>) {
    let payload = entry.get("payload").cloned().unwrap_or(Value::Null);

    for node in payload
        .get("nodes")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
    {
        ops.push(Operation::AddNode(node.clone()));
    }
    for edge in payload
        .get("edges")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
    {
        ops.push(Operation::AddEdge(edge.clone()));
    }
    if let Some(iso_fields) = payload.get("isoFields") {
        ops.push(Operation::SetIsoField(iso_fields.clone()));
    }
}
