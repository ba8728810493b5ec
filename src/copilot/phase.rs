use crate::copilot::types::{ConversationTurn, Operation, OperationKind, TurnRole};

/// User turns at which the conversation switches from discovery to modeling.
pub const MODELING_TURN_THRESHOLD: usize = 5;

/// Conversational phase derived from the count of user-authored turns.
/// Steers the generator and clamps what the pipeline lets through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationPhase {
    Discovery,
    Modeling,
}

impl ConversationPhase {
    pub fn classify(user_turn_count: usize) -> Self {
        if user_turn_count >= MODELING_TURN_THRESHOLD {
            ConversationPhase::Modeling
        } else {
            ConversationPhase::Discovery
        }
    }

    pub fn from_history(history: &[ConversationTurn]) -> Self {
        let user_turns = history
            .iter()
            .filter(|turn| turn.role == TurnRole::User)
            .count();
        Self::classify(user_turns)
    }

    /// Advisory instruction injected into the generation prompt.
    pub fn steering_instruction(&self) -> &'static str {
        match self {
            ConversationPhase::Discovery => {
                "The conversation is in the discovery phase: fewer than five user messages so far. \
                 Focus on understanding the process. Ask clarifying questions, refine the process \
                 description, and do not propose structural model changes yet. The only acceptable \
                 operation type in this phase is UPDATE_PROCESS_META."
            }
            ConversationPhase::Modeling => {
                "The conversation is in the modeling phase: the process is understood well enough \
                 to work on the model. Propose concrete operations from the vocabulary whenever \
                 the user asks for changes, and keep open questions short."
            }
        }
    }

    /// During discovery only process-metadata updates pass; a generator that
    /// ignores the steering instruction cannot sneak structural edits in.
    pub fn allows(&self, kind: OperationKind) -> bool {
        match self {
            ConversationPhase::Modeling => true,
            ConversationPhase::Discovery => kind == OperationKind::UpdateProcessMeta,
        }
    }
}

pub fn clamp_operations(phase: ConversationPhase, ops: Vec<Operation>) -> Vec<Operation> {
    ops.into_iter()
        .filter(|op| phase.allows(op.kind()))
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn history(user_turns: usize) -> Vec<ConversationTurn> {
        let mut turns = Vec::new();
        for index in 0..user_turns {
            turns.push(ConversationTurn {
                role: TurnRole::User,
                text: format!("user message {index}"),
            });
            turns.push(ConversationTurn {
                role: TurnRole::Ai,
                text: "verstanden".to_string(),
            });
        }
        turns
    }

    #[test]
    fn four_user_turns_is_discovery() {
        let phase = ConversationPhase::from_history(&history(4));
        assert_eq!(phase, ConversationPhase::Discovery);
        assert!(phase.steering_instruction().contains("discovery"));
    }

    #[test]
    fn five_user_turns_is_modeling() {
        let phase = ConversationPhase::from_history(&history(5));
        assert_eq!(phase, ConversationPhase::Modeling);
        assert!(phase.steering_instruction().contains("modeling"));
    }

    #[test]
    fn assistant_turns_do_not_count() {
        let mut turns = history(2);
        turns.push(ConversationTurn {
            role: TurnRole::Ai,
            text: "noch eine Antwort".to_string(),
        });
        assert_eq!(
            ConversationPhase::from_history(&turns),
            ConversationPhase::Discovery
        );
    }

    #[test]
    fn discovery_clamp_keeps_only_process_meta() {
        let ops = vec![
            Operation::AddNode(json!({"id": "n1"})),
            Operation::UpdateProcessMeta(json!({"name": "Einkauf"})),
            Operation::RemoveEdge(json!({"id": "e1"})),
        ];
        let kept = clamp_operations(ConversationPhase::Discovery, ops);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].kind(), OperationKind::UpdateProcessMeta);
    }

    #[test]
    fn modeling_clamp_passes_everything() {
        let ops = vec![
            Operation::AddNode(json!({"id": "n1"})),
            Operation::RemoveEdge(json!({"id": "e1"})),
        ];
        assert_eq!(clamp_operations(ConversationPhase::Modeling, ops).len(), 2);
    }
}
