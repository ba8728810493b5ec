pub mod adapters;
pub mod error;
pub mod facade;
pub mod normalizer;
pub mod parser;
pub mod phase;
pub mod pipeline;
pub mod ports;
pub mod prompts;
pub mod types;
pub mod validator;

pub use adapters::GatewayTextGeneration;
pub use error::CopilotError;
pub use facade::ProcessCopilot;
pub use phase::ConversationPhase;
pub use pipeline::CopilotPipeline;
pub use ports::{GenerationRequest, TextGenerationPort};
pub use types::{
    AssistantResponse, ConversationTurn, Operation, OperationKind, PipelineRequest, TurnRole,
};
