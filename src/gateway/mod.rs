pub mod adapters;
pub mod credentials;
pub mod error;
pub mod gateway;
pub mod router;
pub mod types;

pub use error::{GatewayError, GatewayErrorKind};
pub use gateway::TextGateway;
pub use types::{
    BackendDialect, BackendProfile, CredentialRef, DataSource, GatewayConfig, GenerationPrompt,
};
