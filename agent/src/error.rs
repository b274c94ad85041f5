use agent_work_host::ProveError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::ledger::LedgerError;

pub type Result<T> = std::result::Result<T, AgentError>;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("proof generation failed: {0}")]
    Prove(#[from] ProveError),

    #[error("submission failed: {0}")]
    Ledger(#[from] LedgerError),

    #[error("a task chain needs at least one task")]
    EmptyChain,

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("proving task panicked or was cancelled: {0}")]
    Join(#[from] tokio::task::JoinError),
}
