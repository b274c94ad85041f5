//! Off-chain agent: executes tasks, proves the work and collects rewards
//! from the reward program.

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod runtime;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::{AgentConfig, ConfigError};
pub use engine::{EchoEngine, InferenceEngine, InferenceOutput};
pub use error::{AgentError, Result};
pub use ledger::{LedgerError, LocalLedger, MintRecord, RewardLedger, SubmissionReceipt};
pub use runtime::{AgentRuntime, ChainExecution, PerformanceStats, TaskExecution};
