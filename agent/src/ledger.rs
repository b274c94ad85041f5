//! Submission path to the reward program.
//!
//! [`RewardLedger`] is what the runtime talks to. [`LocalLedger`] runs the
//! program's own validation and mint arithmetic in process, with the host
//! verifier standing in for the on-chain verifier CPI. Every check and all the
//! arithmetic run before the first write, so a failed transaction leaves the
//! state as it was.

use std::collections::HashMap;

use agent_reward::instructions::{change_reward_rate, process_mint, WorkSubmission};
use agent_reward::state::{AgentReputation, RewardConfig, TaskReceipt};
use agent_work_host::{verify_proof, WorkProof};
use anchor_lang::prelude::Pubkey;
use async_trait::async_trait;
use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("proof rejected by verifier: {0}")]
    VerificationRejected(String),

    #[error("transaction reverted: {code}")]
    Reverted { code: String },

    #[error("caller {0} is not the reward authority")]
    Unauthorized(Pubkey),

    #[error("transmission failed: {0}")]
    Transmission(String),
}

impl LedgerError {
    fn reverted(err: anchor_lang::error::Error) -> Self {
        let code = match err {
            anchor_lang::error::Error::AnchorError(e) => e.error_name,
            other => other.to_string(),
        };
        Self::Reverted { code }
    }

    /// Program error name for reverted transactions.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Reverted { code } => Some(code),
            _ => None,
        }
    }
}

/// What an indexer sees for one `Mint` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MintRecord {
    pub agent: Pubkey,
    pub amount: u64,
    pub task: [u8; 32],
    pub compute_units: u64,
    pub reward_rate: u64,
    pub transaction_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub transaction_id: String,
    pub amount: u64,
}

#[async_trait]
pub trait RewardLedger: Send + Sync {
    async fn submit_verify_and_mint(
        &self,
        proof: &WorkProof,
        agent: Pubkey,
    ) -> Result<SubmissionReceipt, LedgerError>;

    async fn set_reward_rate(&self, caller: Pubkey, new_rate: u64) -> Result<String, LedgerError>;

    async fn reputation(&self, agent: Pubkey) -> Result<u64, LedgerError>;

    async fn total_minted(&self) -> Result<u64, LedgerError>;

    async fn mint_events(&self) -> Result<Vec<MintRecord>, LedgerError>;
}

#[derive(Debug)]
struct LedgerState {
    config: RewardConfig,
    agents: HashMap<Pubkey, AgentReputation>,
    receipts: HashMap<[u8; 32], TaskReceipt>,
    events: Vec<MintRecord>,
    slot: u64,
}

/// In-process reward program.
#[derive(Debug)]
pub struct LocalLedger {
    state: Mutex<LedgerState>,
}

impl LocalLedger {
    /// Fresh deployment bound to the prover's image id.
    pub fn new(authority: Pubkey) -> Self {
        let config = RewardConfig {
            authority,
            // No CPI in process; the host verifier checks seals.
            verifier_program: Pubkey::default(),
            work_image_id: agent_work_host::work_image_id(),
            ..RewardConfig::default()
        };
        Self {
            state: Mutex::new(LedgerState {
                config,
                agents: HashMap::new(),
                receipts: HashMap::new(),
                events: Vec::new(),
                slot: 0,
            }),
        }
    }

    pub async fn reward_rate(&self) -> u64 {
        self.state.lock().await.config.reward_rate
    }

    pub async fn aggregate_reputation(&self) -> u64 {
        self.state.lock().await.config.aggregate_reputation
    }
}

fn transaction_id(slot: u64, payload: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(slot.to_le_bytes());
    hasher.update(payload);
    hex::encode(hasher.finalize())
}

#[async_trait]
impl RewardLedger for LocalLedger {
    async fn submit_verify_and_mint(
        &self,
        proof: &WorkProof,
        agent: Pubkey,
    ) -> Result<SubmissionReceipt, LedgerError> {
        let journal =
            verify_proof(proof).map_err(|e| LedgerError::VerificationRejected(e.to_string()))?;
        let submission = WorkSubmission::from_journal(&journal, proof.seal_bytes.clone());

        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        let plan = {
            let fresh = TaskReceipt::default();
            let receipt = state.receipts.get(&submission.task_id).unwrap_or(&fresh);
            let reputation = state.agents.get(&agent).cloned().unwrap_or_default();
            process_mint(&state.config, &reputation, receipt, &submission, agent)
                .map_err(LedgerError::reverted)?
        };

        state.slot += 1;
        let timestamp = state.slot as i64;
        let mut receipt = TaskReceipt::default();
        let reputation = state.agents.entry(agent).or_default();
        plan.commit(&mut state.config, reputation, &mut receipt, timestamp);
        state.receipts.insert(plan.task_id(), receipt);

        let tx = transaction_id(state.slot, &proof.journal);
        let units = plan.compute_units();
        let amount = plan.outcome.reward;
        state.events.push(MintRecord {
            agent,
            amount,
            task: plan.task_id(),
            compute_units: units,
            reward_rate: plan.outcome.reward_rate,
            transaction_id: tx.clone(),
        });
        tracing::info!(%agent, amount, units, tx = %tx, "mint committed");

        Ok(SubmissionReceipt {
            transaction_id: tx,
            amount,
        })
    }

    async fn set_reward_rate(&self, caller: Pubkey, new_rate: u64) -> Result<String, LedgerError> {
        let mut guard = self.state.lock().await;
        let old_rate = change_reward_rate(&mut guard.config, caller, new_rate).map_err(|e| {
            match LedgerError::reverted(e) {
                LedgerError::Reverted { code } if code == "UnauthorizedAdmin" => {
                    LedgerError::Unauthorized(caller)
                }
                other => other,
            }
        })?;
        guard.slot += 1;
        tracing::info!(old_rate, new_rate, "reward rate updated");

        Ok(transaction_id(guard.slot, &new_rate.to_le_bytes()))
    }

    async fn reputation(&self, agent: Pubkey) -> Result<u64, LedgerError> {
        let guard = self.state.lock().await;
        Ok(guard.agents.get(&agent).map_or(0, |a| a.reputation))
    }

    async fn total_minted(&self) -> Result<u64, LedgerError> {
        Ok(self.state.lock().await.config.total_minted)
    }

    async fn mint_events(&self) -> Result<Vec<MintRecord>, LedgerError> {
        Ok(self.state.lock().await.events.clone())
    }
}
