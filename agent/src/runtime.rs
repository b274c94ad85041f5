//! Task execution pipeline: infer, commit, prove, submit.
//!
//! A failure at any step aborts the task before anything reaches the ledger,
//! and the ledger applies a submission whole or not at all.

use std::sync::Arc;

use agent_work_guest::{commit, FieldElement, WorkRecord, WorkWitness};
use agent_work_host::{render_work_proof, ProveError, WorkProof};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::clock::Clock;
use crate::config::AgentConfig;
use crate::engine::{estimate_compute, InferenceEngine};
use crate::error::{AgentError, Result};
use crate::ledger::{RewardLedger, SubmissionReceipt};

/// Outcome of one submitted task.
#[derive(Debug, Clone, Serialize)]
pub struct TaskExecution {
    pub result: Value,
    /// Textual proof as submitted
    pub proof_json: String,
    pub transaction_id: String,
    pub compute_units: u64,
    pub reward: u64,
}

/// Outcome of a chain of tasks folded into one chained proof.
#[derive(Debug, Clone, Serialize)]
pub struct ChainExecution {
    pub results: Vec<Value>,
    pub proof_json: String,
    pub transaction_id: String,
    /// Sum of every task's compute units, as attested by the proof
    #[serde(with = "u128_string")]
    pub aggregate_units: u128,
    pub reward: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PerformanceStats {
    pub tasks_completed: u64,
    pub tasks_failed: u64,
    pub total_compute_units: u64,
    pub total_reward: u64,
    pub last_transaction_id: Option<String>,
}

/// Inference output bound to its work record.
struct ProvableTask {
    result: Value,
    record: WorkRecord,
    witness: WorkWitness,
}

pub struct AgentRuntime {
    engine: Arc<dyn InferenceEngine>,
    ledger: Arc<dyn RewardLedger>,
    clock: Arc<dyn Clock>,
    config: AgentConfig,
    stats: RwLock<PerformanceStats>,
}

impl AgentRuntime {
    pub fn new(
        config: AgentConfig,
        engine: Arc<dyn InferenceEngine>,
        ledger: Arc<dyn RewardLedger>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            engine,
            ledger,
            clock,
            config,
            stats: RwLock::new(PerformanceStats::default()),
        }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Runs `task`, proves the work and submits it for a reward.
    pub async fn execute_task(&self, task: &str, context: &Value) -> Result<TaskExecution> {
        let outcome = self.try_execute_task(task, context).await;
        let summary = outcome
            .as_ref()
            .map(|e| (e.compute_units, e.reward, &e.transaction_id));
        self.record_outcome(summary).await;
        outcome
    }

    async fn try_execute_task(&self, task: &str, context: &Value) -> Result<TaskExecution> {
        let ProvableTask {
            result,
            record,
            witness,
        } = self.run_inference(task, context).await?;

        let cluster = self.config.cluster.clone();
        let proof = tokio::task::spawn_blocking(move || {
            agent_work_host::prove_work_for(&cluster, &record, &witness)
        })
        .await??;

        let (proof_json, receipt) = self.submit(&proof).await?;
        tracing::info!(
            task,
            units = record.compute_units,
            reward = receipt.amount,
            tx = %receipt.transaction_id,
            "task rewarded"
        );

        Ok(TaskExecution {
            result,
            proof_json,
            transaction_id: receipt.transaction_id,
            compute_units: record.compute_units,
            reward: receipt.amount,
        })
    }

    /// Runs every task in order and submits one chained proof covering all
    /// of them.
    pub async fn execute_task_chain(&self, tasks: &[(&str, Value)]) -> Result<ChainExecution> {
        let outcome = self.try_execute_task_chain(tasks).await;
        let summary = outcome.as_ref().map(|e| {
            let units = u64::try_from(e.aggregate_units).unwrap_or(u64::MAX);
            (units, e.reward, &e.transaction_id)
        });
        self.record_outcome(summary).await;
        outcome
    }

    async fn try_execute_task_chain(&self, tasks: &[(&str, Value)]) -> Result<ChainExecution> {
        let ((first_task, first_context), rest) =
            tasks.split_first().ok_or(AgentError::EmptyChain)?;

        let mut results = Vec::with_capacity(tasks.len());
        let first = self.run_inference(first_task, first_context).await?;
        results.push(first.result);
        let cluster = self.config.cluster.clone();
        let mut proof = tokio::task::spawn_blocking(move || {
            agent_work_host::prove_work_for(&cluster, &first.record, &first.witness)
        })
        .await??;

        for (task, context) in rest {
            let next = self.run_inference(task, context).await?;
            results.push(next.result);
            let previous = proof;
            let cluster = self.config.cluster.clone();
            proof = tokio::task::spawn_blocking(move || {
                agent_work_host::verify_chain_for(&cluster, &next.record, &previous)
            })
            .await??;
        }

        let aggregate_units = proof
            .statement()?
            .aggregate_units()
            .map_err(|e| ProveError::VerificationFailed(e.to_string()))?;

        let (proof_json, receipt) = self.submit(&proof).await?;
        tracing::info!(
            tasks = tasks.len(),
            aggregate_units,
            reward = receipt.amount,
            tx = %receipt.transaction_id,
            "task chain rewarded"
        );

        Ok(ChainExecution {
            results,
            proof_json,
            transaction_id: receipt.transaction_id,
            aggregate_units,
            reward: receipt.amount,
        })
    }

    /// Reputation of the configured agent.
    pub async fn reputation(&self) -> Result<u64> {
        Ok(self.ledger.reputation(self.config.agent_address).await?)
    }

    pub async fn performance(&self) -> PerformanceStats {
        self.stats.read().await.clone()
    }

    async fn run_inference(&self, task: &str, context: &Value) -> Result<ProvableTask> {
        let started = self.clock.now_ms();
        let output = self.engine.execute(task, context).await?;
        let finished = self.clock.now_ms();

        let compute_units = estimate_compute(
            finished.saturating_sub(started),
            self.config.compute_time_unit_ms,
            output.compute_units,
            self.config.default_complexity_units,
        );
        let witness = WorkWitness {
            model_commitment: commit(self.config.model_id.as_bytes()),
            input_commitment: input_commitment(task, context)?,
            output_value: commit(&serde_json::to_vec(&output.output)?),
        };
        let record = WorkRecord::bind(commit(task.as_bytes()), &witness, compute_units, finished);
        tracing::debug!(task, compute_units, "inference complete");

        Ok(ProvableTask {
            result: output.output,
            record,
            witness,
        })
    }

    async fn submit(&self, proof: &WorkProof) -> Result<(String, SubmissionReceipt)> {
        let proof_json = render_work_proof(proof)?;
        let receipt = self
            .ledger
            .submit_verify_and_mint(proof, self.config.agent_address)
            .await?;
        Ok((proof_json, receipt))
    }

    async fn record_outcome(&self, outcome: std::result::Result<(u64, u64, &String), &AgentError>) {
        let mut stats = self.stats.write().await;
        match outcome {
            Ok((units, reward, tx)) => {
                stats.tasks_completed = stats.tasks_completed.saturating_add(1);
                stats.total_compute_units = stats.total_compute_units.saturating_add(units);
                stats.total_reward = stats.total_reward.saturating_add(reward);
                stats.last_transaction_id = Some(tx.clone());
            }
            Err(err) => {
                stats.tasks_failed = stats.tasks_failed.saturating_add(1);
                tracing::warn!(error = %err, "task aborted");
            }
        }
    }
}

/// The task text and its canonical JSON context, NUL separated.
fn input_commitment(task: &str, context: &Value) -> Result<FieldElement> {
    let mut bytes = task.as_bytes().to_vec();
    bytes.push(0);
    bytes.extend_from_slice(&serde_json::to_vec(context)?);
    Ok(commit(&bytes))
}

mod u128_string {
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }
}
