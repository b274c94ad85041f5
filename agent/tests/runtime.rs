use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use agent_runtime::{
    AgentConfig, AgentError, AgentRuntime, EchoEngine, InferenceEngine, InferenceOutput,
    LedgerError, LocalLedger, ManualClock, RewardLedger,
};
use agent_work_guest::{commit, WorkRecord, WorkWitness};
use agent_work_host::ProveError;
use anchor_lang::prelude::Pubkey;
use async_trait::async_trait;
use serde_json::{json, Value};

const AGENT: Pubkey = Pubkey::new_from_array([7u8; 32]);
const AUTHORITY: Pubkey = Pubkey::new_from_array([9u8; 32]);
const START_MS: u64 = 1_700_000_000_000;

/// Reports a scripted unit count per call.
struct ScriptedEngine {
    units: Mutex<VecDeque<u64>>,
}

impl ScriptedEngine {
    fn new(units: &[u64]) -> Self {
        Self {
            units: Mutex::new(units.iter().copied().collect()),
        }
    }
}

#[async_trait]
impl InferenceEngine for ScriptedEngine {
    async fn execute(&self, task: &str, _context: &Value) -> agent_runtime::Result<InferenceOutput> {
        let units = self
            .units
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AgentError::Inference("script exhausted".into()))?;
        Ok(InferenceOutput {
            output: json!({ "response": task }),
            compute_units: Some(units),
        })
    }
}

fn config() -> AgentConfig {
    AgentConfig {
        agent_address: AGENT,
        ..AgentConfig::default()
    }
}

fn setup(engine: Arc<dyn InferenceEngine>) -> (AgentRuntime, Arc<LocalLedger>) {
    setup_with(config(), engine)
}

fn setup_with(
    config: AgentConfig,
    engine: Arc<dyn InferenceEngine>,
) -> (AgentRuntime, Arc<LocalLedger>) {
    let ledger = Arc::new(LocalLedger::new(AUTHORITY));
    let runtime = AgentRuntime::new(
        config,
        engine,
        ledger.clone(),
        Arc::new(ManualClock::new(START_MS)),
    );
    (runtime, ledger)
}

fn work_proof(task: &str, units: u64) -> agent_work_host::WorkProof {
    let witness = WorkWitness {
        model_commitment: commit(b"model:test"),
        input_commitment: commit(b"input"),
        output_value: commit(b"output"),
    };
    let record = WorkRecord::bind(commit(task.as_bytes()), &witness, units, START_MS);
    agent_work_host::prove_work(&record, &witness).unwrap()
}

#[tokio::test]
async fn task_is_proved_submitted_and_rewarded() {
    let (runtime, ledger) = setup(Arc::new(EchoEngine::new(Some(7))));

    let execution = runtime
        .execute_task("summarize the report", &json!({ "lang": "en" }))
        .await
        .unwrap();

    assert_eq!(execution.compute_units, 7);
    assert_eq!(execution.reward, 7_000);
    assert_eq!(execution.result["response"], "Processed: summarize the report");
    assert!(!execution.transaction_id.is_empty());

    let proof = agent_work_host::parse_work_proof(&execution.proof_json).unwrap();
    let statement = agent_work_host::verify_proof(&proof).unwrap();
    assert_eq!(statement.record.task_id, commit(b"summarize the report"));
    assert_eq!(statement.record.timestamp, START_MS);

    assert_eq!(runtime.reputation().await.unwrap(), 7);
    assert_eq!(ledger.total_minted().await.unwrap(), 7_000);

    let events = ledger.mint_events().await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].agent, AGENT);
    assert_eq!(events[0].amount, 7_000);
    assert_eq!(events[0].task, commit(b"summarize the report").to_bytes());
    assert_eq!(events[0].transaction_id, execution.transaction_id);

    let stats = runtime.performance().await;
    assert_eq!(stats.tasks_completed, 1);
    assert_eq!(stats.total_reward, 7_000);
    assert_eq!(stats.last_transaction_id, Some(execution.transaction_id));
}

#[tokio::test]
async fn tampered_proof_leaves_ledger_untouched() {
    let ledger = LocalLedger::new(AUTHORITY);
    let proof = work_proof("task-a", 7);

    let mut tampered = proof.clone();
    // compute_units field of the record
    tampered.journal[65] ^= 0x01;
    let err = ledger
        .submit_verify_and_mint(&tampered, AGENT)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::VerificationRejected(_)));

    let mut bad_seal = proof.clone();
    bad_seal.seal_bytes[10] ^= 0xff;
    assert!(ledger.submit_verify_and_mint(&bad_seal, AGENT).await.is_err());

    assert_eq!(ledger.total_minted().await.unwrap(), 0);
    assert_eq!(ledger.reputation(AGENT).await.unwrap(), 0);
    assert!(ledger.mint_events().await.unwrap().is_empty());

    let receipt = ledger.submit_verify_and_mint(&proof, AGENT).await.unwrap();
    assert_eq!(receipt.amount, 7_000);
}

#[tokio::test]
async fn replayed_task_is_rejected() {
    let (runtime, ledger) = setup(Arc::new(EchoEngine::new(Some(7))));

    runtime.execute_task("same task", &Value::Null).await.unwrap();
    let err = runtime
        .execute_task("same task", &Value::Null)
        .await
        .unwrap_err();
    match err {
        AgentError::Ledger(ledger_err) => assert_eq!(ledger_err.code(), Some("ReplayedTask")),
        other => panic!("unexpected error: {other}"),
    }

    assert_eq!(ledger.total_minted().await.unwrap(), 7_000);
    assert_eq!(ledger.mint_events().await.unwrap().len(), 1);
    let stats = runtime.performance().await;
    assert_eq!(stats.tasks_completed, 1);
    assert_eq!(stats.tasks_failed, 1);
}

#[tokio::test]
async fn same_task_text_is_rewarded_once_across_agents() {
    let ledger = LocalLedger::new(AUTHORITY);
    let other = Pubkey::new_from_array([8u8; 32]);

    ledger
        .submit_verify_and_mint(&work_proof("shared task", 3), AGENT)
        .await
        .unwrap();
    let err = ledger
        .submit_verify_and_mint(&work_proof("shared task", 3), other)
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some("ReplayedTask"));
    assert_eq!(ledger.reputation(other).await.unwrap(), 0);
}

#[tokio::test]
async fn rate_change_applies_only_to_later_mints() {
    let (runtime, ledger) = setup(Arc::new(EchoEngine::new(Some(7))));

    runtime.execute_task("first", &Value::Null).await.unwrap();

    let err = ledger.set_reward_rate(AGENT, 1).await.unwrap_err();
    assert!(matches!(err, LedgerError::Unauthorized(caller) if caller == AGENT));
    assert_eq!(ledger.reward_rate().await, 1_000);

    ledger.set_reward_rate(AUTHORITY, 2_000).await.unwrap();
    let second = runtime.execute_task("second", &Value::Null).await.unwrap();
    assert_eq!(second.reward, 14_000);

    let events = ledger.mint_events().await.unwrap();
    assert_eq!(events[0].amount, 7_000);
    assert_eq!(events[0].reward_rate, 1_000);
    assert_eq!(events[1].reward_rate, 2_000);
    assert_eq!(ledger.total_minted().await.unwrap(), 21_000);
    assert_eq!(runtime.reputation().await.unwrap(), 14);
}

#[tokio::test]
async fn overflowing_mint_reverts_without_writing() {
    let ledger = LocalLedger::new(AUTHORITY);
    let proof = work_proof("expensive", 7);

    ledger.set_reward_rate(AUTHORITY, u64::MAX).await.unwrap();
    let err = ledger.submit_verify_and_mint(&proof, AGENT).await.unwrap_err();
    assert_eq!(err.code(), Some("ArithmeticOverflow"));

    assert_eq!(ledger.total_minted().await.unwrap(), 0);
    assert_eq!(ledger.reputation(AGENT).await.unwrap(), 0);
    assert_eq!(ledger.aggregate_reputation().await, 0);
    assert!(ledger.mint_events().await.unwrap().is_empty());

    // No receipt was left behind, so the same task still mints.
    ledger.set_reward_rate(AUTHORITY, 1_000).await.unwrap();
    let receipt = ledger.submit_verify_and_mint(&proof, AGENT).await.unwrap();
    assert_eq!(receipt.amount, 7_000);
    assert_eq!(ledger.reputation(AGENT).await.unwrap(), 7);
}

#[tokio::test]
async fn reputation_is_tracked_per_agent() {
    let ledger = LocalLedger::new(AUTHORITY);
    let other = Pubkey::new_from_array([8u8; 32]);

    ledger
        .submit_verify_and_mint(&work_proof("a", 3), AGENT)
        .await
        .unwrap();
    ledger
        .submit_verify_and_mint(&work_proof("b", 4), other)
        .await
        .unwrap();

    assert_eq!(ledger.reputation(AGENT).await.unwrap(), 3);
    assert_eq!(ledger.reputation(other).await.unwrap(), 4);
    assert_eq!(ledger.reputation(AUTHORITY).await.unwrap(), 0);
    assert_eq!(ledger.aggregate_reputation().await, 7);
}

#[tokio::test]
async fn task_chain_aggregates_units_into_one_proof() {
    let (runtime, ledger) = setup(Arc::new(ScriptedEngine::new(&[10, 5, 22])));

    let tasks = [
        ("step one", Value::Null),
        ("step two", Value::Null),
        ("step three", json!({ "final": true })),
    ];
    let execution = runtime.execute_task_chain(&tasks).await.unwrap();

    assert_eq!(execution.results.len(), 3);
    assert_eq!(execution.aggregate_units, 37);
    // Mints on the outer record's units
    assert_eq!(execution.reward, 22_000);

    let proof = agent_work_host::parse_work_proof(&execution.proof_json).unwrap();
    let statement = agent_work_host::verify_proof(&proof).unwrap();
    assert_eq!(statement.aggregate_units().unwrap(), 37);

    let events = ledger.mint_events().await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].task, commit(b"step three").to_bytes());
    assert_eq!(runtime.reputation().await.unwrap(), 22);
}

#[tokio::test]
async fn proofs_follow_the_configured_cluster() {
    let devnet = AgentConfig {
        cluster: "devnet".to_string(),
        ..config()
    };
    let (runtime, ledger) = setup_with(devnet, Arc::new(ScriptedEngine::new(&[3, 4, 5])));
    runtime.execute_task("on devnet", &Value::Null).await.unwrap();
    let chain = [("a", Value::Null), ("b", Value::Null)];
    assert_eq!(runtime.execute_task_chain(&chain).await.unwrap().aggregate_units, 9);
    assert_eq!(ledger.mint_events().await.unwrap().len(), 2);

    let testnet = AgentConfig {
        cluster: "testnet".to_string(),
        ..config()
    };
    let (runtime, ledger) = setup_with(testnet, Arc::new(EchoEngine::new(Some(7))));
    let err = runtime.execute_task("on testnet", &Value::Null).await.unwrap_err();
    assert!(matches!(
        err,
        AgentError::Prove(ProveError::ClusterNotAllowlisted { ref cluster }) if cluster == "testnet"
    ));
    let err = runtime.execute_task_chain(&chain).await.unwrap_err();
    assert!(matches!(
        err,
        AgentError::Prove(ProveError::ClusterNotAllowlisted { .. })
    ));
    assert!(ledger.mint_events().await.unwrap().is_empty());
    assert_eq!(runtime.performance().await.tasks_failed, 2);
}

#[tokio::test]
async fn empty_chain_is_rejected() {
    let (runtime, ledger) = setup(Arc::new(EchoEngine::default()));
    let err = runtime.execute_task_chain(&[]).await.unwrap_err();
    assert!(matches!(err, AgentError::EmptyChain));
    assert!(ledger.mint_events().await.unwrap().is_empty());
}

#[tokio::test]
async fn estimate_counts_elapsed_time() {
    let ledger = Arc::new(LocalLedger::new(AUTHORITY));
    let runtime = AgentRuntime::new(
        config(),
        Arc::new(EchoEngine::new(None)),
        ledger,
        Arc::new(ManualClock::with_step(START_MS, 250)),
    );

    let execution = runtime.execute_task("slow task", &Value::Null).await.unwrap();
    // 250ms at 100ms per unit plus the default complexity
    assert_eq!(execution.compute_units, 2 + 100);
    assert_eq!(execution.reward, 102_000);
}

#[test]
fn program_and_prover_agree_on_seal_selector() {
    assert_eq!(
        agent_reward::instructions::constants::TRUSTED_SEAL_SELECTOR,
        agent_work_host::TRUSTED_SEAL_SELECTOR
    );
}

#[test]
fn prover_deployments_target_this_reward_program() {
    for deployment in &agent_work_host::config::DEPLOYMENTS {
        assert_eq!(deployment.reward_program_id, agent_reward::ID.to_string());
    }
}
