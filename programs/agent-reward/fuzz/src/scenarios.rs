//! Fuzz testing scenarios that simulate instruction execution
//!
//! These scenarios model `verify_and_mint` and `set_reward_rate` without the
//! Solana runtime. Every simulated instruction works on a copy of the state
//! and only replaces the original on success, mirroring transaction
//! atomicity. A handler that writes before failing is still reported.

use std::collections::{BTreeMap, BTreeSet};

use crate::invariants::*;

/// Reward rate on first activation
pub const INITIAL_REWARD_RATE: u64 = 1000;

/// Simulated per-agent reputation account
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulatedAgent {
    pub reputation: u64,
    pub total_earned: u64,
    pub tasks_completed: u64,
}

/// Simulated `Mint` event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedMintEvent {
    pub agent: [u8; 32],
    pub amount: u64,
    pub task: [u8; 32],
    pub compute_units: u64,
    pub reward_rate: u64,
}

/// Simulated reward configuration plus the accounts it governs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedRewardState {
    pub authority: [u8; 32],
    pub total_minted: u64,
    pub aggregate_reputation: u64,
    pub reward_rate: u64,
    pub mint_count: u64,
    pub agents: BTreeMap<[u8; 32], SimulatedAgent>,
    pub receipts: BTreeSet<[u8; 32]>,
    pub events: Vec<SimulatedMintEvent>,
}

impl Default for SimulatedRewardState {
    fn default() -> Self {
        Self {
            authority: [1u8; 32],
            total_minted: 0,
            aggregate_reputation: 0,
            reward_rate: INITIAL_REWARD_RATE,
            mint_count: 0,
            agents: BTreeMap::new(),
            receipts: BTreeSet::new(),
            events: Vec::new(),
        }
    }
}

impl SimulatedRewardState {
    pub fn reputation_of(&self, agent: &[u8; 32]) -> u64 {
        self.agents.get(agent).map_or(0, |a| a.reputation)
    }
}

/// A submission as the program sees it after decoding
#[derive(Debug, Clone)]
pub struct SimulatedSubmission {
    pub task_id: [u8; 32],
    pub agent: [u8; 32],
    pub compute_units: u64,
    /// Outcome of the verifier CPI
    pub proof_valid: bool,
    pub selector_trusted: bool,
}

/// Result of a simulated instruction execution
#[derive(Debug, Clone)]
pub enum SimulationResult {
    Success,
    Error(String),
    InvariantViolation(String),
}

impl SimulationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, SimulationResult::Success)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, SimulationResult::Error(_))
    }

    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, SimulationResult::InvariantViolation(_))
    }
}

// ============================================================================
// verify_and_mint Simulation
// ============================================================================

/// Simulate verify_and_mint
pub fn simulate_verify_and_mint(
    state: &mut SimulatedRewardState,
    submission: &SimulatedSubmission,
) -> SimulationResult {
    simulate_mint_with(state, submission, execute_verify_and_mint)
}

/// Run `execute` as a `verify_and_mint` handler and check the mint
/// invariants on what it did. `state` is replaced only on success.
pub fn simulate_mint_with<F>(
    state: &mut SimulatedRewardState,
    submission: &SimulatedSubmission,
    execute: F,
) -> SimulationResult
where
    F: FnOnce(&mut SimulatedRewardState, &SimulatedSubmission) -> Result<(), &'static str>,
{
    let before = state.clone();
    let mut next = state.clone();

    if let Err(error) = execute(&mut next, submission) {
        // A handler must not write anything before it fails.
        if let MintInvariantResult::PartialUpdate = check_no_partial_update(&before, &next) {
            return SimulationResult::InvariantViolation(format!(
                "M2: state changed before {}",
                error
            ));
        }
        return SimulationResult::Error(error.to_string());
    }

    let event = match next.events.last() {
        Some(event) if next.events.len() > before.events.len() => event.clone(),
        _ => return SimulationResult::InvariantViolation("R3: no event emitted".into()),
    };
    if let Err(violation) = check_after_mint(&before, &next, &event) {
        return SimulationResult::InvariantViolation(violation);
    }

    *state = next;
    SimulationResult::Success
}

fn execute_verify_and_mint(
    state: &mut SimulatedRewardState,
    submission: &SimulatedSubmission,
) -> Result<(), &'static str> {
    if state.receipts.contains(&submission.task_id) {
        return Err("ReplayedTask");
    }
    if submission.task_id == [0u8; 32] {
        return Err("MalformedSubmission");
    }
    if !submission.selector_trusted {
        return Err("UntrustedSealSelector");
    }
    if !submission.proof_valid {
        return Err("ProofVerificationFailed");
    }

    let units = submission.compute_units;
    let reward = units
        .checked_mul(state.reward_rate)
        .ok_or("ArithmeticOverflow")?;
    let agent = state.agents.get(&submission.agent).cloned().unwrap_or_default();

    // All arithmetic first, writes after.
    let total_minted = state.total_minted.checked_add(reward).ok_or("ArithmeticOverflow")?;
    let aggregate = state
        .aggregate_reputation
        .checked_add(units)
        .ok_or("ArithmeticOverflow")?;
    let mint_count = state.mint_count.checked_add(1).ok_or("ArithmeticOverflow")?;
    let updated = SimulatedAgent {
        reputation: agent.reputation.checked_add(units).ok_or("ArithmeticOverflow")?,
        total_earned: agent.total_earned.checked_add(reward).ok_or("ArithmeticOverflow")?,
        tasks_completed: agent.tasks_completed.checked_add(1).ok_or("ArithmeticOverflow")?,
    };

    state.total_minted = total_minted;
    state.aggregate_reputation = aggregate;
    state.mint_count = mint_count;
    state.agents.insert(submission.agent, updated);
    state.receipts.insert(submission.task_id);
    state.events.push(SimulatedMintEvent {
        agent: submission.agent,
        amount: reward,
        task: submission.task_id,
        compute_units: units,
        reward_rate: state.reward_rate,
    });
    Ok(())
}

fn check_after_mint(
    before: &SimulatedRewardState,
    after: &SimulatedRewardState,
    event: &SimulatedMintEvent,
) -> Result<(), String> {
    let counters = [
        check_counters_monotonic(before, after),
        check_agent_sums(after),
        check_event_accounting(after),
    ];
    if let Some(violation) = counters
        .iter()
        .find(|r| **r != CounterInvariantResult::Valid)
    {
        return Err(format!("{:?}", violation));
    }

    let mints = [
        check_reward_formula(event.compute_units, before.reward_rate, event.amount),
        check_history_preserved(before, after),
    ];
    if let Some(violation) = mints.iter().find(|r| **r != MintInvariantResult::Valid) {
        return Err(format!("{:?}", violation));
    }
    Ok(())
}

// ============================================================================
// set_reward_rate Simulation
// ============================================================================

/// Simulate set_reward_rate
pub fn simulate_set_reward_rate(
    state: &mut SimulatedRewardState,
    caller: [u8; 32],
    new_rate: u64,
) -> SimulationResult {
    if caller != state.authority {
        return SimulationResult::Error("UnauthorizedAdmin".to_string());
    }

    let before = state.clone();
    state.reward_rate = new_rate;

    if let MintInvariantResult::RetroactiveChange { index } = check_history_preserved(&before, state)
    {
        return SimulationResult::InvariantViolation(format!(
            "M3: event {} rewritten by rate update",
            index
        ));
    }
    if state.total_minted != before.total_minted
        || state.aggregate_reputation != before.aggregate_reputation
    {
        return SimulationResult::InvariantViolation(
            "M3: rate update touched minted counters".to_string(),
        );
    }

    SimulationResult::Success
}
