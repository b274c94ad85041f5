//! Reward arithmetic and the atomic state transition behind `verify_and_mint`.
//!
//! Everything is computed into a [`MintOutcome`] before any account is
//! written, so an overflow anywhere leaves every counter untouched.
//! [`process_mint`] is the whole instruction minus the verifier CPI; the
//! handler and off-chain replicas of the program both go through it.

use crate::errors::RewardError;
use crate::instructions::proof_verification::{validate_submission, WorkSubmission};
use crate::state::{AgentReputation, RewardConfig, TaskReceipt};
use crate::utils::version::check_version_compatible;
use agent_work_guest::ProofJournal;
use anchor_lang::prelude::*;

/// Reward for `compute_units` of work at `reward_rate`.
pub fn calculate_reward(compute_units: u64, reward_rate: u64) -> Result<u64> {
    Ok(compute_units
        .checked_mul(reward_rate)
        .ok_or(RewardError::ArithmeticOverflow)?)
}

/// New counter values produced by one mint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintOutcome {
    pub reward: u64,
    pub reward_rate: u64,
    pub total_minted: u64,
    pub aggregate_reputation: u64,
    pub mint_count: u64,
    pub reputation: u64,
    pub total_earned: u64,
    pub tasks_completed: u64,
}

/// Compute the state after crediting `compute_units` to `agent`.
pub fn apply_mint(
    config: &RewardConfig,
    agent: &AgentReputation,
    compute_units: u64,
) -> Result<MintOutcome> {
    let reward = calculate_reward(compute_units, config.reward_rate)?;

    Ok(MintOutcome {
        reward,
        reward_rate: config.reward_rate,
        total_minted: config
            .total_minted
            .checked_add(reward)
            .ok_or(RewardError::ArithmeticOverflow)?,
        aggregate_reputation: config
            .aggregate_reputation
            .checked_add(compute_units)
            .ok_or(RewardError::ArithmeticOverflow)?,
        mint_count: config
            .mint_count
            .checked_add(1)
            .ok_or(RewardError::ArithmeticOverflow)?,
        reputation: agent
            .reputation
            .checked_add(compute_units)
            .ok_or(RewardError::ArithmeticOverflow)?,
        total_earned: agent
            .total_earned
            .checked_add(reward)
            .ok_or(RewardError::ArithmeticOverflow)?,
        tasks_completed: agent
            .tasks_completed
            .checked_add(1)
            .ok_or(RewardError::ArithmeticOverflow)?,
    })
}

impl MintOutcome {
    /// Write the computed values. Cannot fail.
    pub fn commit(&self, config: &mut RewardConfig, agent: &mut AgentReputation, timestamp: i64) {
        config.total_minted = self.total_minted;
        config.aggregate_reputation = self.aggregate_reputation;
        config.mint_count = self.mint_count;

        agent.reputation = self.reputation;
        agent.total_earned = self.total_earned;
        agent.tasks_completed = self.tasks_completed;
        agent.last_active = timestamp;
    }
}

/// A mint that passed every check and only waits to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintPlan {
    pub journal: ProofJournal,
    pub agent: Pubkey,
    pub outcome: MintOutcome,
}

impl MintPlan {
    pub fn compute_units(&self) -> u64 {
        self.journal.record.compute_units
    }

    pub fn task_id(&self) -> [u8; 32] {
        self.journal.record.task_id.to_bytes()
    }

    /// Write counters, claim the reputation account and fill the receipt.
    /// Bumps are left to the caller.
    pub fn commit(
        &self,
        config: &mut RewardConfig,
        reputation: &mut AgentReputation,
        receipt: &mut TaskReceipt,
        timestamp: i64,
    ) {
        reputation.agent = self.agent;
        self.outcome.commit(config, reputation, timestamp);

        receipt.task_id = self.task_id();
        receipt.agent = self.agent;
        receipt.compute_units = self.compute_units();
        receipt.reward = self.outcome.reward;
        receipt.minted_at = timestamp;
    }
}

/// Every `verify_and_mint` check that does not need the verifier program, in
/// instruction order, followed by the reward arithmetic.
pub fn process_mint(
    config: &RewardConfig,
    reputation: &AgentReputation,
    receipt: &TaskReceipt,
    submission: &WorkSubmission,
    agent: Pubkey,
) -> Result<MintPlan> {
    check_version_compatible(config)?;

    require!(!receipt.is_recorded(), RewardError::ReplayedTask);
    require!(
        reputation.is_unclaimed() || reputation.agent == agent,
        RewardError::AgentMismatch
    );

    let journal = validate_submission(config, submission)?;
    let outcome = apply_mint(config, reputation, journal.record.compute_units)?;

    Ok(MintPlan {
        journal,
        agent,
        outcome,
    })
}

/// Authority check and new rate for `set_reward_rate`. Returns the old rate.
pub fn change_reward_rate(
    config: &mut RewardConfig,
    caller: Pubkey,
    new_rate: u64,
) -> Result<u64> {
    check_version_compatible(config)?;
    require_keys_eq!(caller, config.authority, RewardError::UnauthorizedAdmin);

    let old_rate = config.reward_rate;
    config.reward_rate = new_rate;
    Ok(old_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instructions::constants::TRUSTED_SEAL_SELECTOR;
    use crate::state::CURRENT_PROTOCOL_VERSION;
    use agent_work_guest::{commit, WorkRecord};

    fn config(rate: u64) -> RewardConfig {
        RewardConfig {
            reward_rate: rate,
            ..RewardConfig::default()
        }
    }

    fn agent() -> AgentReputation {
        AgentReputation {
            agent: Pubkey::new_unique(),
            ..AgentReputation::default()
        }
    }

    fn error_name(err: anchor_lang::error::Error) -> String {
        match err {
            anchor_lang::error::Error::AnchorError(e) => e.error_name,
            other => other.to_string(),
        }
    }

    fn submission(task: &[u8], units: u64) -> WorkSubmission {
        let record = WorkRecord::new(commit(task), commit(b"result"), units, 1_700_000_000_000);
        let journal = ProofJournal::base(record, commit(b"result"));
        let mut seal = TRUSTED_SEAL_SELECTOR.to_vec();
        seal.extend_from_slice(&[9u8; 256]);
        WorkSubmission::from_journal(&journal, seal)
    }

    #[test]
    fn test_reward_is_units_times_rate() {
        assert_eq!(calculate_reward(7, 1000).unwrap(), 7000);
        assert_eq!(calculate_reward(0, 1000).unwrap(), 0);
        assert_eq!(calculate_reward(7, 0).unwrap(), 0);
    }

    #[test]
    fn test_reward_overflow_is_an_error() {
        assert!(calculate_reward(u64::MAX, 2).is_err());
    }

    #[test]
    fn test_first_mint_from_initial_state() {
        let mut config = config(1000);
        let mut agent = agent();

        let outcome = apply_mint(&config, &agent, 7).unwrap();
        outcome.commit(&mut config, &mut agent, 42);

        assert_eq!(outcome.reward, 7000);
        assert_eq!(config.total_minted, 7000);
        assert_eq!(config.aggregate_reputation, 7);
        assert_eq!(config.mint_count, 1);
        assert_eq!(agent.reputation, 7);
        assert_eq!(agent.total_earned, 7000);
        assert_eq!(agent.tasks_completed, 1);
        assert_eq!(agent.last_active, 42);
    }

    #[test]
    fn test_overflow_leaves_state_untouched() {
        let config = RewardConfig {
            total_minted: u64::MAX - 10,
            ..config(1000)
        };
        let agent = agent();

        assert!(apply_mint(&config, &agent, 1).is_err());
        assert_eq!(config.total_minted, u64::MAX - 10);
        assert_eq!(config.aggregate_reputation, 0);
        assert_eq!(agent.reputation, 0);
    }

    #[test]
    fn test_rate_change_only_affects_later_mints() {
        let mut config = config(1000);
        let mut agent = agent();

        apply_mint(&config, &agent, 3)
            .unwrap()
            .commit(&mut config, &mut agent, 1);
        config.reward_rate = 10;
        apply_mint(&config, &agent, 3)
            .unwrap()
            .commit(&mut config, &mut agent, 2);

        assert_eq!(config.total_minted, 3000 + 30);
        assert_eq!(agent.total_earned, 3030);
        assert_eq!(agent.reputation, 6);
    }

    #[test]
    fn test_process_mint_then_commit() {
        let mut config = config(1000);
        let mut reputation = AgentReputation::default();
        let mut receipt = TaskReceipt::default();
        let agent = Pubkey::new_unique();

        let plan =
            process_mint(&config, &reputation, &receipt, &submission(b"task-1", 7), agent).unwrap();
        assert_eq!(plan.outcome.reward, 7000);

        plan.commit(&mut config, &mut reputation, &mut receipt, 42);
        assert_eq!(config.total_minted, 7000);
        assert_eq!(reputation.agent, agent);
        assert_eq!(reputation.reputation, 7);
        assert_eq!(receipt.task_id, commit(b"task-1").to_bytes());
        assert_eq!(receipt.agent, agent);
        assert_eq!(receipt.reward, 7000);
        assert_eq!(receipt.minted_at, 42);
        assert!(receipt.is_recorded());
    }

    #[test]
    fn test_process_mint_rejects_recorded_task() {
        let mut config = config(1000);
        let mut reputation = AgentReputation::default();
        let mut receipt = TaskReceipt::default();
        let agent = Pubkey::new_unique();
        let work = submission(b"task-1", 7);

        process_mint(&config, &reputation, &receipt, &work, agent)
            .unwrap()
            .commit(&mut config, &mut reputation, &mut receipt, 1);

        let err = process_mint(&config, &reputation, &receipt, &work, agent).unwrap_err();
        assert_eq!(error_name(err), "ReplayedTask");
        assert_eq!(config.total_minted, 7000);
    }

    #[test]
    fn test_process_mint_rejects_foreign_reputation_account() {
        let config = config(1000);
        let reputation = AgentReputation {
            agent: Pubkey::new_unique(),
            reputation: 3,
            ..AgentReputation::default()
        };

        let err = process_mint(
            &config,
            &reputation,
            &TaskReceipt::default(),
            &submission(b"task-1", 7),
            Pubkey::new_unique(),
        )
        .unwrap_err();
        assert_eq!(error_name(err), "AgentMismatch");
    }

    #[test]
    fn test_process_mint_checks_version_first() {
        let config = RewardConfig {
            protocol_version: CURRENT_PROTOCOL_VERSION + 1,
            ..config(1000)
        };
        let recorded = TaskReceipt {
            task_id: [1u8; 32],
            ..TaskReceipt::default()
        };

        let err = process_mint(
            &config,
            &AgentReputation::default(),
            &recorded,
            &submission(b"task-1", 7),
            Pubkey::new_unique(),
        )
        .unwrap_err();
        assert_eq!(error_name(err), "AccountVersionTooNew");
    }

    #[test]
    fn test_process_mint_rejects_untrusted_seal() {
        let mut work = submission(b"task-1", 7);
        work.seal[0] ^= 0xff;

        let err = process_mint(
            &config(1000),
            &AgentReputation::default(),
            &TaskReceipt::default(),
            &work,
            Pubkey::new_unique(),
        )
        .unwrap_err();
        assert_eq!(error_name(err), "UntrustedSealSelector");
    }

    #[test]
    fn test_rate_change_requires_authority() {
        let authority = Pubkey::new_unique();
        let mut config = RewardConfig {
            authority,
            ..config(1000)
        };

        let err = change_reward_rate(&mut config, Pubkey::new_unique(), 5).unwrap_err();
        assert_eq!(error_name(err), "UnauthorizedAdmin");
        assert_eq!(config.reward_rate, 1000);

        assert_eq!(change_reward_rate(&mut config, authority, 5).unwrap(), 1000);
        assert_eq!(config.reward_rate, 5);
    }
}
