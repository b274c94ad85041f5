//! Account state structures for the Agent Reward Program

use anchor_lang::prelude::*;

/// Size of image ids, task ids and other 32-byte digests
pub const HASH_SIZE: usize = 32;

/// Reward paid per compute unit on first activation
pub const DEFAULT_REWARD_RATE: u64 = 1000;

/// Current program version
pub const CURRENT_PROTOCOL_VERSION: u8 = 1;

/// Minimum account version this program still reads
pub const MIN_SUPPORTED_VERSION: u8 = 1;

/// Global reward configuration and counters
/// PDA seeds: ["reward"]
#[account]
#[derive(Debug, InitSpace)]
pub struct RewardConfig {
    /// May change the reward rate.
    /// Note: Cannot be updated after initialization.
    pub authority: Pubkey,
    /// Program that checks proof seals
    pub verifier_program: Pubkey,
    /// Image id every accepted proof must be bound to
    pub work_image_id: [u8; HASH_SIZE],
    /// Sum of every reward ever minted
    pub total_minted: u64,
    /// Sum of every agent's reputation
    pub aggregate_reputation: u64,
    /// Reward per compute unit
    pub reward_rate: u64,
    /// Number of successful mints
    pub mint_count: u64,
    pub protocol_version: u8,
    pub min_supported_version: u8,
    /// Bump seed for PDA
    pub bump: u8,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            authority: Pubkey::default(),
            verifier_program: Pubkey::default(),
            work_image_id: [0u8; HASH_SIZE],
            total_minted: 0,
            aggregate_reputation: 0,
            reward_rate: DEFAULT_REWARD_RATE,
            mint_count: 0,
            protocol_version: CURRENT_PROTOCOL_VERSION,
            min_supported_version: MIN_SUPPORTED_VERSION,
            bump: 0,
        }
    }
}

impl RewardConfig {
    pub const SIZE: usize = 8 + // discriminator
        32 + // authority
        32 + // verifier_program
        32 + // work_image_id
        8 +  // total_minted
        8 +  // aggregate_reputation
        8 +  // reward_rate
        8 +  // mint_count
        1 +  // protocol_version
        1 +  // min_supported_version
        1; // bump
}

/// Per-agent reputation
/// PDA seeds: ["reputation", agent]
#[account]
#[derive(Debug, Default, InitSpace)]
pub struct AgentReputation {
    pub agent: Pubkey,
    /// Compute units credited to this agent
    pub reputation: u64,
    /// Rewards minted to this agent
    pub total_earned: u64,
    pub tasks_completed: u64,
    /// Unix timestamp of the last mint
    pub last_active: i64,
    pub bump: u8,
}

impl AgentReputation {
    pub const SIZE: usize = 8 + // discriminator
        32 + // agent
        8 +  // reputation
        8 +  // total_earned
        8 +  // tasks_completed
        8 +  // last_active
        1; // bump

    /// True before the first mint initialised this account.
    pub fn is_unclaimed(&self) -> bool {
        self.agent == Pubkey::default()
    }
}

/// Marks a task as rewarded so the same work cannot mint twice
/// PDA seeds: ["task", task_id]
#[account]
#[derive(Debug, Default, InitSpace)]
pub struct TaskReceipt {
    pub task_id: [u8; HASH_SIZE],
    pub agent: Pubkey,
    pub compute_units: u64,
    pub reward: u64,
    pub minted_at: i64,
    pub bump: u8,
}

impl TaskReceipt {
    pub const SIZE: usize = 8 + // discriminator
        32 + // task_id
        32 + // agent
        8 +  // compute_units
        8 +  // reward
        8 +  // minted_at
        1; // bump

    /// Task ids are never zero, so a zeroed id means the account is fresh.
    pub fn is_recorded(&self) -> bool {
        self.task_id != [0u8; HASH_SIZE]
    }
}
