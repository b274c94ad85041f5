//! Events emitted by the Agent Reward Program
//!
//! Indexers consume these in ledger commit order. The program never reads
//! them back.

use anchor_lang::prelude::*;

/// Emitted once when the reward configuration is created
#[event]
pub struct RewardInitialized {
    pub authority: Pubkey,
    pub verifier_program: Pubkey,
    pub work_image_id: [u8; 32],
    pub reward_rate: u64,
    pub timestamp: i64,
}

/// Emitted once per successful `verify_and_mint`
#[event]
pub struct Mint {
    pub agent: Pubkey,
    pub amount: u64,
    pub task: [u8; 32],
    pub compute_units: u64,
    pub reward_rate: u64,
    pub total_minted: u64,
    /// 0 = base proof, 1 = chained proof
    pub proof_kind: u8,
    pub timestamp: i64,
}

/// Emitted when the authority changes the reward rate
#[event]
pub struct RewardRateUpdated {
    pub old_rate: u64,
    pub new_rate: u64,
    pub updated_by: Pubkey,
    pub timestamp: i64,
}
