#![allow(unexpected_cfgs)]
//! Agent Reward Program
//!
//! Mints compute rewards to agents that submit a verified proof of off-chain
//! work, and keeps a per-agent reputation score next to a protocol-wide
//! aggregate. Proofs are checked by CPI into a configured verifier program.

use anchor_lang::prelude::*;

declare_id!("5PnKmMK1utdUZWZt3g5MTousReACZkpjPbTPeDAmvxFY");

pub mod errors;
pub mod events;
pub mod instructions;
pub mod state;
pub mod utils;

use instructions::*;

#[program]
pub mod agent_reward {
    use super::*;

    /// Create the reward configuration.
    /// The caller becomes the authority allowed to change the reward rate.
    ///
    /// # Arguments
    /// * `ctx` - Context with the config PDA and the paying authority
    /// * `work_image_id` - Image id every accepted proof must be bound to
    /// * `verifier_program` - Program that checks proof seals via CPI
    pub fn initialize(
        ctx: Context<Initialize>,
        work_image_id: [u8; 32],
        verifier_program: Pubkey,
    ) -> Result<()> {
        instructions::initialize::handler(ctx, work_image_id, verifier_program)
    }

    /// Verify a work proof and mint `compute_units * reward_rate` to `agent`.
    /// Either every counter moves and a `Mint` event is emitted, or the
    /// transaction fails with no effect.
    pub fn verify_and_mint(
        ctx: Context<VerifyAndMint>,
        submission: WorkSubmission,
        agent: Pubkey,
    ) -> Result<()> {
        instructions::verify_and_mint::handler(ctx, submission, agent)
    }

    /// Replace the reward rate. Applies to mints processed afterwards only.
    pub fn set_reward_rate(ctx: Context<SetRewardRate>, new_rate: u64) -> Result<()> {
        instructions::set_reward_rate::handler(ctx, new_rate)
    }

    /// Read an agent's reputation. Returns 0 for agents that never minted.
    pub fn get_reputation(ctx: Context<GetReputation>, agent: Pubkey) -> Result<u64> {
        instructions::get_reputation::handler(ctx, agent)
    }
}
