//! Verify a work proof and mint its reward
//!
//! Order matters only for readability: any error below reverts the whole
//! transaction, including the receipt and reputation account creation.

use crate::events::Mint;
use crate::instructions::constants::{REPUTATION_SEED, REWARD_SEED, TASK_SEED};
use crate::instructions::mint_helpers::process_mint;
use crate::instructions::proof_verification::{verify_seal, WorkSubmission};
use crate::state::{AgentReputation, RewardConfig, TaskReceipt};
use anchor_lang::prelude::*;

#[derive(Accounts)]
#[instruction(submission: WorkSubmission, agent: Pubkey)]
pub struct VerifyAndMint<'info> {
    #[account(
        mut,
        seeds = [REWARD_SEED],
        bump = reward_config.bump
    )]
    pub reward_config: Account<'info, RewardConfig>,

    #[account(
        init_if_needed,
        payer = payer,
        space = AgentReputation::SIZE,
        seeds = [REPUTATION_SEED, agent.as_ref()],
        bump
    )]
    pub agent_reputation: Account<'info, AgentReputation>,

    #[account(
        init_if_needed,
        payer = payer,
        space = TaskReceipt::SIZE,
        seeds = [TASK_SEED, submission.task_id.as_ref()],
        bump
    )]
    pub task_receipt: Account<'info, TaskReceipt>,

    /// CHECK: Compared against `reward_config.verifier_program` before the CPI
    pub verifier_program: UncheckedAccount<'info>,

    #[account(mut)]
    pub payer: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<VerifyAndMint>, submission: WorkSubmission, agent: Pubkey) -> Result<()> {
    let clock = Clock::get()?;

    let plan = process_mint(
        &ctx.accounts.reward_config,
        &ctx.accounts.agent_reputation,
        &ctx.accounts.task_receipt,
        &submission,
        agent,
    )?;
    verify_seal(
        &ctx.accounts.verifier_program,
        &ctx.accounts.reward_config,
        &submission,
    )?;

    // Past this point nothing can fail.
    plan.commit(
        &mut ctx.accounts.reward_config,
        &mut ctx.accounts.agent_reputation,
        &mut ctx.accounts.task_receipt,
        clock.unix_timestamp,
    );
    ctx.accounts.agent_reputation.bump = ctx.bumps.agent_reputation;
    ctx.accounts.task_receipt.bump = ctx.bumps.task_receipt;

    let compute_units = plan.compute_units();
    msg!(
        "Minted {} to {} for {} units",
        plan.outcome.reward,
        agent,
        compute_units
    );

    emit!(Mint {
        agent,
        amount: plan.outcome.reward,
        task: plan.task_id(),
        compute_units,
        reward_rate: plan.outcome.reward_rate,
        total_minted: plan.outcome.total_minted,
        proof_kind: submission.kind,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}
