//! Initialize the reward configuration

use crate::errors::RewardError;
use crate::events::RewardInitialized;
use crate::instructions::constants::REWARD_SEED;
use crate::state::{
    RewardConfig, CURRENT_PROTOCOL_VERSION, DEFAULT_REWARD_RATE, HASH_SIZE, MIN_SUPPORTED_VERSION,
};
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(
        init,
        payer = authority,
        space = RewardConfig::SIZE,
        seeds = [REWARD_SEED],
        bump
    )]
    pub reward_config: Account<'info, RewardConfig>,

    #[account(mut)]
    pub authority: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(
    ctx: Context<Initialize>,
    work_image_id: [u8; HASH_SIZE],
    verifier_program: Pubkey,
) -> Result<()> {
    require!(
        work_image_id != [0u8; HASH_SIZE],
        RewardError::InvalidImageId
    );

    let config = &mut ctx.accounts.reward_config;
    config.authority = ctx.accounts.authority.key();
    config.verifier_program = verifier_program;
    config.work_image_id = work_image_id;
    config.total_minted = 0;
    config.aggregate_reputation = 0;
    config.reward_rate = DEFAULT_REWARD_RATE;
    config.mint_count = 0;
    config.protocol_version = CURRENT_PROTOCOL_VERSION;
    config.min_supported_version = MIN_SUPPORTED_VERSION;
    config.bump = ctx.bumps.reward_config;

    msg!("Reward config initialized, rate {}", config.reward_rate);

    emit!(RewardInitialized {
        authority: config.authority,
        verifier_program,
        work_image_id,
        reward_rate: config.reward_rate,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
