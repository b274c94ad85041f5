//! Update the reward rate (authority gated)

use anchor_lang::prelude::*;

use crate::events::RewardRateUpdated;
use crate::instructions::constants::REWARD_SEED;
use crate::instructions::mint_helpers::change_reward_rate;
use crate::state::RewardConfig;

#[derive(Accounts)]
pub struct SetRewardRate<'info> {
    #[account(
        mut,
        seeds = [REWARD_SEED],
        bump = reward_config.bump
    )]
    pub reward_config: Account<'info, RewardConfig>,

    pub authority: Signer<'info>,
}

pub fn handler(ctx: Context<SetRewardRate>, new_rate: u64) -> Result<()> {
    let authority = ctx.accounts.authority.key();
    let old_rate = change_reward_rate(&mut ctx.accounts.reward_config, authority, new_rate)?;

    msg!("Reward rate {} -> {}", old_rate, new_rate);

    emit!(RewardRateUpdated {
        old_rate,
        new_rate,
        updated_by: authority,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
