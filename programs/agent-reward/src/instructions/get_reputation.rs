//! Read an agent's reputation through return data

use anchor_lang::prelude::*;

use crate::instructions::constants::REPUTATION_SEED;
use crate::state::AgentReputation;

#[derive(Accounts)]
#[instruction(agent: Pubkey)]
pub struct GetReputation<'info> {
    /// CHECK: Address is pinned by seeds; the account may not exist yet.
    #[account(
        seeds = [REPUTATION_SEED, agent.as_ref()],
        bump
    )]
    pub reputation: UncheckedAccount<'info>,
}

pub fn handler(ctx: Context<GetReputation>, _agent: Pubkey) -> Result<u64> {
    let info = ctx.accounts.reputation.to_account_info();
    let data = info.try_borrow_data()?;
    reputation_of(info.owner, &data)
}

/// Reputation stored in an account with `owner` and `data`, or 0 when the
/// agent never minted.
pub fn reputation_of(owner: &Pubkey, data: &[u8]) -> Result<u64> {
    if data.is_empty() || owner != &crate::ID {
        return Ok(0);
    }
    let account = AgentReputation::try_deserialize(&mut &data[..])?;
    Ok(account.reputation)
}
