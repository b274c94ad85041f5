//! Instruction handlers for the Agent Reward Program

pub mod constants;
pub mod mint_helpers;
pub mod proof_verification;

pub mod get_reputation;
pub mod initialize;
pub mod set_reward_rate;
pub mod verify_and_mint;

#[allow(ambiguous_glob_reexports)]
pub use get_reputation::*;
#[allow(ambiguous_glob_reexports)]
pub use initialize::*;
#[allow(ambiguous_glob_reexports)]
pub use set_reward_rate::*;
#[allow(ambiguous_glob_reexports)]
pub use verify_and_mint::*;

pub use mint_helpers::{
    apply_mint, calculate_reward, change_reward_rate, process_mint, MintOutcome, MintPlan,
};
pub use proof_verification::{validate_submission, WorkSubmission};
