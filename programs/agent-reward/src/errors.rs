//! Error codes for the Agent Reward Program

use anchor_lang::prelude::*;

#[error_code]
pub enum RewardError {
    // Authorization errors
    #[msg("Only the reward authority can perform this action")]
    UnauthorizedAdmin,

    #[msg("Reputation account belongs to a different agent")]
    AgentMismatch,

    // Submission errors
    #[msg("Submission does not decode to a well-formed proof statement")]
    MalformedSubmission,

    #[msg("Seal selector is not trusted")]
    UntrustedSealSelector,

    #[msg("Chained proof was produced under a different image")]
    ChainImageMismatch,

    #[msg("Verifier program does not match the configured verifier")]
    InvalidVerifierProgram,

    #[msg("Proof verification failed")]
    ProofVerificationFailed,

    #[msg("A reward was already minted for this task")]
    ReplayedTask,

    // Configuration errors
    #[msg("Work image id must be non-zero")]
    InvalidImageId,

    #[msg("Arithmetic overflow")]
    ArithmeticOverflow,

    // Version errors
    #[msg("Account version is too old, migration required")]
    AccountVersionTooOld,

    #[msg("Account version is too new, program upgrade required")]
    AccountVersionTooNew,

    #[msg("Account version fields are inconsistent")]
    VersionMismatchProtocol,
}
