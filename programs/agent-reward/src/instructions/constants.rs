//! Shared constants for instruction handlers

/// Leading seal bytes naming the proof system
pub const SEAL_SELECTOR_LEN: usize = 4;

/// Groth16 proof bytes following the selector
pub const SEAL_PROOF_LEN: usize = 256;

/// Full seal length
pub const SEAL_BYTES_LEN: usize = SEAL_SELECTOR_LEN + SEAL_PROOF_LEN;

/// Only seals with this selector are forwarded to the verifier
pub const TRUSTED_SEAL_SELECTOR: [u8; SEAL_SELECTOR_LEN] = [0x52, 0x5a, 0x56, 0x4d];

/// PDA seed of the reward configuration
pub const REWARD_SEED: &[u8] = b"reward";

/// PDA seed prefix of per-agent reputation accounts
pub const REPUTATION_SEED: &[u8] = b"reputation";

/// PDA seed prefix of task receipts
pub const TASK_SEED: &[u8] = b"task";
