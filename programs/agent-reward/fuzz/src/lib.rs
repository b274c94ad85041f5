//! Property-based fuzz testing library for the Agent Reward Program
//!
//! Models the reward state machine without the Solana runtime and checks
//! its invariants over arbitrary submission sequences.
//!
//! # Usage
//!
//! ```bash
//! # Run all property-based tests
//! cargo test --release -p agent-reward-fuzz
//!
//! # Run the fuzz test runner
//! cargo run --release -p agent-reward-fuzz
//!
//! # Run with more iterations
//! PROPTEST_CASES=10000 cargo test --release -p agent-reward-fuzz
//! ```

pub mod arbitrary;
pub mod invariants;
pub mod scenarios;

pub use arbitrary::*;
pub use invariants::*;
pub use scenarios::*;

// Include fuzz targets as test modules
#[cfg(test)]
#[path = "../fuzz_targets/verify_and_mint.rs"]
mod verify_and_mint_tests;

#[cfg(test)]
#[path = "../fuzz_targets/set_reward_rate.rs"]
mod set_reward_rate_tests;

#[cfg(test)]
#[path = "../fuzz_targets/mint_sequence.rs"]
mod mint_sequence_tests;
